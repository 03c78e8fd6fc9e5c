use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::analytics::Analytics;
use crate::models::platform::CodingPlatform;
use crate::models::session::CodingSession;
use crate::navigation::navigator::Navigator;
use crate::store::session_store::SessionStore;

#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    /// The session shown locally, if a user was signed in
    pub session: Option<CodingSession>,
    /// Whether the remote insert succeeded
    pub recorded: bool,
}

pub struct CodingPlatformRecorder {
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    analytics: Arc<dyn Analytics>,
}

impl CodingPlatformRecorder {
    pub fn new(store: SessionStore, navigator: Arc<dyn Navigator>, analytics: Arc<dyn Analytics>) -> Self {
        Self {
            store,
            navigator,
            analytics,
        }
    }

    // Shown locally before the insert is attempted, opened whatever the insert does, never rolled back
    pub async fn record_click(&self, platform: &CodingPlatform) -> ClickOutcome {
        self.analytics.click_coding_platform(platform.name);

        let Some(user_id) = self.store.user_id() else {
            log::warn!("Opening {} without recording: no user signed in", platform.name);
            self.navigator.open_external(platform.url);
            return ClickOutcome {
                session: None,
                recorded: false,
            };
        };

        let session = CodingSession {
            id: Uuid::new_v4(),
            user_id,
            platform_name: platform.name.to_string(),
            platform_url: platform.url.to_string(),
            created_at: Utc::now(),
        };
        self.store.prepend_coding_session(session.clone());

        let recorded = match self.store.remote().insert_coding_session(&session).await {
            Ok(()) => {
                log::debug!("Recorded coding session {} on {}", session.id, platform.name);
                true
            }
            Err(e) => {
                log::error!("Error recording coding session: {}", e);
                false
            }
        };

        self.navigator.open_external(platform.url);

        ClickOutcome {
            session: Some(session),
            recorded,
        }
    }
}
