#[cfg(test)]
mod tests {
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use crossterm::event::KeyCode;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;
    use tokio::sync::Semaphore;
    use uuid::Uuid;

    use crate::analytics::{AnalyticsEvent, RecordingAnalytics};
    use crate::auth::{AuthUser, ConfiguredAuth};
    use crate::metrics::DashboardMetrics;
    use crate::models::session::{CodingSession, InterviewSession, InterviewType};
    use crate::navigation::location::Location;
    use crate::navigation::navigator::RecordingNavigator;
    use crate::navigation::tabs::{ActiveView, TAB_PARAM};
    use crate::store::record_store::{MemoryStore, RecordStore};
    use crate::store::session_store::SessionStore;
    use crate::ui::app::{App, AppServices, AppState, KeyOutcome};
    use crate::ui::render;

    fn interview(user_id: Uuid, kind: InterviewType, duration: i32, day: u32) -> InterviewSession {
        InterviewSession {
            id: Uuid::new_v4(),
            user_id,
            role: "Backend Engineer".to_string(),
            company: "Initech".to_string(),
            interview_type: kind,
            duration,
            summary: "Solid answers".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, day, 15, 0, 0).unwrap(),
        }
    }

    struct Harness {
        app: App,
        remote: Arc<MemoryStore>,
        navigator: Arc<RecordingNavigator>,
        analytics: Arc<RecordingAnalytics>,
    }

    async fn harness(href: &str, sessions: Vec<InterviewSession>, user: AuthUser) -> Harness {
        let remote = Arc::new(MemoryStore::with_sessions(sessions, vec![]));
        let navigator = Arc::new(RecordingNavigator::new());
        let analytics = Arc::new(RecordingAnalytics::default());
        let services = AppServices {
            remote: remote.clone(),
            auth: Arc::new(ConfiguredAuth::signed_in(user)),
            navigator: navigator.clone(),
            analytics: analytics.clone(),
        };
        let mut app = App::new(services, Location::parse(href));
        app.sync_user().await;
        app.settle_loads().await;
        Harness {
            app,
            remote,
            navigator,
            analytics,
        }
    }

    fn user() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: None,
            full_name: Some("Grace Hopper".to_string()),
        }
    }

    /// Two January interviews, viewed in January
    #[tokio::test]
    async fn test_end_to_end_january_metrics() {
        let me = Uuid::new_v4();
        let remote = Arc::new(MemoryStore::with_sessions(
            vec![
                interview(me, InterviewType::Technical, 30, 5),
                interview(me, InterviewType::Behavioral, 60, 20),
            ],
            vec![],
        ));
        let store = SessionStore::new(remote);
        store.initialize(me).await.unwrap();

        let snapshot = store.snapshot();
        let now = Utc.with_ymd_and_hms(2025, 1, 28, 12, 0, 0).unwrap();
        let metrics = DashboardMetrics::compute(&snapshot.interviews, &snapshot.coding, &now);

        assert_eq!(metrics.total_interviews, 2);
        assert_eq!(metrics.avg_duration_minutes, 45);
        assert_eq!(metrics.distinct_interview_type_count, 2);
        assert_eq!(metrics.interviews_this_calendar_month, 2);
        assert_eq!(metrics.total_coding_sessions, 0);
    }

    #[tokio::test]
    async fn test_sign_in_loads_sessions_and_tracks_view() {
        let account = user();
        let h = harness(
            "/dashboard",
            vec![interview(account.id, InterviewType::SystemDesign, 45, 3)],
            account,
        )
        .await;

        assert_eq!(h.app.state, AppState::Dashboard);
        assert_eq!(h.app.store.interview_sessions().len(), 1);
        assert_eq!(h.analytics.events(), vec![AnalyticsEvent::ViewDashboard]);
    }

    #[tokio::test]
    async fn test_deep_link_selects_initial_tab() {
        let h = harness("/dashboard?tab=mock-interview", vec![], user()).await;
        assert_eq!(h.app.tabs.active(), ActiveView::InterviewComposer);

        let h = harness("/dashboard?tab=bogus", vec![], user()).await;
        assert_eq!(h.app.tabs.active(), ActiveView::Overview);
    }

    #[tokio::test]
    async fn test_switching_tab_by_key_rewrites_location() {
        let mut h = harness("/dashboard", vec![], user()).await;

        h.app.handle_key(KeyCode::Char('3')).await;
        assert_eq!(h.app.tabs.active(), ActiveView::CodingPractice);
        assert_eq!(h.app.tabs.location().param(TAB_PARAM), Some("coding-practice"));

        h.app.handle_key(KeyCode::Char('[')).await;
        assert_eq!(h.app.tabs.active(), ActiveView::Overview);
        h.app.handle_key(KeyCode::Char(']')).await;
        assert_eq!(h.app.tabs.active(), ActiveView::CodingPractice);
    }

    #[tokio::test]
    async fn test_home_drops_deep_link_params() {
        let mut h = harness("/dashboard?tab=coding-practice&ref=mail", vec![], user()).await;

        h.app.handle_key(KeyCode::Home).await;
        assert_eq!(h.app.tabs.location().href(), "/dashboard");
        assert_eq!(h.app.tabs.active(), ActiveView::Overview);

        h.app.handle_key(KeyCode::Char('[')).await;
        assert_eq!(h.app.tabs.active(), ActiveView::CodingPractice);
    }

    #[tokio::test]
    async fn test_platform_click_records_and_opens() {
        let mut h = harness("/dashboard?tab=coding-practice", vec![], user()).await;

        h.app.handle_key(KeyCode::Down).await;
        h.app.handle_key(KeyCode::Enter).await;

        assert_eq!(h.navigator.external_opens(), vec!["https://hackerrank.com".to_string()]);
        assert_eq!(h.app.store.coding_sessions()[0].platform_name, "HackerRank");
        assert_eq!(h.remote.coding_snapshot().len(), 1);
        assert_eq!(h.app.metrics().total_coding_sessions, 1);
    }

    #[tokio::test]
    async fn test_composer_blocks_incomplete_launch() {
        let mut h = harness("/dashboard?tab=mock-interview", vec![], user()).await;

        h.app.draft.role = "Engineer".to_string();
        h.app.handle_key(KeyCode::Char('s')).await;
        assert!(h.navigator.navigations().is_empty());

        h.app.draft.company = "Initech".to_string();
        h.app.draft.resume = "Resume".to_string();
        h.app.draft.job_description = "Job".to_string();
        // Interview Type is the third field; Enter cycles it
        h.app.handle_key(KeyCode::Down).await;
        h.app.handle_key(KeyCode::Down).await;
        h.app.handle_key(KeyCode::Enter).await;
        h.app.handle_key(KeyCode::Char('s')).await;

        let navigations = h.navigator.navigations();
        assert_eq!(navigations.len(), 1);
        let handoff = Location::parse(&navigations[0]);
        assert_eq!(handoff.path(), "/chat");
        assert_eq!(handoff.param("interviewType"), Some("Technical"));
        assert_eq!(handoff.param("duration"), Some("30"));
    }

    #[tokio::test]
    async fn test_text_field_editing() {
        let mut h = harness("/dashboard?tab=mock-interview", vec![], user()).await;

        h.app.handle_key(KeyCode::Enter).await;
        for c in "SRE".chars() {
            h.app.handle_key(KeyCode::Char(c)).await;
        }
        h.app.handle_key(KeyCode::Backspace).await;
        h.app.handle_key(KeyCode::Enter).await;
        assert_eq!(h.app.draft.role, "SR");
        assert_eq!(h.app.state, AppState::Dashboard);

        h.app.handle_key(KeyCode::Enter).await;
        h.app.handle_key(KeyCode::Char('X')).await;
        h.app.handle_key(KeyCode::Esc).await;
        assert_eq!(h.app.draft.role, "SR");
    }

    #[tokio::test]
    async fn test_delete_from_history() {
        let account = user();
        let newest = interview(account.id, InterviewType::Technical, 30, 9);
        let h_sessions = vec![interview(account.id, InterviewType::Behavioral, 60, 2), newest.clone()];
        let mut h = harness("/dashboard", h_sessions, account).await;

        h.app.handle_key(KeyCode::Char('d')).await;

        let remaining = h.app.store.interview_sessions();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|s| s.id != newest.id));
        assert_eq!(h.remote.interview_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_out_clears_sessions() {
        let account = user();
        let mut h = harness(
            "/dashboard",
            vec![interview(account.id, InterviewType::Technical, 30, 9)],
            account,
        )
        .await;

        h.app.handle_key(KeyCode::Char('o')).await;
        assert!(matches!(h.app.state, AppState::SignedOut { .. }));
        assert!(h.app.store.interview_sessions().is_empty());
        assert_eq!(h.app.store.user_id(), None);

        h.app.handle_key(KeyCode::Char('g')).await;
        h.app.settle_loads().await;
        assert_eq!(h.app.state, AppState::Dashboard);
        assert_eq!(h.app.store.interview_sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut h = harness("/dashboard", vec![], user()).await;
        assert_eq!(h.app.handle_key(KeyCode::Char('q')).await, KeyOutcome::Quit);
    }

    // Remote whose listings wait for a permit
    struct SlowRemote {
        inner: MemoryStore,
        gate: Arc<Semaphore>,
    }

    #[async_trait]
    impl RecordStore for SlowRemote {
        async fn list_interview_sessions(&self, user_id: Uuid) -> Result<Vec<InterviewSession>> {
            self.gate.acquire().await?.forget();
            self.inner.list_interview_sessions(user_id).await
        }

        async fn list_coding_sessions(&self, user_id: Uuid) -> Result<Vec<CodingSession>> {
            self.inner.list_coding_sessions(user_id).await
        }

        async fn delete_interview_session(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
            self.inner.delete_interview_session(id, user_id).await
        }

        async fn insert_coding_session(&self, session: &CodingSession) -> Result<()> {
            self.inner.insert_coding_session(session).await
        }
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| render::draw(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_history_shows_loading_while_fetch_is_pending() {
        let account = user();
        let gate = Arc::new(Semaphore::new(0));
        let services = AppServices {
            remote: Arc::new(SlowRemote {
                inner: MemoryStore::with_sessions(
                    vec![interview(account.id, InterviewType::Technical, 30, 9)],
                    vec![],
                ),
                gate: gate.clone(),
            }),
            auth: Arc::new(ConfiguredAuth::signed_in(account)),
            navigator: Arc::new(RecordingNavigator::new()),
            analytics: Arc::new(RecordingAnalytics::default()),
        };
        let mut app = App::new(services, Location::parse("/dashboard"));

        app.sync_user().await;
        tokio::task::yield_now().await;
        assert!(app.store.is_loading());
        assert!(screen(&app).contains("Loading sessions..."));

        // Keys are still handled while the fetch is outstanding
        assert_eq!(app.handle_key(KeyCode::Char('2')).await, KeyOutcome::Continue);
        assert_eq!(app.tabs.active(), ActiveView::InterviewComposer);
        app.handle_key(KeyCode::Char('1')).await;

        gate.add_permits(1);
        app.settle_loads().await;
        assert!(!app.store.is_loading());
        assert_eq!(app.store.interview_sessions().len(), 1);
        assert!(!screen(&app).contains("Loading sessions..."));
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_remote_rows() {
        let account = user();
        let mut h = harness(
            "/dashboard",
            vec![interview(account.id, InterviewType::Technical, 30, 9)],
            account.clone(),
        )
        .await;

        h.remote.add_interview(interview(account.id, InterviewType::Behavioral, 45, 10));
        h.app.handle_key(KeyCode::Char('r')).await;
        h.app.settle_loads().await;
        assert_eq!(h.app.store.interview_sessions().len(), 2);
    }
}
