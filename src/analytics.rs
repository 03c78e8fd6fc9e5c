use serde::Serialize;
#[cfg(test)]
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    ViewDashboard,
    ClickCodingPlatform { platform: String },
}

/// Fire-and-forget event sink. Tracking never fails the caller.
pub trait Analytics: Send + Sync {
    fn track(&self, event: AnalyticsEvent);

    fn view_dashboard(&self) {
        self.track(AnalyticsEvent::ViewDashboard);
    }

    fn click_coding_platform(&self, platform: &str) {
        self.track(AnalyticsEvent::ClickCodingPlatform {
            platform: platform.to_string(),
        });
    }
}

/// Writes each event as a JSON line to the log.
pub struct LogAnalytics;

impl Analytics for LogAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => log::info!("analytics {}", json),
            Err(e) => log::warn!("Failed to encode analytics event {:?}: {}", event, e),
        }
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

#[cfg(test)]
impl RecordingAnalytics {
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
impl Analytics for RecordingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(AnalyticsEvent::ClickCodingPlatform {
            platform: "AtCoder".to_string(),
        })
        .unwrap();
        assert_eq!(json["event"], "click_coding_platform");
        assert_eq!(json["platform"], "AtCoder");
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingAnalytics::default();
        sink.view_dashboard();
        sink.click_coding_platform("Codewars");
        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.events()[0], AnalyticsEvent::ViewDashboard);
    }
}
