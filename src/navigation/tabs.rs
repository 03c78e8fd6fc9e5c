use tokio::sync::watch;

use crate::navigation::location::Location;

pub const TAB_PARAM: &str = "tab";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActiveView {
    #[default]
    Overview,
    InterviewComposer,
    CodingPractice,
}

impl ActiveView {
    pub const ALL: [ActiveView; 3] = [
        ActiveView::Overview,
        ActiveView::InterviewComposer,
        ActiveView::CodingPractice,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            ActiveView::Overview => "dashboard",
            ActiveView::InterviewComposer => "mock-interview",
            ActiveView::CodingPractice => "coding-practice",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.token() == token)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ActiveView::Overview => "Dashboard",
            ActiveView::InterviewComposer => "Mock Interview",
            ActiveView::CodingPractice => "Coding Practice",
        }
    }

    /// Unrecognized or missing tokens fall back to the overview.
    pub fn from_location(location: &Location) -> Self {
        location
            .param(TAB_PARAM)
            .and_then(Self::from_token)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        match self {
            ActiveView::Overview => ActiveView::InterviewComposer,
            ActiveView::InterviewComposer => ActiveView::CodingPractice,
            ActiveView::CodingPractice => ActiveView::Overview,
        }
    }
}

pub struct TabController {
    entries: Vec<Location>,
    cursor: usize,
    view_tx: watch::Sender<ActiveView>,
}

impl TabController {
    pub fn new(initial: Location) -> Self {
        let view = ActiveView::from_location(&initial);
        let (view_tx, _) = watch::channel(view);
        Self {
            entries: vec![initial],
            cursor: 0,
            view_tx,
        }
    }

    pub fn location(&self) -> &Location {
        &self.entries[self.cursor]
    }

    pub fn active(&self) -> ActiveView {
        ActiveView::from_location(self.location())
    }

    pub fn subscribe(&self) -> watch::Receiver<ActiveView> {
        self.view_tx.subscribe()
    }

    /// Switches to `view`, rewriting the `tab` parameter and pushing a history entry.
    /// Returns false when `view` is already showing.
    pub fn select(&mut self, view: ActiveView) -> bool {
        if view == self.active() {
            return false;
        }
        let next = self.location().clone().with_param(TAB_PARAM, view.token());
        log::debug!("Tab {} -> {}", self.active().token(), view.token());
        self.push(next);
        true
    }

    pub fn navigate_to(&mut self, location: Location) {
        self.push(location);
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.cursor -= 1;
        self.notify();
        true
    }

    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor += 1;
        self.notify();
        true
    }

    fn push(&mut self, location: Location) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location);
        self.cursor = self.entries.len() - 1;
        self.notify();
    }

    fn notify(&self) {
        self.view_tx.send_if_modified(|current| {
            let view = ActiveView::from_location(&self.entries[self.cursor]);
            let changed = *current != view;
            *current = view;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_view_from_query() {
        let tabs = TabController::new(Location::parse("/dashboard?tab=mock-interview"));
        assert_eq!(tabs.active(), ActiveView::InterviewComposer);

        let tabs = TabController::new(Location::parse("/dashboard?tab=bogus"));
        assert_eq!(tabs.active(), ActiveView::Overview);

        let tabs = TabController::new(Location::parse("/dashboard"));
        assert_eq!(tabs.active(), ActiveView::Overview);
    }

    #[test]
    fn test_select_rewrites_tab_param() {
        let mut tabs = TabController::new(Location::parse("/dashboard?ref=mail"));
        assert!(tabs.select(ActiveView::CodingPractice));
        assert_eq!(tabs.location().param(TAB_PARAM), Some("coding-practice"));
        assert_eq!(tabs.location().href(), "/dashboard?ref=mail&tab=coding-practice");
        assert_eq!(tabs.active(), ActiveView::CodingPractice);
    }

    #[test]
    fn test_every_view_reachable_from_every_view() {
        for from in ActiveView::ALL {
            for to in ActiveView::ALL {
                let mut tabs = TabController::new(Location::new("/dashboard"));
                tabs.select(from);
                tabs.select(to);
                assert_eq!(tabs.active(), to);
                if to != ActiveView::Overview {
                    assert_eq!(tabs.location().param(TAB_PARAM), Some(to.token()));
                }
            }
        }
    }

    #[test]
    fn test_reselecting_current_view_is_noop() {
        let mut tabs = TabController::new(Location::parse("/dashboard?tab=coding-practice"));
        assert!(!tabs.select(ActiveView::CodingPractice));
        assert!(!tabs.can_go_back());
    }

    #[test]
    fn test_back_and_forward_restore_views() {
        let mut tabs = TabController::new(Location::new("/dashboard"));
        tabs.select(ActiveView::InterviewComposer);
        tabs.select(ActiveView::CodingPractice);

        assert!(tabs.back());
        assert_eq!(tabs.active(), ActiveView::InterviewComposer);
        assert!(tabs.back());
        assert_eq!(tabs.active(), ActiveView::Overview);
        assert!(!tabs.back());

        assert!(tabs.forward());
        assert_eq!(tabs.active(), ActiveView::InterviewComposer);

        tabs.select(ActiveView::Overview);
        assert!(!tabs.can_go_forward());
    }

    #[test]
    fn test_subscribers_see_latest_view() {
        let mut tabs = TabController::new(Location::new("/dashboard"));
        let mut rx = tabs.subscribe();
        assert_eq!(*rx.borrow_and_update(), ActiveView::Overview);

        tabs.select(ActiveView::CodingPractice);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ActiveView::CodingPractice);

        tabs.navigate_to(Location::parse("/dashboard?tab=coding-practice&page=2"));
        assert!(!rx.has_changed().unwrap());
    }
}
