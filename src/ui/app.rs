use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use crate::analytics::Analytics;
use crate::auth::{AuthClient, AuthProvider, AuthUser};
use crate::composer::{DraftField, InterviewDraft};
use crate::error::DashboardError;
use crate::metrics::DashboardMetrics;
use crate::models::platform::CODING_PLATFORMS;
use crate::navigation::location::Location;
use crate::navigation::navigator::Navigator;
use crate::navigation::tabs::{ActiveView, DASHBOARD_PATH, TabController};
use crate::store::record_store::RecordStore;
use crate::store::recorder::CodingPlatformRecorder;
use crate::store::session_store::{LoadOutcome, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    SignedOut { message: Option<String> },
    Dashboard,
    EditingField { field: DraftField, buffer: String },
    ViewingLogs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

pub struct AppServices {
    pub remote: Arc<dyn RecordStore>,
    pub auth: Arc<dyn AuthClient>,
    pub navigator: Arc<dyn Navigator>,
    pub analytics: Arc<dyn Analytics>,
}

pub struct App {
    pub state: AppState,
    auth: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
    analytics: Arc<dyn Analytics>,
    pub store: SessionStore,
    recorder: CodingPlatformRecorder,
    pub tabs: TabController,
    view_rx: watch::Receiver<ActiveView>,
    load_tx: mpsc::UnboundedSender<Result<LoadOutcome, DashboardError>>,
    load_rx: mpsc::UnboundedReceiver<Result<LoadOutcome, DashboardError>>,
    pending_loads: usize,
    pub user: Option<AuthUser>,
    pub draft: InterviewDraft,
    pub selected_field: DraftField,
    pub selected_platform: usize,
    pub selected_history: usize,
    pub logs: Vec<String>,
}

impl App {
    pub fn new(services: AppServices, initial_location: Location) -> Self {
        let store = SessionStore::new(services.remote);
        let recorder = CodingPlatformRecorder::new(
            store.clone(),
            Arc::clone(&services.navigator),
            Arc::clone(&services.analytics),
        );
        let tabs = TabController::new(initial_location);
        let view_rx = tabs.subscribe();
        let (load_tx, load_rx) = mpsc::unbounded_channel();

        Self {
            state: AppState::SignedOut { message: None },
            auth: services.auth,
            navigator: services.navigator,
            analytics: services.analytics,
            store,
            recorder,
            tabs,
            view_rx,
            load_tx,
            load_rx,
            pending_loads: 0,
            user: None,
            draft: InterviewDraft::default(),
            selected_field: DraftField::Role,
            selected_platform: 0,
            selected_history: 0,
            logs: vec![],
        }
    }

    pub fn log(&mut self, message: impl AsRef<str>) {
        self.logs.push(format!("[{}] {}", Local::now().format("%H:%M:%S"), message.as_ref()));
    }

    pub fn metrics(&self) -> DashboardMetrics {
        let snapshot = self.store.snapshot();
        DashboardMetrics::compute(&snapshot.interviews, &snapshot.coding, &Local::now())
    }

    // Rebinds the store to whoever the auth client says is signed in
    pub async fn sync_user(&mut self) {
        let user = self.auth.current_user();
        if user.as_ref().map(|u| u.id) == self.user.as_ref().map(|u| u.id) {
            return;
        }
        self.user = user;
        self.selected_history = 0;

        match self.user.clone() {
            Some(user) => {
                self.state = AppState::Dashboard;
                self.analytics.view_dashboard();
                self.log(format!("Signed in as {}", user.display_name()));
                let first_load = self.store.initialize(user.id);
                self.spawn_load(first_load);
            }
            None => {
                self.store.dispose();
                self.state = AppState::SignedOut { message: None };
                self.log("Signed out");
            }
        }
    }

    async fn sign_in(&mut self, provider: AuthProvider) {
        let response = match provider {
            AuthProvider::Google => self.auth.sign_in_with_google().await,
            AuthProvider::GitHub => self.auth.sign_in_with_github().await,
        };
        if response.success {
            self.sync_user().await;
        } else {
            let message = response
                .error
                .unwrap_or_else(|| format!("Failed to sign in with {}", provider.name()));
            self.log(&message);
            self.state = AppState::SignedOut {
                message: Some(message),
            };
        }
    }

    async fn sign_out(&mut self) {
        self.auth.sign_out().await;
        self.sync_user().await;
    }

    fn reload(&mut self) {
        if let Some(user_id) = self.user.as_ref().map(|u| u.id) {
            let store = self.store.clone();
            self.spawn_load(async move { store.load(user_id).await });
        }
    }

    // Results that land after a user switch are dropped by the store's epoch check
    fn spawn_load<F>(&mut self, load: F)
    where
        F: Future<Output = Result<LoadOutcome, DashboardError>> + Send + 'static,
    {
        let tx = self.load_tx.clone();
        self.pending_loads += 1;
        tokio::spawn(async move {
            let _ = tx.send(load.await);
        });
    }

    fn apply_load_report(&mut self, report: Result<LoadOutcome, DashboardError>) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
        match report {
            Ok(LoadOutcome::Applied { interviews, coding }) => {
                self.log(format!(
                    "Loaded {} interview sessions and {} coding sessions",
                    interviews, coding
                ));
                let count = self.store.interview_sessions().len();
                self.selected_history = self.selected_history.min(count.saturating_sub(1));
            }
            Ok(LoadOutcome::Discarded) => {}
            Err(e) => self.log(format!("{}", e)),
        }
    }

    fn drain_loads(&mut self) {
        while let Ok(report) = self.load_rx.try_recv() {
            self.apply_load_report(report);
        }
    }

    #[cfg(test)]
    pub async fn settle_loads(&mut self) {
        while self.pending_loads > 0 {
            match self.load_rx.recv().await {
                Some(report) => self.apply_load_report(report),
                None => break,
            }
        }
    }

    fn select_view(&mut self, view: ActiveView) {
        if self.tabs.select(view) {
            self.log(format!("Opened {}", self.tabs.location().href()));
        }
    }

    // Resets per-view cursors whenever the active view changes, whatever caused it
    fn on_view_changed(&mut self) {
        if self.view_rx.has_changed().unwrap_or(false) {
            let view = *self.view_rx.borrow_and_update();
            log::debug!("Active view is now {}", view.token());
            self.selected_history = 0;
            self.selected_platform = 0;
        }
    }

    async fn delete_selected_interview(&mut self) {
        let sessions = self.store.interview_sessions();
        let Some(session) = sessions.get(self.selected_history) else {
            return;
        };
        match self.store.delete_interview(session.id).await {
            Ok(true) => {
                self.log(format!("Deleted {} interview at {}", session.interview_type, session.company));
                let remaining = self.store.interview_sessions().len();
                self.selected_history = self.selected_history.min(remaining.saturating_sub(1));
            }
            Ok(false) => self.log("Session was already gone"),
            Err(e) => self.log(format!("{}", e)),
        }
    }

    async fn open_selected_platform(&mut self) {
        let Some(platform) = CODING_PLATFORMS.get(self.selected_platform) else {
            return;
        };
        let outcome = self.recorder.record_click(platform).await;
        match (&outcome.session, outcome.recorded) {
            (Some(_), true) => self.log(format!("Opened {}", platform.name)),
            (Some(_), false) => self.log(format!("Opened {} (not saved remotely)", platform.name)),
            (None, _) => self.log(format!("Opened {} (not recorded)", platform.name)),
        }
    }

    fn launch_interview(&mut self) {
        if !self.draft.is_valid() {
            self.log(format!("Fill in: {}", self.draft.missing_fields().join(", ")));
            return;
        }
        match self.draft.launch(self.navigator.as_ref()) {
            Ok(href) => self.log(format!("Interview launched: {}", href)),
            Err(e) => self.log(format!("Cannot start interview: {}", e)),
        }
    }

    fn activate_field(&mut self) {
        let field = self.selected_field;
        if field.is_text() {
            let buffer = self.draft.text(field).unwrap_or_default().to_string();
            self.state = AppState::EditingField { field, buffer };
        } else if field == DraftField::InterviewType {
            self.draft.cycle_interview_type();
        } else {
            self.draft.cycle_duration();
        }
    }

    pub async fn handle_key(&mut self, code: KeyCode) -> KeyOutcome {
        let outcome = match self.state.clone() {
            AppState::SignedOut { .. } => match code {
                KeyCode::Char('q') => KeyOutcome::Quit,
                KeyCode::Char('g') => {
                    self.sign_in(AuthProvider::Google).await;
                    KeyOutcome::Continue
                }
                KeyCode::Char('h') => {
                    self.sign_in(AuthProvider::GitHub).await;
                    KeyOutcome::Continue
                }
                _ => KeyOutcome::Continue,
            },
            AppState::ViewingLogs => match code {
                KeyCode::Char('q') => KeyOutcome::Quit,
                _ => {
                    self.state = AppState::Dashboard;
                    KeyOutcome::Continue
                }
            },
            AppState::EditingField { field, mut buffer } => {
                match code {
                    KeyCode::Char(c) => {
                        buffer.push(c);
                        self.state = AppState::EditingField { field, buffer };
                    }
                    KeyCode::Backspace => {
                        buffer.pop();
                        self.state = AppState::EditingField { field, buffer };
                    }
                    KeyCode::Enter => {
                        if let Some(value) = self.draft.text_mut(field) {
                            *value = buffer;
                        }
                        self.state = AppState::Dashboard;
                    }
                    KeyCode::Esc => self.state = AppState::Dashboard,
                    _ => {}
                }
                KeyOutcome::Continue
            }
            AppState::Dashboard => self.handle_dashboard_key(code).await,
        };
        self.on_view_changed();
        outcome
    }

    async fn handle_dashboard_key(&mut self, code: KeyCode) -> KeyOutcome {
        match code {
            KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Tab => self.select_view(self.tabs.active().next()),
            KeyCode::Char('1') => self.select_view(ActiveView::Overview),
            KeyCode::Char('2') => self.select_view(ActiveView::InterviewComposer),
            KeyCode::Char('3') => self.select_view(ActiveView::CodingPractice),
            KeyCode::Char('[') => {
                self.tabs.back();
            }
            KeyCode::Char(']') => {
                self.tabs.forward();
            }
            KeyCode::Home => {
                if self.tabs.location().href() != DASHBOARD_PATH {
                    self.tabs.navigate_to(Location::new(DASHBOARD_PATH));
                }
            }
            KeyCode::Char('l') => self.state = AppState::ViewingLogs,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('o') => self.sign_out().await,
            _ => match self.tabs.active() {
                ActiveView::Overview => self.handle_overview_key(code).await,
                ActiveView::InterviewComposer => self.handle_composer_key(code),
                ActiveView::CodingPractice => self.handle_coding_key(code).await,
            },
        }
        KeyOutcome::Continue
    }

    async fn handle_overview_key(&mut self, code: KeyCode) {
        let count = self.store.interview_sessions().len();
        match code {
            KeyCode::Up => self.selected_history = self.selected_history.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_history + 1 < count {
                    self.selected_history += 1;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected_interview().await,
            _ => {}
        }
    }

    fn handle_composer_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.selected_field = self.selected_field.prev(),
            KeyCode::Down => self.selected_field = self.selected_field.next(),
            KeyCode::Enter => self.activate_field(),
            KeyCode::Char('s') => self.launch_interview(),
            _ => {}
        }
    }

    async fn handle_coding_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.selected_platform = self.selected_platform.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_platform + 1 < CODING_PLATFORMS.len() {
                    self.selected_platform += 1;
                }
            }
            KeyCode::Enter => self.open_selected_platform().await,
            _ => {}
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        log::info!("Starting UI...");

        let shutdown_flag = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown_flag))?;
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown_flag))?;

        self.sync_user().await;

        if let Err(e) = enable_raw_mode() {
            return Err(anyhow::anyhow!("Terminal raw mode not supported: {}", e));
        }
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(anyhow::anyhow!("Failed to setup terminal: {}", e));
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal, &shutdown_flag).await;

        // Nothing completing after this point may touch the lists
        self.store.dispose();

        if let Err(e) = disable_raw_mode() {
            log::warn!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture) {
            log::warn!("Failed to leave alternate screen: {}", e);
        }
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        shutdown_flag: &AtomicBool,
    ) -> Result<()> {
        loop {
            self.drain_loads();
            terminal.draw(|f| self.draw(f))?;

            if shutdown_flag.load(Ordering::Relaxed) {
                log::info!("Received shutdown signal, exiting...");
                return Ok(());
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    log::debug!("Key pressed: {:?} in state: {:?}", key.code, self.state);
                    if self.handle_key(key.code).await == KeyOutcome::Quit {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn draw(&self, f: &mut Frame) {
        crate::ui::render::draw(self, f);
    }
}
