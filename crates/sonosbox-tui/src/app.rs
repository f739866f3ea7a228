//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message or timer.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Service requests run as spawned tasks; their outcomes come back as messages.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use sonosbox_proto::{ApiClient, BrowsePath, TransportAction};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, LogLevel},
    component::Component,
    components::{
        browser::Browser, help_overlay::HelpOverlay, log_panel::LogPanel,
        now_playing::NowPlayingPane, speaker_list::SpeakerList,
    },
    controller::{self, Plan},
    focus::FocusRing,
    remote::{self, Outcome, Request},
    widgets::{status_bar, toast::ToastManager},
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// A service request finished.
    Remote(Outcome),
}

/// Last drawn area of each pane, for mouse hit-testing.
#[derive(Default)]
struct PaneAreas {
    browser: Rect,
    speakers: Rect,
    now_playing: Rect,
    log_panel: Rect,
}

const NOW_PLAYING_HEIGHT: u16 = 4;
const SPEAKERS_WIDTH: u16 = 26;
const LOG_PANEL_HEIGHT: u16 = 10;

pub struct App {
    state: AppState,
    client: ApiClient,
    status_interval: Duration,

    // Components
    browser: Browser,
    speakers: SpeakerList,
    now_playing: NowPlayingPane,
    log_panel: LogPanel,
    help_overlay: HelpOverlay,

    focus: FocusRing,
    toast: ToastManager,
    pane_areas: PaneAreas,
    tx: Option<mpsc::Sender<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(
        client: ApiClient,
        status_interval: Duration,
        preferred_speaker: Option<String>,
    ) -> Self {
        let state = AppState::new(client.base_url().to_string(), preferred_speaker);
        Self {
            state,
            client,
            status_interval,
            browser: Browser::new(),
            speakers: SpeakerList::new(),
            now_playing: NowPlayingPane::new(),
            log_panel: LogPanel::new(),
            help_overlay: HelpOverlay::new(),
            focus: FocusRing::new(vec![
                ComponentId::Browser,
                ComponentId::Speakers,
                ComponentId::NowPlaying,
                ComponentId::LogPanel,
            ]),
            toast: ToastManager::new(),
            pane_areas: PaneAreas::default(),
            tx: None,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);
        self.tx = Some(tx.clone());

        let started = format!("sonosbox started against {}", self.state.server_url);
        info!("{}", started);
        self.state.push_log(LogLevel::Info, started);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Initial requests ──────────────────────────────────────────────────
        self.request_startup_data();

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut status_poll = status_timer(self.status_interval);

        // Toast expiry.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg);
                    // Drain whatever else is queued before the next frame.
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next);
                    }
                    needs_redraw = true;
                }

                _ = status_poll.tick() => {
                    self.dispatch(Action::RefreshStatus);
                }

                _ = ui_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        info!("sonosbox exiting");
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn request_startup_data(&mut self) {
        self.dispatch(Action::ListFiles(BrowsePath::root()));
        self.dispatch(Action::ListSpeakers);
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                }
                Event::Mouse(mouse) => {
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a);
                    }
                }
                Event::Resize(w, h) => self.dispatch(Action::Resize(w, h)),
                _ => {}
            },
            AppMessage::Remote(outcome) => self.on_outcome(outcome),
        }
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        let applied = controller::apply_outcome(&mut self.state, outcome);
        if let Some(err) = applied.error {
            self.toast.error(err);
        }
        for a in applied.follow_up {
            self.dispatch(a);
        }
    }

    // ── Input routing ─────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // A pending marker jump takes the next key, whatever it is.
        if self.browser.is_awaiting_marker() && self.focus.is_focused(ComponentId::Browser) {
            return self.browser.handle_key(key, &self.state);
        }

        // Playback keys work everywhere, even under the help overlay.
        if let Some(action) = playback_key(key.code) {
            return vec![action];
        }

        // Help overlay captures all other keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        // Global keys are checked before the focused pane.
        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('L') => return vec![Action::ToggleLogs],
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            KeyCode::Char('r') => return vec![Action::ListSpeakers],
            KeyCode::Char('s') => return vec![Action::Transport(TransportAction::Stop)],
            KeyCode::Char('>') => return vec![Action::Transport(TransportAction::Next)],
            KeyCode::Char('<') => return vec![Action::Transport(TransportAction::Previous)],
            KeyCode::Char('c') => return vec![Action::Transport(TransportAction::QueueClear)],
            KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::Browser)],
            KeyCode::Char('2') => return vec![Action::FocusPane(ComponentId::Speakers)],
            KeyCode::Char('3') => return vec![Action::FocusPane(ComponentId::NowPlaying)],
            _ => {}
        }

        match self.focus.current() {
            Some(ComponentId::Browser) => self.browser.handle_key(key, &self.state),
            Some(ComponentId::Speakers) => self.speakers.handle_key(key, &self.state),
            Some(ComponentId::NowPlaying) => self.now_playing.handle_key(key, &self.state),
            Some(ComponentId::LogPanel) => self.log_panel.handle_key(key, &self.state),
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Action> {
        if self.help_overlay.visible {
            return vec![];
        }
        let hit = |area: Rect| {
            mouse.column >= area.x
                && mouse.column < area.x + area.width
                && mouse.row >= area.y
                && mouse.row < area.y + area.height
        };

        let areas = &self.pane_areas;
        let target = if hit(areas.browser) {
            Some((ComponentId::Browser, areas.browser))
        } else if hit(areas.speakers) {
            Some((ComponentId::Speakers, areas.speakers))
        } else if hit(areas.now_playing) {
            Some((ComponentId::NowPlaying, areas.now_playing))
        } else if hit(areas.log_panel) {
            Some((ComponentId::LogPanel, areas.log_panel))
        } else {
            None
        };

        let Some((id, area)) = target else {
            return vec![];
        };
        if matches!(mouse.kind, event::MouseEventKind::Down(_)) {
            self.focus.set(id);
        }
        match id {
            ComponentId::Browser => self.browser.handle_mouse(mouse, area, &self.state),
            ComponentId::Speakers => self.speakers.handle_mouse(mouse, area, &self.state),
            ComponentId::NowPlaying => self.now_playing.handle_mouse(mouse, area, &self.state),
            ComponentId::LogPanel => self.log_panel.handle_mouse(mouse, area, &self.state),
        }
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Broadcast to every component first so local state stays in step.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.browser.on_action(&action, s));
            out.extend(self.speakers.on_action(&action, s));
            out.extend(self.now_playing.on_action(&action, s));
            out.extend(self.log_panel.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match &action {
            Action::RefreshStatus | Action::Resize(..) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            Action::Quit => self.should_quit = true,
            Action::FocusNext => {
                self.focus.next();
                if self.focus.is_focused(ComponentId::LogPanel) && !self.log_panel.visible {
                    self.focus.next();
                }
            }
            Action::FocusPrev => {
                self.focus.prev();
                if self.focus.is_focused(ComponentId::LogPanel) && !self.log_panel.visible {
                    self.focus.prev();
                }
            }
            Action::FocusPane(id) => self.focus.set(id),
            Action::ToggleLogs => {
                // LogPanel has already flipped its own visibility.
                if self.log_panel.visible {
                    self.focus.set(ComponentId::LogPanel);
                } else if self.focus.is_focused(ComponentId::LogPanel) {
                    self.focus.set(ComponentId::Browser);
                }
            }
            Action::SelectSpeaker(address) => {
                if self.state.selected_speaker() != Some(address.as_str()) {
                    info!("selected speaker {}", address);
                    self.state
                        .push_log(LogLevel::Info, format!("Selected speaker {}", address));
                    self.toast.info(format!("Speaker {}", address));
                    self.state.selected_speaker = Some(address);
                    self.dispatch(Action::RefreshStatus);
                }
            }
            Action::ToggleHelp | Action::Resize(..) => {}
            other => self.request(&other),
        }
    }

    /// Send whatever the service needs for `action`.
    fn request(&mut self, action: &Action) {
        match controller::plan(action, &self.state) {
            Plan::Send(request) => self.spawn_request(request),
            Plan::NoSpeaker(what) => {
                let message = format!("no speaker selected, {} not sent", what);
                warn!("{}", message);
                self.state.push_log(LogLevel::Warn, message.clone());
                self.toast.warning(message);
            }
            Plan::Local => {}
        }
    }

    fn spawn_request(&self, request: Request) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            let outcome = remote::execute(&client, request).await;
            let _ = tx.send(AppMessage::Remote(outcome)).await;
        });
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let log_h = if self.log_panel.visible { LOG_PANEL_HEIGHT } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(NOW_PLAYING_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(log_h),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(SPEAKERS_WIDTH)])
            .split(outer[1]);

        self.pane_areas = PaneAreas {
            now_playing: outer[0],
            browser: body[0],
            speakers: body[1],
            log_panel: if self.log_panel.visible {
                outer[2]
            } else {
                Rect::default()
            },
        };

        let focused = |id| self.focus.is_focused(id);
        let (np_f, browser_f, speakers_f, log_f) = (
            focused(ComponentId::NowPlaying),
            focused(ComponentId::Browser),
            focused(ComponentId::Speakers),
            focused(ComponentId::LogPanel),
        );

        self.now_playing.draw(frame, outer[0], np_f, &self.state);
        self.browser.draw(frame, body[0], browser_f, &self.state);
        self.speakers.draw(frame, body[1], speakers_f, &self.state);
        self.log_panel.draw(frame, outer[2], log_f, &self.state);

        let last_log = self.state.logs.last().map(|l| l.message.as_str());
        status_bar::draw_log_bar(frame, outer[3], last_log, self.state.connected);
        status_bar::draw_keys_bar(
            frame,
            outer[4],
            self.state.info_bar.as_str(),
            self.browser.is_awaiting_marker(),
        );

        // ── Help overlay (on top of everything) ──────────────────────────────
        self.help_overlay.draw(frame, area, false, &self.state);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }
}

/// Keys bound to playback whatever has focus.
fn playback_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Down => Some(Action::AdjustVolume { increase: false }),
        KeyCode::Up => Some(Action::AdjustVolume { increase: true }),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::TogglePlayback),
        _ => None,
    }
}

/// Status poll timer. The first tick fires immediately and doubles as the
/// startup refresh.
fn status_timer(period: Duration) -> tokio::time::Interval {
    let mut timer = tokio::time::interval(period);
    timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    timer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::DataList;
    use sonosbox_proto::FileListing;

    fn dead_client() -> ApiClient {
        // Bind then drop, so nothing listens on the port.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .map(|a| a.port())
            .expect("ephemeral port");
        ApiClient::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2))
            .expect("client should initialize")
    }

    fn app() -> App {
        App::new(dead_client(), Duration::from_secs(1), None)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn with_files(app: &mut App, entries: &[&str]) {
        let listing = FileListing::new(
            BrowsePath::root(),
            entries.iter().map(|s| s.to_string()).collect(),
        );
        app.state.set_data_list(DataList::Files(listing));
    }

    #[test]
    fn arrows_and_p_control_playback() {
        let mut app = app();
        assert_eq!(
            app.handle_key(key(KeyCode::Down)),
            vec![Action::AdjustVolume { increase: false }]
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Up)),
            vec![Action::AdjustVolume { increase: true }]
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Char('p'))),
            vec![Action::TogglePlayback]
        );
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('P'), KeyModifiers::SHIFT)),
            vec![Action::TogglePlayback]
        );
    }

    #[test]
    fn playback_keys_work_from_every_pane() {
        let mut app = app();
        for id in [ComponentId::Speakers, ComponentId::NowPlaying] {
            app.focus.set(id);
            assert_eq!(
                app.handle_key(key(KeyCode::Char('p'))),
                vec![Action::TogglePlayback]
            );
        }
    }

    #[test]
    fn playback_keys_pass_through_help_overlay() {
        let mut app = app();
        app.dispatch(Action::ToggleHelp);
        assert!(app.help_overlay.visible);

        assert_eq!(
            app.handle_key(key(KeyCode::Down)),
            vec![Action::AdjustVolume { increase: false }]
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Char('p'))),
            vec![Action::TogglePlayback]
        );
        // Everything else stays with the overlay.
        assert!(app.handle_key(key(KeyCode::Char('s'))).is_empty());
        assert_eq!(
            app.handle_key(key(KeyCode::Esc)),
            vec![Action::ToggleHelp]
        );
    }

    #[test]
    fn unbound_keys_reach_the_focused_browser() {
        let mut app = app();
        with_files(&mut app, &["alpha", "beta"]);
        assert!(app.focus.is_focused(ComponentId::Browser));

        assert!(app.handle_key(key(KeyCode::Char('j'))).is_empty());
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            vec![Action::OpenEntry("file-beta".into())]
        );
    }

    #[test]
    fn pending_marker_jump_takes_precedence() {
        let mut app = app();
        with_files(&mut app, &["apple", "pear"]);

        assert!(app.handle_key(key(KeyCode::Char('\''))).is_empty());
        assert!(app.browser.is_awaiting_marker());

        // `p` picks the marker instead of toggling playback.
        assert!(app.handle_key(key(KeyCode::Char('p'))).is_empty());
        assert!(!app.browser.is_awaiting_marker());
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            vec![Action::OpenEntry("file-pear".into())]
        );
    }

    #[tokio::test]
    async fn startup_requests_files_and_speakers() {
        let mut app = app();
        let (tx, mut rx) = mpsc::channel(8);
        app.tx = Some(tx);

        app.request_startup_data();

        let mut sent = Vec::new();
        for _ in 0..2 {
            match rx.recv().await {
                Some(AppMessage::Remote(outcome)) => sent.push(outcome.request),
                _ => panic!("expected a request outcome"),
            }
        }
        assert!(sent.contains(&Request::ListFiles(BrowsePath::root())));
        assert!(sent.contains(&Request::ListSpeakers));
    }

    #[tokio::test]
    async fn status_refresh_asks_for_the_selected_speaker() {
        let mut app = app();
        let (tx, mut rx) = mpsc::channel(8);
        app.tx = Some(tx);
        app.state.selected_speaker = Some("10.0.0.2".into());

        app.dispatch(Action::RefreshStatus);

        match rx.recv().await {
            Some(AppMessage::Remote(outcome)) => {
                assert_eq!(outcome.request, Request::Status("10.0.0.2".into()));
                assert!(outcome.result.is_err());
            }
            _ => panic!("expected a status outcome"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn status_timer_fires_at_once_then_every_period() {
        let period = Duration::from_millis(750);
        let mut timer = status_timer(period);
        let start = tokio::time::Instant::now();

        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        timer.tick().await;
        assert_eq!(start.elapsed(), period);
        timer.tick().await;
        assert_eq!(start.elapsed(), period * 2);
    }
}
