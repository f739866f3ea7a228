//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this for view state, but never mutate it.
//! The App event-loop (through `controller`) is the only thing that writes it.

use sonosbox_proto::{BrowsePath, FileListing, SpeakerStatus};

pub const FILES_DESCRIPTION: &str = "Available music files";
pub const SPEAKERS_DESCRIPTION: &str = "Available speakers";

const MAX_LOG_ENTRIES: usize = 500;

/// Label of the play/pause toggle; the next transport command is read from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayLabel {
    #[default]
    Play,
    Pause,
}

impl PlayLabel {
    pub fn for_playing(is_playing: bool) -> Self {
        if is_playing {
            Self::Pause
        } else {
            Self::Play
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Pause => "Pause",
        }
    }
}

/// What the main list currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataList {
    /// Nothing fetched yet.
    #[default]
    Empty,
    Files(FileListing),
    /// Every speaker, each with play/next actions for `target`.
    Speakers {
        target: String,
        rows: Vec<SpeakerStatus>,
    },
}

/// The now-playing strip: title, progress bar and toggle label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NowPlaying {
    pub address: String,
    pub title: String,
    pub progress_pct: f64,
    pub elapsed_secs: u32,
    pub duration_secs: u32,
    pub volume: Option<u16>,
    pub play_label: PlayLabel,
}

impl NowPlaying {
    pub fn apply(&mut self, status: &SpeakerStatus) {
        self.address = status.address.clone();
        self.title = status.track_name.clone();
        self.progress_pct = status.progress_percent();
        self.elapsed_secs = status.track_elapsed_secs;
        self.duration_secs = status.track_duration_secs;
        self.volume = status.volume;
        self.play_label = PlayLabel::for_playing(status.is_playing);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: chrono::DateTime<chrono::Local>,
    pub level: LogLevel,
    pub message: String,
}

/// The full shared state of the application.
pub struct AppState {
    // ── Browser ─────────────────────────────────────────────────────────────
    pub description: String,
    /// The displayed location (the "info bar").
    pub info_bar: BrowsePath,
    pub data_list: DataList,
    /// Bumped whenever `data_list` is replaced, so components can resync.
    pub data_rev: u64,

    // ── Speakers ────────────────────────────────────────────────────────────
    /// Selector options, in first-seen order.
    pub speakers: Vec<String>,
    pub selected_speaker: Option<String>,
    /// Configured speaker to select once the list arrives.
    pub preferred_speaker: Option<String>,

    // ── Now playing ─────────────────────────────────────────────────────────
    pub now_playing: NowPlaying,

    // ── Session ─────────────────────────────────────────────────────────────
    pub server_url: String,
    /// Outcome of the most recent request.
    pub connected: bool,
    pub logs: Vec<LogEntry>,
}

impl AppState {
    pub fn new(server_url: String, preferred_speaker: Option<String>) -> Self {
        Self {
            description: String::new(),
            info_bar: BrowsePath::root(),
            data_list: DataList::Empty,
            data_rev: 0,
            speakers: Vec::new(),
            selected_speaker: None,
            preferred_speaker,
            now_playing: NowPlaying::default(),
            server_url,
            connected: false,
            logs: Vec::new(),
        }
    }

    /// The current selection, read at call time.
    pub fn selected_speaker(&self) -> Option<&str> {
        self.selected_speaker.as_deref()
    }

    pub fn listing(&self) -> Option<&FileListing> {
        match &self.data_list {
            DataList::Files(listing) => Some(listing),
            _ => None,
        }
    }

    pub fn set_data_list(&mut self, list: DataList) {
        self.data_list = list;
        self.data_rev += 1;
    }

    pub fn push_log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(LogEntry {
            at: chrono::Local::now(),
            level,
            message: message.into(),
        });
        if self.logs.len() > MAX_LOG_ENTRIES {
            self.logs.remove(0);
        }
    }
}
