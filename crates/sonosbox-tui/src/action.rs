//! Action enum: all user-initiated intents and internal events.

use sonosbox_proto::{BrowsePath, PlayMode, TransportAction};

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Speakers,
    Browser,
    NowPlaying,
    LogPanel,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Browser ──────────────────────────────────────────────────────────────
    ListFiles(BrowsePath),
    /// A listing row was activated; carries the row id (`file-<name>`).
    OpenEntry(String),
    NavigateUp,
    /// Show every speaker with play/next actions for this path.
    ShowSpeakers(String),

    // ── Speakers ─────────────────────────────────────────────────────────────
    ListSpeakers,
    SelectSpeaker(String),
    RefreshStatus,

    // ── Playback ─────────────────────────────────────────────────────────────
    PlayAtPath(String),
    PlayOrNext {
        speaker: String,
        path: String,
        mode: PlayMode,
    },
    TogglePlayback,
    AdjustVolume { increase: bool },
    Transport(TransportAction),

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleLogs,
    ToggleHelp,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}
