use serde::{Deserialize, Serialize};

use crate::path::{encode_path, BrowsePath};

/// Status of one speaker as reported by `/api/speakers/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SpeakerStatus {
    /// Device address; identifies the speaker in every control endpoint.
    #[serde(rename = "ip")]
    pub address: String,
    #[serde(rename = "trackname", default)]
    pub track_name: String,
    #[serde(rename = "trackelapsed", default)]
    pub track_elapsed_secs: u32,
    #[serde(rename = "trackduration", default)]
    pub track_duration_secs: u32,
    #[serde(default)]
    pub volume: Option<u16>,
    #[serde(default)]
    pub is_playing: bool,
}

impl SpeakerStatus {
    /// Track progress scaled to 0..=100. A zero duration reads as 0 %.
    pub fn progress_percent(&self) -> f64 {
        if self.track_duration_secs == 0 {
            return 0.0;
        }
        let pct = self.track_elapsed_secs as f64 / self.track_duration_secs as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }

    /// One-line summary used by the per-speaker action list:
    /// `address (track [elapsed / duration]s)`.
    pub fn summary(&self) -> String {
        format!(
            "{} ({} [{} / {}]s)",
            self.address, self.track_name, self.track_elapsed_secs, self.track_duration_secs
        )
    }
}

/// Transport actions accepted by `/api/control/playback/{address}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportAction {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    QueueClear,
    VolumeUp,
    VolumeDown,
}

impl TransportAction {
    /// Path segment understood by the service.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::QueueClear => "queue-clear",
            Self::VolumeUp => "v-inc",
            Self::VolumeDown => "v-dec",
        }
    }

    pub fn volume(increase: bool) -> Self {
        if increase {
            Self::VolumeUp
        } else {
            Self::VolumeDown
        }
    }

    pub fn is_volume(self) -> bool {
        matches!(self, Self::VolumeUp | Self::VolumeDown)
    }
}

/// How a file is handed to a speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// Replace the current track and start playing.
    Play,
    /// Queue the file to play after the current track.
    Next,
}

impl PlayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Next => "next",
        }
    }
}

/// Every endpoint the client talks to. `path()` renders the request path
/// relative to the server base URL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint<'a> {
    FileList(&'a BrowsePath),
    /// All speakers.
    Speakers,
    /// One speaker; an empty address behaves like `Speakers`.
    Speaker(&'a str),
    Control {
        mode: PlayMode,
        address: &'a str,
        path: &'a str,
    },
    Playback {
        address: &'a str,
        action: TransportAction,
    },
}

impl Endpoint<'_> {
    pub fn path(&self) -> String {
        match self {
            Endpoint::FileList(path) => {
                let listing = BrowsePath::for_listing(path.as_str());
                format!("/api/filelist{}", listing.encoded())
            }
            Endpoint::Speakers => "/api/speakers/".to_string(),
            Endpoint::Speaker(address) => {
                format!("/api/speakers/{}", urlencoding::encode(address))
            }
            Endpoint::Control {
                mode,
                address,
                path,
            } => {
                let path = path.strip_prefix('/').unwrap_or(path);
                format!(
                    "/api/control/{}/{}/{}",
                    mode.as_str(),
                    urlencoding::encode(address),
                    encode_path(path)
                )
            }
            Endpoint::Playback { address, action } => format!(
                "/api/control/playback/{}/{}",
                urlencoding::encode(address),
                action.as_str()
            ),
        }
    }
}
