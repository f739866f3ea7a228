//! Controller: turns actions into service requests and folds the outcomes
//! back into `AppState`.
//!
//! Pure functions over `AppState`; the App owns the event loop and the
//! spawning, this module owns the decisions.

use sonosbox_proto::listing::entry_name;
use sonosbox_proto::{BrowsePath, FileListing, TransportAction};
use tracing::{info, warn};

use crate::action::Action;
use crate::app_state::{
    AppState, DataList, LogLevel, PlayLabel, FILES_DESCRIPTION, SPEAKERS_DESCRIPTION,
};
use crate::remote::{Outcome, Request, Response};

/// Where activating a listing row leads.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryTarget {
    /// A sub-directory to list.
    Directory(BrowsePath),
    /// A file to play, as a control path (no leading slash).
    File(String),
}

/// Resolve a row id (`file-<name>`) against the displayed path.
pub fn resolve_entry(displayed: &BrowsePath, entry_id: &str) -> EntryTarget {
    let full = displayed.join(entry_name(entry_id));
    if full.is_dir() {
        EntryTarget::Directory(full)
    } else {
        EntryTarget::File(full.control_path().to_string())
    }
}

/// The transport command the toggle issues for the label it shows.
pub fn toggle_action(label: PlayLabel) -> TransportAction {
    match label {
        PlayLabel::Play => TransportAction::Play,
        PlayLabel::Pause => TransportAction::Pause,
    }
}

/// What dispatching an action requires from the service.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Send(Request),
    /// A control request with no speaker selected; nothing is sent.
    NoSpeaker(&'static str),
    /// Purely local action.
    Local,
}

/// Build the request for `action`, reading the selection and displayed
/// path from `state` at call time.
pub fn plan(action: &Action, state: &AppState) -> Plan {
    let speaker = || state.selected_speaker().map(str::to_string);

    match action {
        Action::ListFiles(path) => Plan::Send(listing_request(path)),
        Action::NavigateUp => Plan::Send(listing_request(&state.info_bar.parent())),
        Action::OpenEntry(id) => match resolve_entry(&state.info_bar, id) {
            EntryTarget::Directory(path) => Plan::Send(listing_request(&path)),
            EntryTarget::File(path) => match speaker() {
                Some(speaker) => Plan::Send(Request::Play { speaker, path }),
                None => Plan::NoSpeaker("play"),
            },
        },
        Action::ShowSpeakers(path) => Plan::Send(Request::SpeakerActions(path.clone())),
        Action::ListSpeakers => Plan::Send(Request::ListSpeakers),
        Action::RefreshStatus => Plan::Send(Request::Status(speaker().unwrap_or_default())),
        Action::PlayAtPath(path) => match speaker() {
            Some(speaker) => Plan::Send(Request::Play {
                speaker,
                path: path.strip_prefix('/').unwrap_or(path).to_string(),
            }),
            None => Plan::NoSpeaker("play"),
        },
        Action::PlayOrNext {
            speaker,
            path,
            mode,
        } => Plan::Send(Request::PlayOrNext {
            speaker: speaker.clone(),
            path: path.strip_prefix('/').unwrap_or(path).to_string(),
            mode: *mode,
        }),
        Action::TogglePlayback => {
            playback(speaker(), toggle_action(state.now_playing.play_label))
        }
        Action::AdjustVolume { increase } => {
            playback(speaker(), TransportAction::volume(*increase))
        }
        Action::Transport(transport) => playback(speaker(), *transport),
        _ => Plan::Local,
    }
}

fn listing_request(path: &BrowsePath) -> Request {
    Request::ListFiles(BrowsePath::for_listing(path.as_str()))
}

fn playback(speaker: Option<String>, action: TransportAction) -> Plan {
    match speaker {
        Some(speaker) => Plan::Send(Request::Playback { speaker, action }),
        None => Plan::NoSpeaker(action.as_str()),
    }
}

/// Result of folding an outcome into state.
#[derive(Debug, Default, PartialEq)]
pub struct Applied {
    /// Actions to dispatch next (status refresh, root re-list, ...).
    pub follow_up: Vec<Action>,
    /// Message worth surfacing to the user.
    pub error: Option<String>,
}

/// Fold a finished request into `state`. Failures are logged and leave
/// the view as it was.
pub fn apply_outcome(state: &mut AppState, outcome: Outcome) -> Applied {
    let Outcome { request, result } = outcome;
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            state.connected = !err.is_transport();
            let message = format!("{} failed: {}", request.describe(), err);
            warn!("{}", message);
            state.push_log(LogLevel::Error, message.clone());
            // Polls fail every interval while the service is down; keep them out of toasts.
            let error = match request {
                Request::Status(_) => None,
                _ => Some(message),
            };
            return Applied {
                follow_up: Vec::new(),
                error,
            };
        }
    };
    state.connected = true;

    let mut applied = Applied::default();
    match (request, response) {
        (Request::ListFiles(path), Response::Files(names)) => {
            state.description = FILES_DESCRIPTION.to_string();
            state.info_bar = path.clone();
            state.set_data_list(DataList::Files(FileListing::new(path, names)));
        }
        (Request::ListSpeakers, Response::Speakers(rows)) => {
            let had_selection = state.selected_speaker.is_some();
            for row in rows {
                if !row.address.is_empty() && !state.speakers.contains(&row.address) {
                    state.speakers.push(row.address);
                }
            }
            if !had_selection {
                let preferred = state
                    .preferred_speaker
                    .as_ref()
                    .filter(|p| state.speakers.contains(p))
                    .cloned();
                state.selected_speaker = preferred.or_else(|| state.speakers.first().cloned());
                if let Some(speaker) = state.selected_speaker.clone() {
                    info!("selected speaker {}", speaker);
                    state.push_log(LogLevel::Info, format!("Selected speaker {}", speaker));
                    applied.follow_up.push(Action::RefreshStatus);
                }
            }
        }
        (Request::SpeakerActions(path), Response::Speakers(rows)) => {
            state.description = SPEAKERS_DESCRIPTION.to_string();
            state.info_bar = BrowsePath::new(path.clone());
            state.set_data_list(DataList::Speakers { target: path, rows });
        }
        (Request::Status(_), Response::Speakers(rows)) => {
            // An empty array is not an error, but there is nothing to show.
            if let Some(first) = rows.first() {
                state.now_playing.apply(first);
            }
        }
        (request @ Request::Play { .. }, Response::Done) => {
            state.push_log(LogLevel::Info, request.describe());
            applied.follow_up.push(Action::RefreshStatus);
        }
        (request @ Request::PlayOrNext { .. }, Response::Done) => {
            state.push_log(LogLevel::Info, request.describe());
            applied.follow_up.push(Action::ListFiles(BrowsePath::root()));
        }
        (Request::Playback { action, .. }, Response::Done) => {
            if !action.is_volume() {
                applied.follow_up.push(Action::RefreshStatus);
            }
        }
        (request, response) => {
            warn!("unexpected response {:?} to {}", response, request.describe());
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonosbox_proto::{ApiError, PlayMode, SpeakerStatus};

    fn state() -> AppState {
        AppState::new("http://127.0.0.1:46864".into(), None)
    }

    fn with_speaker(speaker: &str) -> AppState {
        let mut s = state();
        s.speakers.push(speaker.to_string());
        s.selected_speaker = Some(speaker.to_string());
        s
    }

    fn speaker(address: &str, track: &str, elapsed: u32, duration: u32, playing: bool) -> SpeakerStatus {
        SpeakerStatus {
            address: address.into(),
            track_name: track.into(),
            track_elapsed_secs: elapsed,
            track_duration_secs: duration,
            volume: Some(20),
            is_playing: playing,
        }
    }

    fn ok(request: Request, response: Response) -> Outcome {
        Outcome {
            request,
            result: Ok(response),
        }
    }

    fn failed(request: Request, status: u16) -> Outcome {
        Outcome {
            request,
            result: Err(ApiError::Status {
                endpoint: "/api/test".into(),
                status,
            }),
        }
    }

    // ── Entry resolution ────────────────────────────────────────────────────

    #[test]
    fn directory_entry_lists_subdirectory() {
        let target = resolve_entry(&BrowsePath::new("music/"), "file-rock/");
        assert_eq!(target, EntryTarget::Directory(BrowsePath::new("music/rock/")));
    }

    #[test]
    fn file_entry_plays_without_leading_slash() {
        let target = resolve_entry(&BrowsePath::new("music/"), "file-song.mp3");
        assert_eq!(target, EntryTarget::File("music/song.mp3".into()));

        let target = resolve_entry(&BrowsePath::new("/music/"), "file-song.mp3");
        assert_eq!(target, EntryTarget::File("music/song.mp3".into()));
    }

    #[test]
    fn opening_a_file_targets_the_selected_speaker() {
        let mut s = with_speaker("10.0.0.2");
        s.info_bar = BrowsePath::new("/music/");
        assert_eq!(
            plan(&Action::OpenEntry("file-song.mp3".into()), &s),
            Plan::Send(Request::Play {
                speaker: "10.0.0.2".into(),
                path: "music/song.mp3".into(),
            })
        );
        assert_eq!(
            plan(&Action::OpenEntry("file-rock/".into()), &s),
            Plan::Send(Request::ListFiles(BrowsePath::new("/music/rock/")))
        );
    }

    // ── Planning ────────────────────────────────────────────────────────────

    #[test]
    fn navigate_up_lists_the_parent() {
        let mut s = state();
        s.info_bar = BrowsePath::new("/a/b/c/");
        assert_eq!(
            plan(&Action::NavigateUp, &s),
            Plan::Send(Request::ListFiles(BrowsePath::new("/a/b/")))
        );
    }

    #[test]
    fn listing_paths_are_slash_prefixed() {
        assert_eq!(
            plan(&Action::ListFiles(BrowsePath::new("")), &state()),
            Plan::Send(Request::ListFiles(BrowsePath::root()))
        );
    }

    #[test]
    fn control_without_speaker_is_not_sent() {
        let s = state();
        assert_eq!(plan(&Action::TogglePlayback, &s), Plan::NoSpeaker("play"));
        assert_eq!(
            plan(&Action::AdjustVolume { increase: false }, &s),
            Plan::NoSpeaker("v-dec")
        );
        assert_eq!(
            plan(&Action::PlayAtPath("a.mp3".into()), &s),
            Plan::NoSpeaker("play")
        );
    }

    #[test]
    fn toggle_follows_the_label() {
        let mut s = with_speaker("10.0.0.2");
        let toggle = |s: &AppState| match plan(&Action::TogglePlayback, s) {
            Plan::Send(Request::Playback { action, .. }) => action,
            other => panic!("unexpected plan {other:?}"),
        };
        assert_eq!(toggle(&s), TransportAction::Play);
        s.now_playing.play_label = PlayLabel::Pause;
        assert_eq!(toggle(&s), TransportAction::Pause);
    }

    #[test]
    fn status_poll_without_selection_asks_for_all() {
        assert_eq!(
            plan(&Action::RefreshStatus, &state()),
            Plan::Send(Request::Status(String::new()))
        );
    }

    #[test]
    fn ui_actions_are_local() {
        assert_eq!(plan(&Action::ToggleHelp, &state()), Plan::Local);
        assert_eq!(plan(&Action::Quit, &state()), Plan::Local);
    }

    // ── Outcomes ────────────────────────────────────────────────────────────

    #[test]
    fn listing_is_sorted_and_shown() {
        let mut s = state();
        let names = vec!["b.mp3".into(), "Zed/".into(), "a.mp3".into()];
        let applied = apply_outcome(&mut s, ok(Request::ListFiles(BrowsePath::new("/x/")), Response::Files(names)));

        assert_eq!(applied, Applied::default());
        assert_eq!(s.description, FILES_DESCRIPTION);
        assert_eq!(s.info_bar.as_str(), "/x/");
        let listing = s.listing().expect("files shown");
        assert_eq!(listing.entries, vec!["Zed/", "a.mp3", "b.mp3"]);
        assert_eq!(s.data_rev, 1);
    }

    #[test]
    fn failed_listing_keeps_the_view() {
        let mut s = state();
        apply_outcome(&mut s, ok(Request::ListFiles(BrowsePath::root()), Response::Files(vec!["a".into()])));
        let applied = apply_outcome(&mut s, failed(Request::ListFiles(BrowsePath::new("/gone/")), 404));

        assert!(applied.error.is_some());
        assert_eq!(s.info_bar.as_str(), "/");
        assert_eq!(s.listing().map(|l| l.len()), Some(1));
        assert_eq!(s.logs.last().map(|l| l.level), Some(LogLevel::Error));
    }

    #[test]
    fn status_sets_title_progress_and_label() {
        let mut s = with_speaker("10.0.0.2");
        let rows = vec![speaker("10.0.0.2", "Artist - Song", 30, 120, true)];
        apply_outcome(&mut s, ok(Request::Status("10.0.0.2".into()), Response::Speakers(rows)));

        assert_eq!(s.now_playing.title, "Artist - Song");
        assert_eq!(s.now_playing.progress_pct, 25.0);
        assert_eq!(s.now_playing.play_label, PlayLabel::Pause);
    }

    #[test]
    fn failed_or_empty_status_keeps_display() {
        let mut s = with_speaker("10.0.0.2");
        let rows = vec![speaker("10.0.0.2", "Artist - Song", 30, 120, false)];
        apply_outcome(&mut s, ok(Request::Status("10.0.0.2".into()), Response::Speakers(rows)));
        let before = s.now_playing.clone();

        let applied = apply_outcome(&mut s, failed(Request::Status("10.0.0.2".into()), 503));
        assert_eq!(s.now_playing, before);
        assert_eq!(applied.error, None);

        apply_outcome(&mut s, ok(Request::Status("10.0.0.2".into()), Response::Speakers(Vec::new())));
        assert_eq!(s.now_playing, before);
    }

    #[test]
    fn speaker_list_deduplicates_and_selects_first() {
        let mut s = state();
        let rows = || {
            vec![
                speaker("10.0.0.2", "", 0, 0, false),
                speaker("10.0.0.3", "", 0, 0, false),
            ]
        };
        let applied = apply_outcome(&mut s, ok(Request::ListSpeakers, Response::Speakers(rows())));
        assert_eq!(applied.follow_up, vec![Action::RefreshStatus]);
        assert_eq!(s.selected_speaker(), Some("10.0.0.2"));

        let applied = apply_outcome(&mut s, ok(Request::ListSpeakers, Response::Speakers(rows())));
        assert!(applied.follow_up.is_empty());
        assert_eq!(s.speakers, vec!["10.0.0.2", "10.0.0.3"]);
    }

    #[test]
    fn preferred_speaker_wins_when_listed() {
        let mut s = AppState::new(String::new(), Some("10.0.0.3".into()));
        let rows = vec![
            speaker("10.0.0.2", "", 0, 0, false),
            speaker("10.0.0.3", "", 0, 0, false),
        ];
        apply_outcome(&mut s, ok(Request::ListSpeakers, Response::Speakers(rows)));
        assert_eq!(s.selected_speaker(), Some("10.0.0.3"));
    }

    #[test]
    fn speaker_actions_replace_the_list() {
        let mut s = state();
        let rows = vec![speaker("10.0.0.2", "x", 1, 2, true)];
        apply_outcome(&mut s, ok(Request::SpeakerActions("music/a.mp3".into()), Response::Speakers(rows)));

        assert_eq!(s.description, SPEAKERS_DESCRIPTION);
        assert_eq!(s.info_bar.as_str(), "music/a.mp3");
        assert!(matches!(&s.data_list, DataList::Speakers { target, rows } if target == "music/a.mp3" && rows.len() == 1));
    }

    #[test]
    fn follow_ups_per_control_call() {
        let mut s = with_speaker("10.0.0.2");
        let play = Request::Play {
            speaker: "10.0.0.2".into(),
            path: "a.mp3".into(),
        };
        assert_eq!(apply_outcome(&mut s, ok(play, Response::Done)).follow_up, vec![Action::RefreshStatus]);

        let next = Request::PlayOrNext {
            speaker: "10.0.0.3".into(),
            path: "a.mp3".into(),
            mode: PlayMode::Next,
        };
        assert_eq!(
            apply_outcome(&mut s, ok(next, Response::Done)).follow_up,
            vec![Action::ListFiles(BrowsePath::root())]
        );

        let volume = Request::Playback {
            speaker: "10.0.0.2".into(),
            action: TransportAction::VolumeUp,
        };
        assert!(apply_outcome(&mut s, ok(volume, Response::Done)).follow_up.is_empty());

        let stop = Request::Playback {
            speaker: "10.0.0.2".into(),
            action: TransportAction::Stop,
        };
        assert_eq!(apply_outcome(&mut s, ok(stop, Response::Done)).follow_up, vec![Action::RefreshStatus]);
    }
}
