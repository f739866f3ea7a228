//! Requests to the playback service, run as independent tasks.
//!
//! Every request carries the speaker and path it was built with, so the
//! outcome can be applied without consulting state that may have moved on.

use sonosbox_proto::{ApiClient, ApiResult, BrowsePath, PlayMode, SpeakerStatus, TransportAction};

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// List a slash-prefixed directory.
    ListFiles(BrowsePath),
    /// Fill the speaker selector.
    ListSpeakers,
    /// Fetch every speaker to offer play/next actions for `path`.
    SpeakerActions(String),
    /// Status of one speaker; an empty address asks for all of them.
    Status(String),
    Play {
        speaker: String,
        path: String,
    },
    PlayOrNext {
        speaker: String,
        path: String,
        mode: PlayMode,
    },
    Playback {
        speaker: String,
        action: TransportAction,
    },
}

impl Request {
    /// Short human-readable form for log lines.
    pub fn describe(&self) -> String {
        match self {
            Request::ListFiles(path) => format!("listing {}", path),
            Request::ListSpeakers => "speaker list".to_string(),
            Request::SpeakerActions(path) => format!("speakers for {}", path),
            Request::Status(speaker) if speaker.is_empty() => "status".to_string(),
            Request::Status(speaker) => format!("status of {}", speaker),
            Request::Play { speaker, path } => format!("play {} on {}", path, speaker),
            Request::PlayOrNext {
                speaker,
                path,
                mode,
            } => format!("{} {} on {}", mode.as_str(), path, speaker),
            Request::Playback { speaker, action } => {
                format!("{} on {}", action.as_str(), speaker)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Files(Vec<String>),
    Speakers(Vec<SpeakerStatus>),
    Done,
}

#[derive(Debug)]
pub struct Outcome {
    pub request: Request,
    pub result: ApiResult<Response>,
}

/// Run one request to completion.
pub async fn execute(client: &ApiClient, request: Request) -> Outcome {
    let result = match &request {
        Request::ListFiles(path) => client.list_files(path).await.map(Response::Files),
        Request::ListSpeakers | Request::SpeakerActions(_) => {
            client.list_speakers().await.map(Response::Speakers)
        }
        Request::Status(speaker) => client.speaker_status(speaker).await.map(Response::Speakers),
        Request::Play { speaker, path } => client
            .control(PlayMode::Play, speaker, path)
            .await
            .map(|()| Response::Done),
        Request::PlayOrNext {
            speaker,
            path,
            mode,
        } => client
            .control(*mode, speaker, path)
            .await
            .map(|()| Response::Done),
        Request::Playback { speaker, action } => client
            .playback(speaker, *action)
            .await
            .map(|()| Response::Done),
    };
    Outcome { request, result }
}
