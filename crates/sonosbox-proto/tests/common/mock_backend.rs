//! In-process stand-in for the playback service, bound to an ephemeral port.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;

/// Address the mock answers with 503 for every status request.
pub const FLAKY_SPEAKER: &str = "10.0.0.9";

pub struct MockBackend {
    pub base_url: String,
    /// Control calls seen so far, as `"<kind> <address> <path-or-action>"`.
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[derive(Clone)]
struct MockState {
    calls: Arc<Mutex<Vec<String>>>,
}

pub async fn spawn() -> MockBackend {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        calls: calls.clone(),
    };

    let app = Router::new()
        .route("/api/filelist/", get(list_root))
        .route("/api/filelist/*path", get(list_path))
        .route("/api/speakers/", get(all_speakers))
        .route("/api/speakers/:address", get(one_speaker))
        .route("/api/control/play/:address/*path", get(play))
        .route("/api/control/next/:address/*path", get(next))
        .route("/api/control/playback/:address/:action", get(playback))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend {
        base_url: format!("http://{}", addr),
        calls,
    }
}

/// A base URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{}", addr)
}

fn speakers() -> serde_json::Value {
    json!([
        {"ip": "10.0.0.2", "trackname": "Artist - Song", "trackduration": 120,
         "trackelapsed": 30, "volume": 14, "is_playing": true},
        {"ip": "10.0.0.3", "trackname": "None", "trackduration": 0,
         "trackelapsed": 0, "volume": 10, "is_playing": false}
    ])
}

async fn list_root() -> Json<Vec<&'static str>> {
    Json(vec!["rock/", "Zappa.mp3", "ambient.flac"])
}

async fn list_path(Path(path): Path<String>) -> Response {
    match path.as_str() {
        "rock/" => Json(vec!["b-side.mp3", "anthem.mp3"]).into_response(),
        "My Music/" => Json(vec!["track.ogg"]).into_response(),
        "broken/" => "definitely not json".into_response(),
        "pending/" => StatusCode::ACCEPTED.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn all_speakers() -> Json<serde_json::Value> {
    Json(speakers())
}

async fn one_speaker(Path(address): Path<String>) -> Response {
    if address == FLAKY_SPEAKER {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    let matching: Vec<serde_json::Value> = speakers()
        .as_array()
        .map(|all| {
            all.iter()
                .filter(|s| s["ip"] == address.as_str())
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(matching).into_response()
}

fn record(state: &MockState, entry: String) {
    if let Ok(mut calls) = state.calls.lock() {
        calls.push(entry);
    }
}

async fn play(
    State(state): State<MockState>,
    Path((address, path)): Path<(String, String)>,
) -> Json<()> {
    record(&state, format!("play {} {}", address, path));
    Json(())
}

async fn next(
    State(state): State<MockState>,
    Path((address, path)): Path<(String, String)>,
) -> Json<()> {
    record(&state, format!("next {} {}", address, path));
    Json(())
}

async fn playback(
    State(state): State<MockState>,
    Path((address, action)): Path<(String, String)>,
) -> Response {
    match action.as_str() {
        "play" | "pause" | "stop" | "next" | "previous" | "queue-clear" | "v-inc" | "v-dec" => {
            record(&state, format!("playback {} {}", address, action));
            Json(()).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
