//! ApiClient against an in-process mock of the playback service.

mod common;

use std::time::Duration;

use common::mock_backend::{self, FLAKY_SPEAKER};
use sonosbox_proto::{ApiClient, ApiError, BrowsePath, FileListing, PlayMode, TransportAction};

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(2)).expect("client should initialize")
}

#[tokio::test]
async fn lists_root_and_subdirectories() {
    let backend = mock_backend::spawn().await;
    let api = client(&backend.base_url);

    let root = api.list_files(&BrowsePath::new("")).await.unwrap();
    let listing = FileListing::new(BrowsePath::root(), root);
    assert_eq!(listing.entries, vec!["Zappa.mp3", "ambient.flac", "rock/"]);

    let rock = api.list_files(&BrowsePath::new("/rock/")).await.unwrap();
    assert_eq!(rock.len(), 2);
}

#[tokio::test]
async fn listing_paths_are_percent_encoded() {
    let backend = mock_backend::spawn().await;
    let api = client(&backend.base_url);

    let names = api.list_files(&BrowsePath::new("/My Music/")).await.unwrap();
    assert_eq!(names, vec!["track.ogg"]);
}

#[tokio::test]
async fn missing_directory_is_a_status_error() {
    let backend = mock_backend::spawn().await;
    let api = client(&backend.base_url);

    let err = api.list_files(&BrowsePath::new("/nope/")).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn success_other_than_200_is_a_status_error() {
    let backend = mock_backend::spawn().await;
    let api = client(&backend.base_url);

    let err = api.list_files(&BrowsePath::new("/pending/")).await.unwrap_err();
    assert_eq!(err.status(), Some(202));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let backend = mock_backend::spawn().await;
    let api = client(&backend.base_url);

    let err = api.list_files(&BrowsePath::new("/broken/")).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn speaker_status_filters_by_address() {
    let backend = mock_backend::spawn().await;
    let api = client(&backend.base_url);

    let all = api.list_speakers().await.unwrap();
    assert_eq!(all.len(), 2);

    let one = api.speaker_status("10.0.0.2").await.unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].track_name, "Artist - Song");
    assert_eq!(one[0].progress_percent(), 25.0);

    // An empty selection asks for every speaker.
    let unselected = api.speaker_status("").await.unwrap();
    assert_eq!(unselected.len(), 2);

    let err = api.speaker_status(FLAKY_SPEAKER).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn control_calls_reach_the_service() {
    let backend = mock_backend::spawn().await;
    let api = client(&backend.base_url);

    api.control(PlayMode::Play, "10.0.0.2", "/music/my song.mp3")
        .await
        .unwrap();
    api.control(PlayMode::Next, "10.0.0.3", "music/b.mp3")
        .await
        .unwrap();
    api.playback("10.0.0.2", TransportAction::Pause).await.unwrap();
    api.playback("10.0.0.2", TransportAction::VolumeUp)
        .await
        .unwrap();
    api.playback("10.0.0.2", TransportAction::QueueClear)
        .await
        .unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            "play 10.0.0.2 music/my song.mp3",
            "next 10.0.0.3 music/b.mp3",
            "playback 10.0.0.2 pause",
            "playback 10.0.0.2 v-inc",
            "playback 10.0.0.2 queue-clear",
        ]
    );
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let api = client(&mock_backend::dead_url().await);

    let err = api.list_speakers().await.unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
}
