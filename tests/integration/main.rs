//! End-to-end tests for the song store HTTP API.
//!
//! The router is driven in-process; no socket is opened.
//! Run with: cargo test --test integration

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use song_store::api::{create_router, AppState};
use song_store::store::Song;

/// Send one request and return the status plus the raw body text.
async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .expect("request should build");

    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

async fn create(app: &Router, title: &str, artist: &str, duration: &str) -> Song {
    let (status, body) = call(
        app,
        Method::POST,
        "/songs",
        Some(json!({"title": title, "artist": artist, "duration": duration})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).expect("created song should be JSON")
}

async fn list(app: &Router) -> Vec<Song> {
    let (status, body) = call(app, Method::GET, "/songs", None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).expect("song list should be JSON")
}

/// The documented create, create, delete, list, update walkthrough.
#[tokio::test]
async fn catalogue_walkthrough() {
    let app = create_router(AppState::new());

    let (status, body) = call(
        &app,
        Method::POST,
        "/songs",
        Some(json!({"title": "A", "artist": "B", "duration": "3:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"id": 1, "title": "A", "artist": "B", "duration": "3:00"})
    );

    let (status, body) = call(
        &app,
        Method::POST,
        "/songs",
        Some(json!({"title": "C", "artist": "D", "duration": "2:30"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["id"], 2);

    let (status, body) = call(&app, Method::DELETE, "/songs/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"message": "Song deleted"})
    );

    assert_eq!(list(&app).await, vec![Song::new("C", "D", "2:30").with_id(2)]);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/songs/2",
        Some(json!({"title": "E", "artist": "D", "duration": "2:30"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"id": 2, "title": "E", "artist": "D", "duration": "2:30"})
    );
}

#[tokio::test]
async fn ids_strictly_increase_across_deletes() {
    let app = create_router(AppState::new());
    let mut last_id = 0;

    for round in 0..5 {
        let song = create(&app, &format!("song {round}"), "artist", "1:00").await;
        assert!(song.id > last_id, "id {} not greater than {}", song.id, last_id);
        last_id = song.id;

        if round % 2 == 0 {
            let (status, _) = call(&app, Method::DELETE, &format!("/songs/{}", song.id), None).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    assert_eq!(last_id, 5);
    let ids: Vec<_> = list(&app).await.into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2, 4]);
}

#[tokio::test]
async fn get_returns_what_was_posted() {
    let app = create_router(AppState::new());
    let created = create(&app, "Blue in Green", "Miles Davis", "5:37").await;

    let (status, body) = call(&app, Method::GET, &format!("/songs/{}", created.id), None).await;
    assert_eq!(status, StatusCode::OK);

    let fetched: Song = serde_json::from_str(&body).unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn deleted_song_disappears_everywhere() {
    let app = create_router(AppState::new());
    let keep = create(&app, "keep", "x", "1:00").await;
    let gone = create(&app, "gone", "y", "2:00").await;

    let (status, _) = call(&app, Method::DELETE, &format!("/songs/{}", gone.id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::GET, &format!("/songs/{}", gone.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.trim(), "Song not found");

    assert_eq!(list(&app).await, vec![keep]);
}

#[tokio::test]
async fn update_keeps_path_id() {
    let app = create_router(AppState::new());
    let song = create(&app, "old", "artist", "1:00").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/songs/{}", song.id),
        Some(json!({"id": 1000, "title": "new", "artist": "artist", "duration": "1:30"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let updated: Song = serde_json::from_str(&body).unwrap();
    assert_eq!(updated, Song::new("new", "artist", "1:30").with_id(song.id));
    assert_eq!(list(&app).await, vec![updated]);
}

#[tokio::test]
async fn non_numeric_id_is_rejected_with_or_without_songs() {
    let app = create_router(AppState::new());

    let (status, _) = call(&app, Method::GET, "/songs/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    create(&app, "a", "b", "c").await;

    let (status, body) = call(&app, Method::GET, "/songs/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.trim(), "Invalid song ID");
}

#[tokio::test]
async fn concurrent_posts_never_share_an_id() {
    let app = create_router(AppState::new());

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move { create(&app, &format!("t{i}"), "a", "1:00").await.id })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.expect("task should not panic"));
    }
    ids.sort_unstable();

    assert_eq!(ids, (1..=20).collect::<Vec<_>>());
}

#[test]
fn fresh_state_is_empty() {
    let state = AppState::new();
    assert!(tokio_test::block_on(state.store.is_empty()));
    assert_eq!(tokio_test::block_on(state.store.next_id()), 1);
}
