//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::metrics;
use crate::store::{DeleteResponse, Song, SongId, SongStore};
use crate::utils::parse_song_id;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// The song catalogue.
    pub store: Arc<SongStore>,
    /// Prometheus handle, present when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state with an empty store and no metrics exporter.
    pub fn new() -> Self {
        Self {
            store: Arc::new(SongStore::new()),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
    /// Number of songs currently stored.
    pub songs: usize,
}

/// Decode the first JSON value in `body` as a song.
///
/// Trailing bytes after that value are ignored. A `null` body decodes to an
/// empty song. An empty body fails with `EOF`.
pub fn decode_song(body: &[u8]) -> Result<Song, ApiError> {
    let mut stream = serde_json::Deserializer::from_slice(body).into_iter::<Option<Song>>();
    match stream.next() {
        Some(Ok(song)) => Ok(song.unwrap_or_default()),
        Some(Err(e)) => Err(e.into()),
        None => Err(ApiError::Decode("EOF".to_string())),
    }
}

fn song_id(raw: &str) -> Result<SongId, ApiError> {
    let raw = raw.strip_prefix('/').unwrap_or(raw);
    parse_song_id(raw).ok_or(ApiError::InvalidId)
}

/// `GET /songs` - every song in insertion order.
pub async fn list_songs(State(state): State<AppState>) -> Json<Vec<Song>> {
    let songs = state.store.list().await;
    debug!(count = songs.len(), "Listing songs");
    Json(songs)
}

/// `POST /songs` - store a new song and return it with its assigned id.
///
/// Responds 200, not 201.
pub async fn create_song(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Song>, ApiError> {
    let song = decode_song(&body).inspect_err(|e| debug!(error = %e, "Rejected song body"))?;

    let song = state.store.create(song).await;
    metrics::inc_songs_created();
    info!(id = song.id, title = %song.title, "Song created");

    Ok(Json(song))
}

/// `GET /songs/{id}`.
pub async fn get_song(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Song>, ApiError> {
    let id = song_id(&raw)?;
    state.store.get(id).await.map(Json).ok_or(ApiError::NotFound)
}

/// `PUT /songs/{id}` - full replacement, keeping the path id.
///
/// The body is only decoded once the id is known to exist, so a bad body
/// for a missing song yields 404.
pub async fn update_song(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Bytes,
) -> Result<Json<Song>, ApiError> {
    let id = song_id(&raw)?;

    let song = state
        .store
        .update(id, || decode_song(&body))
        .await?
        .ok_or(ApiError::NotFound)?;

    metrics::inc_songs_updated();
    info!(id, title = %song.title, "Song updated");

    Ok(Json(song))
}

/// `DELETE /songs/{id}`.
pub async fn delete_song(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = song_id(&raw)?;

    state.store.delete(id).await.ok_or(ApiError::NotFound)?;
    metrics::inc_songs_deleted();
    info!(id, "Song deleted");

    Ok(Json(DeleteResponse::deleted()))
}

/// Any unsupported method on `/songs`.
pub async fn songs_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Any unsupported method on `/songs/{id}`. The id is still validated first.
pub async fn song_method_not_allowed(Path(raw): Path<String>) -> ApiError {
    match song_id(&raw) {
        Ok(_) => ApiError::MethodNotAllowed,
        Err(e) => e,
    }
}

/// `/songs/` with nothing after the slash.
pub async fn missing_song_id() -> ApiError {
    ApiError::InvalidId
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        songs: state.store.len().await,
    })
}

/// Prometheus exposition, or 404 when no recorder is installed.
pub async fn metrics_text(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
