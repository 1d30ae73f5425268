//! HTTP API route definitions.

use axum::{
    extract::{MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_song, delete_song, get_song, health, list_songs, metrics_text, missing_song_id,
    song_method_not_allowed, songs_method_not_allowed, update_song, AppState,
};
use crate::metrics::{inc_http_requests, RequestTimer};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Song collection
        .route(
            "/songs",
            get(list_songs)
                .post(create_song)
                .head(songs_method_not_allowed)
                .fallback(songs_method_not_allowed),
        )
        // Single song; the remainder after the prefix is parsed as the id
        .route(
            "/songs/*id",
            get(get_song)
                .put(update_song)
                .delete(delete_song)
                .head(song_method_not_allowed)
                .fallback(song_method_not_allowed),
        )
        .route("/songs/", any(missing_song_id))
        // Operational endpoints
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .route_layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Count and time every routed request, labelled by its route template.
async fn track_requests(request: Request, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let timer = RequestTimer::new(endpoint.as_str());
    let response = next.run(request).await;
    inc_http_requests(&endpoint, response.status().as_u16());
    drop(timer);

    response
}
