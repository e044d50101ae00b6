// src/routes/home.rs
//! Landing page for the climacast backend.
//!
//! Serves the static prediction form at `GET /`. The markup is embedded at
//! compile time so the binary has no runtime asset directory to locate; the
//! page posts to `/predict` and renders the JSON response client-side.

use axum::{response::Html, routing::get, Router};

/// Landing page markup, embedded at compile time.
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Handle `GET /`.
async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Create a subrouter containing the `/` route.
///
/// Generic over the application state so it merges cleanly with the gateway
/// router.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(home))
}
