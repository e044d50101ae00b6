use std::sync::Arc;

use axum::Router;

use crate::{Config, Dataset};

mod health;
mod home;
mod predict;

// ---

pub fn router(dataset: Arc<Dataset>, config: Config) -> Router {
    // ---
    Router::new()
        .merge(predict::router())
        .merge(home::router())
        .merge(health::router())
        .with_state((dataset, config))
}
