//! Library crate for the `climacast` temperature prediction service.
//!
//! The binary in `main.rs` wires these modules together; they are exposed as
//! a library so integration tests can drive the router in-process. Module
//! boundaries follow the Explicit Module Boundary Pattern (EMBP):
//! - `config` – environment-based configuration
//! - `models` – domain records, wire types, recommendation bands
//! - `dataset` – startup-time CSV load into an immutable store
//! - `matching` – fuzzy location resolution
//! - `predictor` – per-request random-forest training and forecasting
//! - `routes` – the HTTP gateway and its endpoint subrouters

pub mod config;
pub mod dataset;
pub mod matching;
pub mod models;
pub mod predictor;
pub mod routes;

pub use config::Config;
pub use dataset::Dataset;

// Re-exported for routes/*.rs and the integration tests, so those modules
// only need knowledge of the crate root rather than of models.rs directly
pub use models::{PredictRequest, WeatherRecord};
