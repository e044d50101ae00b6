use std::sync::Arc;

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, response::Response, routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use tracing::{debug, error, info};

use crate::models::{recommendation, title_case, ApiError, ForecastPoint, PredictResponse};
use crate::predictor::{round2, LocationModel};
use crate::{matching, Config, Dataset, PredictRequest};

// ---

pub fn router() -> Router<(Arc<Dataset>, Config)> {
    // ---
    Router::new().route("/predict", post(handler))
}

async fn handler(
    State((dataset, _config)): State<(Arc<Dataset>, Config)>,
    Json(req): Json<PredictRequest>,
) -> Response {
    // ---
    info!("POST /predict - Starting pipeline");

    let location = req.location.trim().to_lowercase();
    let date_str = req.date.trim().to_string();

    if location.is_empty() || date_str.is_empty() {
        return reject("Please provide both location and date.");
    }

    // Step 1: Resolve the location against the known names
    debug!("POST /predict - Step 1");

    let Some(matched) = matching::best_match(&location, dataset.locations()) else {
        return reject("No similar location found.");
    };
    debug!(
        "Resolved '{}' to '{}' (score {:.2})",
        location, matched.name, matched.score
    );

    // Step 2: Collect that location's history
    debug!("POST /predict - Step 2");

    let subset = dataset.subset(&matched.name);
    if subset.is_empty() {
        // Unreachable in practice: the resolver only returns names taken
        // from the dataset itself
        return reject(&format!("No data found for {location}."));
    }

    // Step 3: Train a fresh forest on the subset
    debug!("POST /predict - Step 3, {} rows", subset.len());

    let model = match LocationModel::train(&subset) {
        Ok(model) => model,
        Err(e) => {
            error!("Failed to train model for '{}': {}", matched.name, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: "Model training failed".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Step 4: Point prediction for the requested date
    debug!("POST /predict - Step 4");

    let Ok(target) = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") else {
        return reject("Invalid date format.");
    };
    let today = Local::now().date_naive();
    if target <= today {
        return reject("Date must be in the future.");
    }

    let predicted = match model.predict_for(target) {
        Ok(temp) => temp,
        Err(e) => {
            error!("Prediction failed for '{}': {}", matched.name, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: "Prediction failed".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Step 5: Rolling 7-day forecast, anchored to today regardless of the
    // requested date
    debug!("POST /predict - Step 5");

    let forecast = match model.forecast_from(today) {
        Ok(points) => points
            .into_iter()
            .map(|(date, temp)| ForecastPoint {
                date: date.format("%Y-%m-%d").to_string(),
                temp,
            })
            .collect(),
        Err(e) => {
            error!("Forecast failed for '{}': {}", matched.name, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: "Prediction failed".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Step 6: Assemble the response
    let response = PredictResponse {
        location: title_case(&matched.name),
        date: target.format("%Y-%m-%d").to_string(),
        temperature: round2(predicted),
        forecast,
        recommendation: recommendation(predicted).to_string(),
    };

    info!(
        "Predicted {:.2}°C for '{}' on {}",
        response.temperature, response.location, response.date
    );
    (StatusCode::OK, Json(response)).into_response()
}

// ---

/// All recoverable request failures travel through the normal 200 channel as
/// `{"error": message}`, never as a transport-level failure code.
fn reject(message: &str) -> Response {
    // ---
    debug!("POST /predict - Rejected: {message}");
    (
        StatusCode::OK,
        Json(ApiError {
            error: message.to_string(),
        }),
    )
        .into_response()
}
