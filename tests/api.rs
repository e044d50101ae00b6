//! End-to-end tests for the prediction API.
//!
//! Drives the full router in-process over a synthetic dataset, asserting the
//! exact error strings and response shape the endpoint promises.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde_json::{json, Value};
use tower::ServiceExt;

use climacast::models::RECOMMENDATIONS;
use climacast::{routes, Config, Dataset, WeatherRecord};

// ---

fn record(
    station: &str,
    district: &str,
    state: &str,
    date: NaiveDate,
    lat: f64,
    lon: f64,
    avg_temp: f64,
) -> WeatherRecord {
    // ---
    WeatherRecord {
        station_name: station.to_string(),
        district: district.to_string(),
        state: state.to_string(),
        date,
        year: date.year(),
        month: date.month(),
        day: date.day(),
        wind_speed: 10.0,
        air_pressure: 1006.0,
        rainfall: 2.0,
        elevation: 20.0,
        latitude: lat,
        longitude: lon,
        avg_temp,
    }
}

/// Two stations with enough history to train on.
fn test_router() -> axum::Router {
    // ---
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    let mut records = Vec::new();
    for i in 0..48i64 {
        let date = start + Duration::days(i * 7);
        records.push(record(
            "santacruz",
            "mumbai",
            "maharashtra",
            date,
            19.08,
            72.85,
            28.0 + (i % 5) as f64,
        ));
        records.push(record(
            "safdarjung",
            "new delhi",
            "delhi",
            date,
            28.58,
            77.21,
            24.0 + (i % 9) as f64,
        ));
    }

    let dataset = Arc::new(Dataset::from_records(records));
    let config = Config {
        data_path: "unused".to_string(),
        port: 8080,
    };
    routes::router(dataset, config)
}

async fn predict(body: Value) -> (StatusCode, Value) {
    // ---
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Assert an error payload: `{"error": message}` at transport status 200,
/// with no other fields.
fn assert_error(status: StatusCode, body: &Value, message: &str) {
    // ---
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], message);
    assert_eq!(body.as_object().unwrap().len(), 1, "unexpected extra fields");
}

// ---

#[tokio::test]
async fn missing_input_is_rejected() {
    // ---
    let (status, body) = predict(json!({"location": "", "date": "2999-01-01"})).await;
    assert_error(status, &body, "Please provide both location and date.");

    let (status, body) = predict(json!({"location": "mumbai", "date": "  "})).await;
    assert_error(status, &body, "Please provide both location and date.");

    // Absent keys behave like blank values
    let (status, body) = predict(json!({})).await;
    assert_error(status, &body, "Please provide both location and date.");
}

#[tokio::test]
async fn unknown_location_is_rejected() {
    // ---
    let (status, body) = predict(json!({"location": "qqq", "date": "2999-01-01"})).await;
    assert_error(status, &body, "No similar location found.");
}

#[tokio::test]
async fn past_date_is_rejected() {
    // ---
    let (status, body) = predict(json!({"location": "mumbai", "date": "2020-01-01"})).await;
    assert_error(status, &body, "Date must be in the future.");
}

#[tokio::test]
async fn today_is_not_in_the_future() {
    // ---
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let (status, body) = predict(json!({"location": "mumbai", "date": today})).await;
    assert_error(status, &body, "Date must be in the future.");
}

#[tokio::test]
async fn unparseable_date_is_rejected() {
    // ---
    let (status, body) = predict(json!({"location": "mumbai", "date": "next tuesday"})).await;
    assert_error(status, &body, "Invalid date format.");
}

#[tokio::test]
async fn prediction_has_full_response_shape() {
    // ---
    let target = Local::now().date_naive() + Duration::days(30);
    let target_str = target.format("%Y-%m-%d").to_string();

    // A typo'd location still resolves
    let (status, body) = predict(json!({"location": "Mumbay", "date": target_str})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("error").is_none(), "unexpected error: {body}");
    assert_eq!(body["location"], "Mumbai");
    assert_eq!(body["date"], target_str);
    assert!(body["temperature"].is_number());
    assert!(RECOMMENDATIONS.contains(&body["recommendation"].as_str().unwrap()));

    // The forecast has exactly 7 entries, dated consecutively from today,
    // independent of the requested date
    let today = Local::now().date_naive();
    let forecast = body["forecast"].as_array().unwrap();
    assert_eq!(forecast.len(), 7);
    for (i, day) in forecast.iter().enumerate() {
        let expected = (today + Duration::days(i as i64))
            .format("%Y-%m-%d")
            .to_string();
        assert_eq!(day["date"], expected);
        assert!(day["temp"].is_number());
    }
}

#[tokio::test]
async fn prediction_is_deterministic_across_requests() {
    // ---
    let target = (Local::now().date_naive() + Duration::days(14))
        .format("%Y-%m-%d")
        .to_string();
    let request = json!({"location": "santacruz", "date": target});

    let (_, first) = predict(request.clone()).await;
    let (_, second) = predict(request).await;

    // Same subset, same seed: two independent fits predict identically
    assert_eq!(first["temperature"], second["temperature"]);
    assert_eq!(first["forecast"], second["forecast"]);
}

#[tokio::test]
async fn health_endpoint_responds() {
    // ---
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn landing_page_is_served() {
    // ---
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("predict-btn"));
}
