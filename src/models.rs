//! Data models for the temperature prediction pipeline.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---

/// Raw historical observation as it appears in the dataset file.
///
/// `avg_temp` and `date_of_record` are optional because source rows may leave
/// them blank; such rows are dropped during cleaning.
#[derive(Debug, Deserialize)]
pub struct RawWeatherRecord {
    // ---
    pub station_name: String,
    pub district: String,
    pub state: String,
    pub date_of_record: String,
    pub wind_speed: f64,
    pub air_pressure: f64,
    pub rainfall: f64,
    pub elevation: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub avg_temp: Option<f64>,
}

/// Cleaned historical observation used for matching and training.
///
/// Identity columns are lowercased and trimmed so location matching is
/// case-insensitive; `year`/`month`/`day` are derived once from the record
/// date and consumed as model features.
#[derive(Debug, Clone)]
pub struct WeatherRecord {
    // ---
    pub station_name: String,
    pub district: String,
    pub state: String,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub wind_speed: f64,
    pub air_pressure: f64,
    pub rainfall: f64,
    pub elevation: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub avg_temp: f64,
}

/// Cleaning / normalization helpers
impl RawWeatherRecord {
    // ---
    /// Convert a raw row into a cleaned record.
    ///
    /// Returns `None` when the row is unusable: missing average temperature,
    /// or a blank/unparseable record date.
    pub fn clean(&self) -> Option<WeatherRecord> {
        // ---
        let avg_temp = self.avg_temp?;
        let date = NaiveDate::parse_from_str(self.date_of_record.trim(), "%Y-%m-%d").ok()?;

        Some(WeatherRecord {
            station_name: normalize(&self.station_name),
            district: normalize(&self.district),
            state: normalize(&self.state),
            date,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            wind_speed: self.wind_speed,
            air_pressure: self.air_pressure,
            rainfall: self.rainfall,
            elevation: self.elevation,
            latitude: self.latitude,
            longitude: self.longitude,
            avg_temp,
        })
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

// ---

/// All advisory messages, in descending temperature order.
pub const RECOMMENDATIONS: [&str; 5] = [
    "🔥 It's quite hot! Stay hydrated and avoid going out during noon.",
    "🌤️ Pleasant weather! Great time for outdoor activities.",
    "☁️ Mildly cool weather — consider light clothing.",
    "❄️ Cool weather — wear something warm.",
    "🥶 Cold conditions — stay warm and drink something hot!",
];

/// Advisory message for a predicted temperature (°C).
///
/// The five bands are exhaustive and non-overlapping: every temperature maps
/// to exactly one message. Band edges: above 32 is hot, 25..=32 pleasant,
/// 20..25 mildly cool, 15..20 cool, below 15 cold.
pub fn recommendation(temp: f64) -> &'static str {
    // ---
    if temp > 32.0 {
        RECOMMENDATIONS[0]
    } else if temp >= 25.0 {
        RECOMMENDATIONS[1]
    } else if temp >= 20.0 {
        RECOMMENDATIONS[2]
    } else if temp >= 15.0 {
        RECOMMENDATIONS[3]
    } else {
        RECOMMENDATIONS[4]
    }
}

/// Title-case a normalized (lowercase) location name for display.
///
/// Uppercases the first letter of every alphabetic run, e.g.
/// `"tamil nadu"` → `"Tamil Nadu"`.
pub fn title_case(s: &str) -> String {
    // ---
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

// ---

/// JSON request body for `POST /predict`.
///
/// Missing keys deserialize to empty strings, matching the "treat absent as
/// blank" behavior the endpoint promises.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    // ---
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
}

/// One day of the 7-day forecast.
#[derive(Debug, Serialize)]
pub struct ForecastPoint {
    // ---
    pub date: String,
    pub temp: f64,
}

/// Successful `POST /predict` response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    // ---
    pub location: String,
    pub date: String,
    pub temperature: f64,
    pub forecast: Vec<ForecastPoint>,
    pub recommendation: String,
}

/// Error payload returned through the normal 200 channel for all recoverable
/// request failures.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}
