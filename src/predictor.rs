//! Per-location model training and forecasting.
//!
//! A fresh random forest is fitted on every request from the resolved
//! location's history. The fit cost is proportional to subset size times tree
//! count and is paid synchronously on the request path; there is no caching
//! across requests.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::model_selection::train_test_split;

use crate::models::WeatherRecord;

// ---

/// Days covered by the rolling forecast, starting today.
pub const FORECAST_DAYS: usize = 7;

/// Fraction of the subset held out by the train/test split. The holdout is
/// never evaluated on the request path; the split itself is part of the
/// training contract.
const HOLDOUT_FRACTION: f32 = 0.2;

/// Seed shared by the split shuffle and the forest, for reproducible fits.
const TRAINING_SEED: u64 = 42;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Mean weather conditions over a location's history.
///
/// Future dates have no observed weather, so predictions hold these means
/// constant and vary only the date features.
#[derive(Debug, Clone, Copy)]
pub struct ClimateNormals {
    // ---
    pub wind_speed: f64,
    pub air_pressure: f64,
    pub rainfall: f64,
    pub elevation: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl ClimateNormals {
    fn from_subset(rows: &[&WeatherRecord]) -> Self {
        // ---
        let n = rows.len() as f64;
        let mut sums = [0.0f64; 6];
        for r in rows {
            sums[0] += r.wind_speed;
            sums[1] += r.air_pressure;
            sums[2] += r.rainfall;
            sums[3] += r.elevation;
            sums[4] += r.latitude;
            sums[5] += r.longitude;
        }
        Self {
            wind_speed: sums[0] / n,
            air_pressure: sums[1] / n,
            rainfall: sums[2] / n,
            elevation: sums[3] / n,
            latitude: sums[4] / n,
            longitude: sums[5] / n,
        }
    }
}

/// A forest fitted on one location's history, ready for single-date
/// inference. Ephemeral: built per request, never persisted.
pub struct LocationModel {
    forest: Forest,
    normals: ClimateNormals,
}

impl LocationModel {
    // ---
    /// Fit a 50-tree random forest on the subset's 9 features
    /// (wind speed, air pressure, rainfall, elevation, latitude, longitude,
    /// year, month, day) against the average temperature.
    ///
    /// The subset is shuffled and split 80/20 with a fixed seed before
    /// fitting. Fails on an empty subset or if the underlying fit fails.
    pub fn train(rows: &[&WeatherRecord]) -> Result<Self> {
        // ---
        if rows.is_empty() {
            return Err(anyhow!("cannot train on an empty location subset"));
        }

        let features: Vec<Vec<f64>> = rows.iter().map(|r| feature_row(r)).collect();
        let target: Vec<f64> = rows.iter().map(|r| r.avg_temp).collect();

        let x = DenseMatrix::from_2d_vec(&features);
        let (x_train, _x_holdout, y_train, _y_holdout) =
            train_test_split(&x, &target, HOLDOUT_FRACTION, true, Some(TRAINING_SEED));

        let params = RandomForestRegressorParameters::default()
            .with_n_trees(50)
            .with_seed(TRAINING_SEED);
        let forest = RandomForestRegressor::fit(&x_train, &y_train, params)
            .map_err(|e| anyhow!("random forest fit failed: {e}"))?;

        Ok(Self {
            forest,
            normals: ClimateNormals::from_subset(rows),
        })
    }

    /// Predict the average temperature for a single date, using the
    /// location's climate normals for the non-date features. Unrounded.
    pub fn predict_for(&self, date: NaiveDate) -> Result<f64> {
        // ---
        let input = DenseMatrix::from_2d_vec(&vec![self.feature_vector(date)]);
        let output = self
            .forest
            .predict(&input)
            .map_err(|e| anyhow!("prediction failed: {e}"))?;
        output
            .first()
            .copied()
            .ok_or_else(|| anyhow!("predictor returned no output"))
    }

    /// Predict [`FORECAST_DAYS`] consecutive days beginning at `start`,
    /// each rounded to 2 decimals.
    pub fn forecast_from(&self, start: NaiveDate) -> Result<Vec<(NaiveDate, f64)>> {
        // ---
        (0..FORECAST_DAYS)
            .map(|i| {
                let date = start + Duration::days(i as i64);
                Ok((date, round2(self.predict_for(date)?)))
            })
            .collect()
    }

    fn feature_vector(&self, date: NaiveDate) -> Vec<f64> {
        // ---
        let n = &self.normals;
        vec![
            n.wind_speed,
            n.air_pressure,
            n.rainfall,
            n.elevation,
            n.latitude,
            n.longitude,
            f64::from(date.year()),
            f64::from(date.month()),
            f64::from(date.day()),
        ]
    }
}

fn feature_row(r: &WeatherRecord) -> Vec<f64> {
    // ---
    vec![
        r.wind_speed,
        r.air_pressure,
        r.rainfall,
        r.elevation,
        r.latitude,
        r.longitude,
        f64::from(r.year),
        f64::from(r.month),
        f64::from(r.day),
    ]
}

/// Round to 2 decimal places for presentation.
pub fn round2(t: f64) -> f64 {
    (t * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    /// One synthetic station with a mild seasonal temperature cycle.
    fn sample_subset() -> Vec<WeatherRecord> {
        // ---
        (0..60)
            .map(|i| {
                let date =
                    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + Duration::days(i as i64 * 6);
                let season = f64::from(date.month() as i32 - 6).abs();
                WeatherRecord {
                    station_name: "santacruz".to_string(),
                    district: "mumbai".to_string(),
                    state: "maharashtra".to_string(),
                    date,
                    year: date.year(),
                    month: date.month(),
                    day: date.day(),
                    wind_speed: 10.0 + (i % 7) as f64,
                    air_pressure: 1005.0 + (i % 5) as f64,
                    rainfall: (i % 11) as f64,
                    elevation: 14.0,
                    latitude: 19.08,
                    longitude: 72.85,
                    avg_temp: 32.0 - season * 1.5 + (i % 3) as f64 * 0.4,
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_subset_fails() {
        // ---
        assert!(LocationModel::train(&[]).is_err());
    }

    #[test]
    fn test_training_is_deterministic() {
        // ---
        let records = sample_subset();
        let subset: Vec<&WeatherRecord> = records.iter().collect();

        let a = LocationModel::train(&subset).unwrap();
        let b = LocationModel::train(&subset).unwrap();

        for days_ahead in [1, 30, 180] {
            let date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap() + Duration::days(days_ahead);
            assert_eq!(
                a.predict_for(date).unwrap(),
                b.predict_for(date).unwrap(),
                "fits diverged {days_ahead} days ahead"
            );
        }
    }

    #[test]
    fn test_prediction_is_in_a_sane_range() {
        // ---
        let records = sample_subset();
        let subset: Vec<&WeatherRecord> = records.iter().collect();
        let model = LocationModel::train(&subset).unwrap();

        // A forest averages observed targets, so predictions stay within the
        // training range (roughly 24 to 33 here)
        let t = model
            .predict_for(NaiveDate::from_ymd_opt(2022, 6, 15).unwrap())
            .unwrap();
        assert!((20.0..=35.0).contains(&t), "prediction out of range: {t}");
    }

    #[test]
    fn test_forecast_covers_seven_consecutive_days() {
        // ---
        let records = sample_subset();
        let subset: Vec<&WeatherRecord> = records.iter().collect();
        let model = LocationModel::train(&subset).unwrap();

        let start = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
        let forecast = model.forecast_from(start).unwrap();

        assert_eq!(forecast.len(), FORECAST_DAYS);
        for (i, (date, temp)) in forecast.iter().enumerate() {
            assert_eq!(*date, start + Duration::days(i as i64));
            // Rounded to 2 decimals
            assert_eq!(*temp, round2(*temp));
        }
    }

    #[test]
    fn test_round2() {
        // ---
        assert_eq!(round2(29.4567), 29.46);
        assert_eq!(round2(29.454), 29.45);
        assert_eq!(round2(30.0), 30.0);
    }
}
