//! In-memory historical weather store for `climacast`.
//!
//! Loads the dataset once on startup from `main.rs` (EMBP: single gateway
//! call), cleans it, and serves read-only views to request handlers for the
//! lifetime of the process. A load failure is fatal; requests never observe a
//! partially loaded store.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;

use anyhow::{bail, Context, Result};

use crate::models::{RawWeatherRecord, WeatherRecord};

// ---

/// The full cleaned dataset plus the distinct location-name candidates.
///
/// Immutable after construction; shared into handlers behind an `Arc` with no
/// locking needed.
#[derive(Debug)]
pub struct Dataset {
    records: Vec<WeatherRecord>,
    locations: Vec<String>,
}

impl Dataset {
    // ---
    /// Load and clean the dataset from a CSV file.
    ///
    /// Rows missing the average temperature or a parseable record date are
    /// dropped; identity columns are lowercased and trimmed. Errors are
    /// propagated if the file is unreadable or yields no usable rows
    /// (e.g. a schema mismatch fails every row).
    pub fn load(path: &str) -> Result<Self> {
        // ---
        let file =
            File::open(path).with_context(|| format!("Failed to open dataset '{path}'"))?;
        Self::from_reader(file)
    }

    /// Load and clean the dataset from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        // ---
        let mut rdr = csv::Reader::from_reader(reader);

        let mut records = Vec::new();
        let mut row_count = 0usize;
        let mut dropped = 0usize;

        for row in rdr.deserialize::<RawWeatherRecord>() {
            row_count += 1;
            match row {
                Ok(raw) => match raw.clean() {
                    Some(rec) => records.push(rec),
                    None => dropped += 1,
                },
                Err(e) => {
                    tracing::debug!("Skipping unparseable row {}: {}", row_count, e);
                    dropped += 1;
                }
            }
        }

        if records.is_empty() {
            bail!("dataset contains no usable rows ({row_count} read, {dropped} dropped)");
        }

        tracing::info!(
            "Loaded {} weather records ({} rows read, {} dropped)",
            records.len(),
            row_count,
            dropped
        );

        Ok(Self::from_records(records))
    }

    /// Build a store from already-cleaned records.
    pub fn from_records(records: Vec<WeatherRecord>) -> Self {
        // ---
        // Candidate names are the distinct union of station, district, and
        // state values, in first-seen order (stations, then districts, then
        // states). Matching relies on this order for tie-breaking.
        let mut seen = HashSet::new();
        let mut locations = Vec::new();
        let names = records
            .iter()
            .map(|r| &r.station_name)
            .chain(records.iter().map(|r| &r.district))
            .chain(records.iter().map(|r| &r.state));
        for name in names {
            if !name.is_empty() && seen.insert(name.clone()) {
                locations.push(name.clone());
            }
        }

        Self { records, locations }
    }

    /// Distinct location names known to the dataset.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// All rows whose station, district, or state equals `name`.
    pub fn subset(&self, name: &str) -> Vec<&WeatherRecord> {
        // ---
        self.records
            .iter()
            .filter(|r| r.station_name == name || r.district == name || r.state == name)
            .collect()
    }

    /// Number of cleaned records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
