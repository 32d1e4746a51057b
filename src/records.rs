//! Restaurant records and the immutable store loaded at startup.
//!
//! Records are parsed once from CSV and never change afterwards. A record's
//! identity is its position in the store. Longitude and latitude are kept as
//! the raw strings from the file and parsed on use, so a malformed coordinate
//! only affects that record's marker and never fails the load.

#[cfg(test)]
#[path = "records_test.rs"]
mod records_test;

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::MapError;

/// One row of the restaurant table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestaurantRecord {
    pub name: String,
    #[serde(default)]
    pub rating: Option<String>,
    /// Price tier label such as `"$$"`.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub longitude: String,
    pub latitude: String,
}

impl RestaurantRecord {
    /// Longitude in degrees, or NaN when the stored text is not a number.
    #[must_use]
    pub fn lon(&self) -> f64 {
        parse_coordinate(&self.longitude)
    }

    /// Latitude in degrees, or NaN when the stored text is not a number.
    #[must_use]
    pub fn lat(&self) -> f64 {
        parse_coordinate(&self.latitude)
    }

    /// Price tier, treating an empty cell as absent.
    #[must_use]
    pub fn price_tier(&self) -> Option<&str> {
        non_empty(self.price.as_deref())
    }

    #[must_use]
    pub fn rating_text(&self) -> Option<&str> {
        non_empty(self.rating.as_deref())
    }

    #[must_use]
    pub fn address_text(&self) -> Option<&str> {
        non_empty(self.address.as_deref())
    }

    /// Whether both coordinates parse as finite numbers.
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        self.lon().is_finite() && self.lat().is_finite()
    }
}

fn parse_coordinate(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// The loaded restaurant list, in file order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<RestaurantRecord>,
}

impl RecordStore {
    /// Wrap an already-built list of records.
    #[must_use]
    pub fn new(records: Vec<RestaurantRecord>) -> Self {
        Self { records }
    }

    /// Parse CSV text with a header row into a store, preserving row order.
    ///
    /// `name`, `longitude` and `latitude` columns are required; `rating`,
    /// `price` and `address` may be missing. Extra columns are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Csv`] if the text is not valid CSV or a row lacks a
    /// required column.
    pub fn from_csv(text: &str) -> Result<Self, MapError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for row in reader.deserialize::<RestaurantRecord>() {
            records.push(row?);
        }

        let malformed = records.iter().filter(|r| !r.has_valid_coordinates()).count();
        if malformed > 0 {
            log::warn!("{malformed} of {} restaurants have non-numeric coordinates", records.len());
        }
        log::info!("loaded {} restaurants", records.len());

        Ok(Self { records })
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RestaurantRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestaurantRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct price tiers present in the data, cheapest first.
    ///
    /// Tiers are ordered by label length and then lexically, which sorts
    /// `"$"`, `"$$"`, `"$$$"` naturally.
    #[must_use]
    pub fn price_tiers(&self) -> Vec<String> {
        let tiers: BTreeSet<(usize, &str)> = self
            .records
            .iter()
            .filter_map(RestaurantRecord::price_tier)
            .map(|t| (t.len(), t))
            .collect();
        tiers.into_iter().map(|(_, t)| t.to_string()).collect()
    }
}
