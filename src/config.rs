//! Map configuration with defaults for the bundled restaurant page.
//!
//! Every field has a default, so an override document only needs the keys it
//! changes. In the browser the override is read from the map container's
//! `data-config` attribute.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::error::MapError;
use crate::projection::{ConicParams, GeoPoint};

pub const DEFAULT_MAP_WIDTH: f64 = 948.0;
pub const DEFAULT_MAP_HEIGHT: f64 = 844.0;
pub const DEFAULT_REGION_RADIUS: f64 = 50.0;
pub const DEFAULT_RADIUS_MIN: f64 = 10.0;
pub const DEFAULT_RADIUS_MAX: f64 = 300.0;
pub const DEFAULT_DATA_URL: &str = "data/cs448b-fa24-a3.csv";
pub const DEFAULT_BACKGROUND_URL: &str = "data/map.png";

/// Initial placement of one region.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionSeed {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
}

/// Ids of the host page elements the browser layer binds to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub container: String,
    pub radius_a: String,
    pub radius_a_value: String,
    pub radius_b: String,
    pub radius_b_value: String,
    pub price_select: String,
    pub clear_price_filter: String,
    pub tooltip: String,
    pub controls: String,
    pub intersection_count: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            container: "map-container".into(),
            radius_a: "radiusA".into(),
            radius_a_value: "radiusAValue".into(),
            radius_b: "radiusB".into(),
            radius_b_value: "radiusBValue".into(),
            price_select: "price-select".into(),
            clear_price_filter: "clear-price-filter".into(),
            tooltip: "tooltip".into(),
            controls: "controls".into(),
            intersection_count: "intersection-count".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Map frame width in CSS pixels.
    pub width: f64,
    /// Map frame height in CSS pixels.
    pub height: f64,
    /// Geographic segment fitted to the frame: south-east then north-west corner.
    pub frame: [GeoPoint; 2],
    pub projection: ConicParams,
    pub region_a: RegionSeed,
    pub region_b: RegionSeed,
    /// Smallest radius the sliders may set.
    pub radius_min: f64,
    /// Largest radius the sliders may set.
    pub radius_max: f64,
    pub data_url: String,
    pub background_url: String,
    pub elements: ElementIds,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            frame: [GeoPoint::new(-121.781_739_849_809, 37.220_708_011_154_05), GeoPoint::new(-122.506_85, 37.820_673)],
            projection: ConicParams::default(),
            region_a: RegionSeed { x: 200.0, y: 200.0, radius: DEFAULT_REGION_RADIUS, color: "blue".into() },
            region_b: RegionSeed { x: 400.0, y: 400.0, radius: DEFAULT_REGION_RADIUS, color: "blue".into() },
            radius_min: DEFAULT_RADIUS_MIN,
            radius_max: DEFAULT_RADIUS_MAX,
            data_url: DEFAULT_DATA_URL.into(),
            background_url: DEFAULT_BACKGROUND_URL.into(),
            elements: ElementIds::default(),
        }
    }
}

impl MapConfig {
    /// Parse a JSON override on top of the defaults and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ConfigJson`] for malformed JSON and
    /// [`MapError::Config`] when a value fails [`MapConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, MapError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that the configuration describes a usable map.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Config`] naming the first offending value.
    pub fn validate(&self) -> Result<(), MapError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(MapError::Config(format!("map size must be positive, got {}x{}", self.width, self.height)));
        }
        if !(self.radius_min > 0.0 && self.radius_min <= self.radius_max) {
            return Err(MapError::Config(format!(
                "radius range must satisfy 0 < min <= max, got {}..{}",
                self.radius_min, self.radius_max
            )));
        }
        if self.frame[0] == self.frame[1] {
            return Err(MapError::Config("frame endpoints must differ".into()));
        }
        let [p0, p1] = self.projection.parallels;
        if (p0 + p1).abs() < f64::EPSILON {
            return Err(MapError::Config(format!("parallels {p0} and {p1} are symmetric about the equator")));
        }
        for (name, seed) in [("region_a", &self.region_a), ("region_b", &self.region_b)] {
            self.validate_seed(name, seed)?;
        }
        Ok(())
    }

    fn validate_seed(&self, name: &str, seed: &RegionSeed) -> Result<(), MapError> {
        if seed.radius < self.radius_min || seed.radius > self.radius_max {
            return Err(MapError::Config(format!(
                "{name} radius {} is outside {}..{}",
                seed.radius, self.radius_min, self.radius_max
            )));
        }
        let inside_x = seed.x >= seed.radius && seed.x <= self.width - seed.radius;
        let inside_y = seed.y >= seed.radius && seed.y <= self.height - seed.radius;
        if !(inside_x && inside_y) {
            return Err(MapError::Config(format!(
                "{name} at ({}, {}) with radius {} does not fit the map",
                seed.x, seed.y, seed.radius
            )));
        }
        Ok(())
    }
}
