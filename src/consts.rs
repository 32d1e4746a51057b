//! Shared constants for the map engine.

// ── Markers ─────────────────────────────────────────────────────

/// Fill for a restaurant inside both regions that passes the price filter.
pub const SELECTED_FILL: &str = "#3498db";

/// Fill for every other visible restaurant.
pub const UNSELECTED_FILL: &str = "#bdc3c7";

/// Marker radius in pixels for a selected restaurant.
pub const SELECTED_RADIUS_PX: f64 = 5.0;

/// Marker radius in pixels for an unselected restaurant.
pub const UNSELECTED_RADIUS_PX: f64 = 3.0;

// ── Regions ─────────────────────────────────────────────────────

/// Opacity of a region's interior fill.
pub const REGION_FILL_ALPHA: f64 = 0.2;

/// Region outline width in pixels.
pub const REGION_STROKE_PX: f64 = 2.0;

// ── Background ──────────────────────────────────────────────────

/// CSS filter applied to the background raster.
pub const BACKGROUND_FILTER: &str = "brightness(0.8) contrast(1.2)";

// ── Tooltip ─────────────────────────────────────────────────────

/// Horizontal offset from the cursor to the tooltip's left edge.
pub const TOOLTIP_OFFSET_X: f64 = 10.0;

/// Vertical offset from the cursor to the tooltip's top edge.
pub const TOOLTIP_OFFSET_Y: f64 = -10.0;

/// Shown in place of an absent rating, price or address.
pub const MISSING_FIELD: &str = "N/A";
