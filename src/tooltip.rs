//! Hover tooltip content and placement.

#[cfg(test)]
#[path = "tooltip_test.rs"]
mod tooltip_test;

use crate::consts::{MISSING_FIELD, TOOLTIP_OFFSET_X, TOOLTIP_OFFSET_Y};
use crate::projection::Point;
use crate::records::RestaurantRecord;

/// What the tooltip panel shows for one restaurant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub name: String,
    pub rating: String,
    pub price: String,
    pub address: String,
}

impl TooltipContent {
    /// Build display text for `record`, substituting a placeholder for absent fields.
    #[must_use]
    pub fn from_record(record: &RestaurantRecord) -> Self {
        let or_missing = |v: Option<&str>| v.unwrap_or(MISSING_FIELD).to_string();
        Self {
            name: record.name.clone(),
            rating: or_missing(record.rating_text()),
            price: or_missing(record.price_tier()),
            address: or_missing(record.address_text()),
        }
    }

    /// Panel markup with every value HTML-escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            "<strong>{}</strong><br>Rating: {}<br>Price: {}<br>Address: {}",
            escape_html(&self.name),
            escape_html(&self.rating),
            escape_html(&self.price),
            escape_html(&self.address),
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Top-left corner of the panel for a cursor at `page` coordinates.
#[must_use]
pub fn placement(page: Point) -> Point {
    Point::new(page.x + TOOLTIP_OFFSET_X, page.y + TOOLTIP_OFFSET_Y)
}

/// Which record, if any, the tooltip is currently showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TooltipState {
    hovered: Option<usize>,
}

impl TooltipState {
    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Record that `index` is under the cursor. Returns true if it changed.
    pub fn show(&mut self, index: usize) -> bool {
        let changed = self.hovered != Some(index);
        self.hovered = Some(index);
        changed
    }

    /// Record that nothing is hovered. Returns true if a tooltip was showing.
    pub fn hide(&mut self) -> bool {
        self.hovered.take().is_some()
    }
}
