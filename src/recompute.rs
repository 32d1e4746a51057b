//! The recomputation pass: classify every restaurant against both regions and
//! the price filter.
//!
//! [`recompute`] is a pure function of its inputs. It scans every record on
//! every call and recounts the intersection from zero, so the count always
//! describes exactly the current region and filter state.

#[cfg(test)]
#[path = "recompute_test.rs"]
mod recompute_test;

use crate::consts::{SELECTED_FILL, SELECTED_RADIUS_PX, UNSELECTED_FILL, UNSELECTED_RADIUS_PX};
use crate::price_filter::PriceFilter;
use crate::projection::{Point, Projection};
use crate::records::RecordStore;
use crate::region::Region;

/// Visual classification of one restaurant marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    /// Inside both regions and passes the price filter.
    Selected,
    /// Passes the price filter but is outside at least one region.
    Unselected,
    /// Fails the price filter; not drawn and not hoverable.
    Hidden,
}

impl MarkerState {
    #[must_use]
    pub fn fill(self) -> &'static str {
        match self {
            Self::Selected => SELECTED_FILL,
            Self::Unselected | Self::Hidden => UNSELECTED_FILL,
        }
    }

    #[must_use]
    pub fn radius(self) -> f64 {
        match self {
            Self::Selected => SELECTED_RADIUS_PX,
            Self::Unselected | Self::Hidden => UNSELECTED_RADIUS_PX,
        }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// The three predicates evaluated for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub in_a: bool,
    pub in_b: bool,
    pub price_match: bool,
}

impl Membership {
    #[must_use]
    pub fn state(self) -> MarkerState {
        if self.in_a && self.in_b && self.price_match {
            MarkerState::Selected
        } else if !self.price_match {
            MarkerState::Hidden
        } else {
            MarkerState::Unselected
        }
    }
}

/// One restaurant's on-screen marker after a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Projected position; non-finite when the record's coordinates are malformed.
    pub position: Point,
    pub state: MarkerState,
}

impl Marker {
    /// Whether the marker is drawn and can be hovered.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.state.is_visible() && self.position.is_finite()
    }
}

/// Result of one recomputation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pass {
    /// One marker per record, in store order.
    pub markers: Vec<Marker>,
    /// Records that are inside both regions and pass the price filter.
    pub intersection_count: usize,
}

impl Pass {
    /// Text shown in the intersection counter.
    #[must_use]
    pub fn count_label(&self) -> String {
        count_label(self.intersection_count)
    }
}

#[must_use]
pub fn count_label(count: usize) -> String {
    format!("Restaurants in intersection: {count}")
}

/// Evaluate the three predicates for a projected point and price tier.
#[must_use]
pub fn evaluate(position: Point, tier: Option<&str>, a: &Region, b: &Region, filter: &PriceFilter) -> Membership {
    Membership { in_a: a.contains(position), in_b: b.contains(position), price_match: filter.matches(tier) }
}

/// Classify every record and count the intersection.
#[must_use]
pub fn recompute(records: &RecordStore, projection: &Projection, a: &Region, b: &Region, filter: &PriceFilter) -> Pass {
    let mut intersection_count = 0;
    let markers = records
        .iter()
        .map(|record| {
            let position = projection.project(record.lon(), record.lat());
            let state = evaluate(position, record.price_tier(), a, b, filter).state();
            if state == MarkerState::Selected {
                intersection_count += 1;
            }
            Marker { position, state }
        })
        .collect();
    Pass { markers, intersection_count }
}
