#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::projection::Point;
use crate::recompute::Marker;
use crate::region::{RegionController, RegionId};

/// What is under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A visible restaurant marker, by store index.
    Marker(usize),
    /// The body of a region.
    Region(RegionId),
}

/// Find the topmost target under `pt`.
///
/// Markers are drawn above the regions, later markers above earlier ones,
/// and region B above region A; hits follow the same order. Points outside
/// the map hit nothing.
#[must_use]
pub fn hit_test(pt: Point, markers: &[Marker], regions: &RegionController) -> Option<Hit> {
    if !regions.bounds().contains(pt) {
        return None;
    }

    let marker = markers.iter().enumerate().rev().find(|(_, m)| {
        let r = m.state.radius();
        m.is_drawable() && m.position.distance_sq(pt) <= r * r
    });
    if let Some((index, _)) = marker {
        return Some(Hit::Marker(index));
    }

    [RegionId::B, RegionId::A]
        .into_iter()
        .find(|id| regions.region(*id).contains(pt))
        .map(Hit::Region)
}
