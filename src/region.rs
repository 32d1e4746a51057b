//! The two draggable, resizable circular regions.
//!
//! A region is drawn once at its anchor and moved by translating the drawn
//! shape, so [`Region::translation`] is what the renderer applies. Both drag
//! and resize keep the whole circle inside the map: the center stays at
//! least `radius` away from every edge.

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;

use crate::projection::Point;

/// Which of the two regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    A,
    B,
}

impl RegionId {
    pub const ALL: [RegionId; 2] = [RegionId::A, RegionId::B];
}

/// Pixel extent of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub width: f64,
    pub height: f64,
}

impl MapBounds {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= 0.0 && pt.x <= self.width && pt.y >= 0.0 && pt.y <= self.height
    }

    /// Largest radius a circle can have and still fit.
    #[must_use]
    pub fn max_radius(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }

    /// Nearest center to `pt` that keeps a circle of `radius` fully inside.
    ///
    /// `radius` must not exceed [`MapBounds::max_radius`].
    #[must_use]
    pub fn clamp_center(&self, pt: Point, radius: f64) -> Point {
        Point::new(pt.x.clamp(radius, self.width - radius), pt.y.clamp(radius, self.height - radius))
    }
}

/// A circular filter region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    anchor: Point,
    center: Point,
    radius: f64,
    color: String,
}

impl Region {
    /// Create a region drawn at `(x, y)`.
    #[must_use]
    pub fn new(x: f64, y: f64, radius: f64, color: impl Into<String>) -> Self {
        let at = Point::new(x, y);
        Self { anchor: at, center: at, radius, color: color.into() }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Where the region was first drawn.
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Offset of the current center from the anchor.
    #[must_use]
    pub fn translation(&self) -> Point {
        Point::new(self.center.x - self.anchor.x, self.center.y - self.anchor.y)
    }

    /// Whether `pt` lies inside or on the circle.
    ///
    /// NaN points are never inside.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        self.center.distance_sq(pt) <= self.radius * self.radius
    }
}

/// Owner of both regions and the map bounds they live in.
#[derive(Debug, Clone)]
pub struct RegionController {
    bounds: MapBounds,
    radius_min: f64,
    radius_max: f64,
    a: Region,
    b: Region,
}

impl RegionController {
    /// Build a controller for two regions.
    ///
    /// Slider values are limited to `radius_min..=radius_max` and to what
    /// fits in `bounds`. Initial regions are clamped into the map.
    #[must_use]
    pub fn new(bounds: MapBounds, radius_min: f64, radius_max: f64, a: Region, b: Region) -> Self {
        let mut ctl = Self { bounds, radius_min, radius_max, a, b };
        for id in RegionId::ALL {
            let radius = ctl.limit_radius(ctl.region(id).radius);
            let region = ctl.region_mut(id);
            region.radius = radius;
            region.center = bounds.clamp_center(region.center, radius);
        }
        ctl
    }

    #[must_use]
    pub fn bounds(&self) -> MapBounds {
        self.bounds
    }

    #[must_use]
    pub fn region(&self, id: RegionId) -> &Region {
        match id {
            RegionId::A => &self.a,
            RegionId::B => &self.b,
        }
    }

    fn region_mut(&mut self, id: RegionId) -> &mut Region {
        match id {
            RegionId::A => &mut self.a,
            RegionId::B => &mut self.b,
        }
    }

    fn limit_radius(&self, radius: f64) -> f64 {
        let hi = self.radius_max.min(self.bounds.max_radius());
        let lo = self.radius_min.min(hi);
        if radius.is_nan() { lo } else { radius.clamp(lo, hi) }
    }

    /// Move a region's center toward a pointer position, clamped so the
    /// circle stays inside the map. Returns the new center.
    pub fn on_drag(&mut self, id: RegionId, event_x: f64, event_y: f64) -> Point {
        let bounds = self.bounds;
        let region = self.region_mut(id);
        let target = Point::new(
            if event_x.is_nan() { region.center.x } else { event_x },
            if event_y.is_nan() { region.center.y } else { event_y },
        );
        region.center = bounds.clamp_center(target, region.radius);
        region.center
    }

    /// Set a region's radius, keeping its center unless the new radius would
    /// push the circle past an edge. Returns the radius actually applied.
    pub fn on_resize(&mut self, id: RegionId, new_radius: f64) -> f64 {
        let radius = self.limit_radius(new_radius);
        let bounds = self.bounds;
        let region = self.region_mut(id);
        region.radius = radius;
        region.center = bounds.clamp_center(region.center, radius);
        radius
    }
}
