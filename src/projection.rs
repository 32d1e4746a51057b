//! Geographic projection: longitude/latitude to map pixels.
//!
//! The map uses a Lambert conformal conic projection with two standard
//! parallels, rotated so the central meridian sits near the mapped area, then
//! uniformly scaled and translated so a reference segment fills the pixel frame.
//! Once built a [`Projection`] is immutable and every call is a pure function.

#[cfg(test)]
#[path = "projection_test.rs"]
mod projection_test;

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::Deserialize;

/// Latitude guard near the poles, in radians.
const POLE_EPSILON: f64 = 1e-6;

/// A point in map pixel space. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Whether both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Parameters of the conic projection, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ConicParams {
    /// The two standard parallels.
    pub parallels: [f64; 2],
    /// Added to every longitude before projecting.
    pub rotate: f64,
}

impl Default for ConicParams {
    fn default() -> Self {
        Self {
            parallels: [37.0 + 4.0 / 60.0, 38.0 + 26.0 / 60.0],
            rotate: 120.0 + 30.0 / 60.0,
        }
    }
}

/// The unscaled conformal conic in radians.
#[derive(Debug, Clone, Copy)]
struct ConicConformal {
    n: f64,
    f: f64,
}

fn tany(phi: f64) -> f64 {
    f64::midpoint(FRAC_PI_2, phi).tan()
}

/// Sign with zero mapped to zero (unlike [`f64::signum`]).
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl ConicConformal {
    fn new(phi0: f64, phi1: f64) -> Self {
        let cy0 = phi0.cos();
        let n = if (phi0 - phi1).abs() < POLE_EPSILON {
            phi0.sin()
        } else {
            (cy0 / phi1.cos()).ln() / (tany(phi1) / tany(phi0)).ln()
        };
        let f = cy0 * tany(phi0).powf(n) / n;
        Self { n, f }
    }

    fn forward(self, lambda: f64, phi: f64) -> (f64, f64) {
        // Comparisons are false for NaN, so a malformed latitude stays NaN.
        let phi = if self.f > 0.0 && phi < -FRAC_PI_2 + POLE_EPSILON {
            -FRAC_PI_2 + POLE_EPSILON
        } else if self.f <= 0.0 && phi > FRAC_PI_2 - POLE_EPSILON {
            FRAC_PI_2 - POLE_EPSILON
        } else {
            phi
        };
        let r = self.f / tany(phi).powf(self.n);
        let a = self.n * lambda;
        (r * a.sin(), self.f - r * a.cos())
    }

    fn invert(self, x: f64, y: f64) -> (f64, f64) {
        let fy = self.f - y;
        let r = sign(self.n) * x.hypot(fy);
        let mut l = x.atan2(fy.abs()) * sign(fy);
        if fy * self.n < 0.0 {
            l -= PI * sign(x) * sign(fy);
        }
        (l / self.n, 2.0 * (self.f / r).powf(1.0 / self.n).atan() - FRAC_PI_2)
    }
}

fn wrap_longitude(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - TAU
    } else if lambda < -PI {
        lambda + TAU
    } else {
        lambda
    }
}

/// A conformal conic projection fitted to a pixel frame.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    raw: ConicConformal,
    rotate: f64,
    scale: f64,
    tx: f64,
    ty: f64,
}

impl Projection {
    /// Build a projection whose reference `frame` segment spans the
    /// `width` × `height` pixel frame.
    ///
    /// The segment's projected bounding box is scaled uniformly to the largest
    /// size that fits and centered, so its endpoints touch opposite edges along
    /// the limiting axis.
    #[must_use]
    pub fn fit_size(width: f64, height: f64, frame: [GeoPoint; 2], params: ConicParams) -> Self {
        let unit = Self {
            raw: ConicConformal::new(params.parallels[0].to_radians(), params.parallels[1].to_radians()),
            rotate: params.rotate.to_radians(),
            scale: 1.0,
            tx: 0.0,
            ty: 0.0,
        };

        let a = unit.project(frame[0].lon, frame[0].lat);
        let b = unit.project(frame[1].lon, frame[1].lat);
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));

        let kx = if max_x > min_x { width / (max_x - min_x) } else { f64::INFINITY };
        let ky = if max_y > min_y { height / (max_y - min_y) } else { f64::INFINITY };
        let k = kx.min(ky);
        let k = if k.is_finite() { k } else { 1.0 };

        Self {
            scale: k,
            tx: (width - k * (max_x + min_x)) / 2.0,
            ty: (height - k * (max_y + min_y)) / 2.0,
            ..unit
        }
    }

    /// Project degrees of longitude/latitude to map pixels.
    ///
    /// Non-finite input produces a non-finite point.
    #[must_use]
    pub fn project(&self, lon: f64, lat: f64) -> Point {
        let lambda = wrap_longitude(lon.to_radians() + self.rotate);
        let (x, y) = self.raw.forward(lambda, lat.to_radians());
        Point::new(self.tx + self.scale * x, self.ty - self.scale * y)
    }

    /// Map pixels back to degrees of longitude/latitude.
    #[must_use]
    pub fn invert(&self, pt: Point) -> GeoPoint {
        let x = (pt.x - self.tx) / self.scale;
        let y = (self.ty - pt.y) / self.scale;
        let (lambda, phi) = self.raw.invert(x, y);
        GeoPoint::new(wrap_longitude(lambda - self.rotate).to_degrees(), phi.to_degrees())
    }
}
