use super::geo::GeoPoint;
use super::vec::Vec2;

use std::f64::consts::{FRAC_PI_4, TAU};

/// Latitude where the spherical Mercator y-coordinate equals the map edge
/// (`atan(sinh(pi))` in degrees). Latitudes beyond this are clamped so the
/// projected world stays a finite rectangle.
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_806_6;

/// Spherical Mercator projection with a pixel scale and translate.
///
/// `project` maps lon/lat degrees into base screen space (y grows
/// downward); pan/zoom is applied later as a separate transform, so the
/// projection itself is fixed for the life of a scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mercator {
    pub scale: f64,
    pub translate: Vec2,
}

impl Mercator {
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// Projection that fits the full longitude range into `width` pixels
    /// (with a small safety margin) and centers on (0, 0).
    pub fn fit_width(width: f64, height: f64) -> Self {
        Self {
            scale: (width - 3.0) / TAU,
            translate: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    pub fn project(&self, p: GeoPoint) -> Vec2 {
        let lon_rad = p.lon_deg.to_radians();
        let lat = p.lat_deg.clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG);
        let lat_rad = lat.to_radians();

        let x = self.translate.x + self.scale * lon_rad;
        let y = self.translate.y - self.scale * (FRAC_PI_4 + lat_rad / 2.0).tan().ln();
        Vec2::new(x, y)
    }

}

#[cfg(test)]
mod tests {
    use super::{MERCATOR_MAX_LAT_DEG, Mercator};
    use crate::math::GeoPoint;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_projects_to_view_center() {
        let m = Mercator::fit_width(975.0, 610.0);
        let p = m.project(GeoPoint::new(0.0, 0.0));
        assert_close(p.x, 487.5, 1e-9);
        assert_close(p.y, 305.0, 1e-9);
    }

    #[test]
    fn antimeridian_lands_at_the_margin() {
        let m = Mercator::fit_width(975.0, 610.0);
        let east = m.project(GeoPoint::new(180.0, 0.0));
        let west = m.project(GeoPoint::new(-180.0, 0.0));
        assert_close(east.x, 975.0 - 1.5, 1e-9);
        assert_close(west.x, 1.5, 1e-9);
    }

    #[test]
    fn northern_latitudes_go_up() {
        let m = Mercator::fit_width(975.0, 610.0);
        let paris = m.project(GeoPoint::new(2.35, 48.85));
        let equator = m.project(GeoPoint::new(2.35, 0.0));
        assert!(paris.y < equator.y);
    }

    #[test]
    fn polar_latitudes_are_clamped() {
        let m = Mercator::fit_width(975.0, 610.0);
        let pole = m.project(GeoPoint::new(10.0, 90.0));
        let edge = m.project(GeoPoint::new(10.0, MERCATOR_MAX_LAT_DEG));
        assert_eq!(pole, edge);
        assert!(pole.y.is_finite());
    }
}
