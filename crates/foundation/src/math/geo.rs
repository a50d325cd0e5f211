/// Geographic coordinates in degrees.
///
/// Longitude is positive east, latitude positive north. Boundary datasets
/// and side datasets both speak degrees, so this is the interchange type;
/// radians appear only inside projection math.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;

    #[test]
    fn carries_lon_lat_in_degrees() {
        let p = GeoPoint::new(2.35, 48.85);
        assert_eq!(p.lon_deg, 2.35);
        assert_eq!(p.lat_deg, 48.85);
    }
}
