use foundation::math::GeoPoint;

/// One closed boundary ring in geographic coordinates.
pub type Ring = Vec<GeoPoint>;

/// One polygon: outer ring first, holes after.
pub type Polygon = Vec<Ring>;

/// One country as decoded from the boundary dataset, before projection.
///
/// Immutable after load; the scene build projects it once and never
/// touches the geographic geometry again.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    /// Dataset identifier (the topology geometry id, e.g. `"4"`).
    pub id: String,
    /// Display name for hover labels and name lookups.
    pub name: String,
    pub polygons: Vec<Polygon>,
}

impl Country {
    pub fn new(id: impl Into<String>, name: impl Into<String>, polygons: Vec<Polygon>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            polygons,
        }
    }
}
