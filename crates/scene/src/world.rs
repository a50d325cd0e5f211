use foundation::bounds::Aabb2;
use foundation::math::{Mercator, Vec2};

use crate::feature::Country;
use crate::overlay::BorderMesh;

/// One country after projection; everything the renderer and the
/// hit-tester need, precomputed once at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub id: String,
    pub name: String,
    /// All rings of all polygons, projected. Outer rings and holes are
    /// kept together; containment uses even-odd parity so hole rings
    /// subtract naturally.
    pub rings: Vec<Vec<Vec2>>,
    pub bounds: Aabb2,
    /// Area-weighted centroid in base screen space.
    pub centroid: Vec2,
}

/// The built scene: projected country shapes plus the shared-border mesh.
///
/// Built once per successful load; there is no live-update path. Shapes
/// are addressed by their index in build order, which follows the
/// boundary dataset order.
#[derive(Debug, Default, Clone)]
pub struct World {
    countries: Vec<CountryShape>,
    borders: BorderMesh,
}

impl World {
    pub fn build(
        countries: &[Country],
        border_lines: &[Vec<foundation::math::GeoPoint>],
        projection: &Mercator,
    ) -> Self {
        let mut shapes = Vec::with_capacity(countries.len());

        for country in countries {
            let mut rings: Vec<Vec<Vec2>> = Vec::new();
            for polygon in &country.polygons {
                for ring in polygon {
                    if ring.is_empty() {
                        continue;
                    }
                    rings.push(ring.iter().map(|p| projection.project(*p)).collect());
                }
            }

            let bounds = Aabb2::from_points(rings.iter().flatten().copied());
            let centroid = rings_centroid(&rings);

            shapes.push(CountryShape {
                id: country.id.clone(),
                name: country.name.clone(),
                rings,
                bounds,
                centroid,
            });
        }

        let borders = BorderMesh {
            lines: border_lines
                .iter()
                .map(|line| line.iter().map(|p| projection.project(*p)).collect())
                .collect(),
        };

        Self {
            countries: shapes,
            borders,
        }
    }

    pub fn countries(&self) -> &[CountryShape] {
        &self.countries
    }

    pub fn country(&self, index: usize) -> Option<&CountryShape> {
        self.countries.get(index)
    }

    pub fn borders(&self) -> &BorderMesh {
        &self.borders
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Exact name match first, then a case-insensitive scan.
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        if let Some(ix) = self.countries.iter().position(|c| c.name == name) {
            return Some(ix);
        }
        self.countries
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }
}

fn rings_centroid(rings: &[Vec<Vec2>]) -> Vec2 {
    let mut area_sum = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    for ring in rings {
        let (area, centroid) = ring_signed_area_centroid(ring);
        area_sum += area;
        cx += centroid.x * area;
        cy += centroid.y * area;
    }

    if area_sum.abs() > 1e-12 {
        return Vec2::new(cx / area_sum, cy / area_sum);
    }

    // Degenerate geometry: fall back to the vertex mean.
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut n = 0usize;
    for p in rings.iter().flatten() {
        sx += p.x;
        sy += p.y;
        n += 1;
    }
    if n == 0 {
        return Vec2::new(0.0, 0.0);
    }
    Vec2::new(sx / n as f64, sy / n as f64)
}

/// Shoelace area and centroid of one ring. The closing edge is implied,
/// so rings work whether or not the first point is repeated at the end.
fn ring_signed_area_centroid(ring: &[Vec2]) -> (f64, Vec2) {
    if ring.len() < 3 {
        return (0.0, Vec2::new(0.0, 0.0));
    }

    let mut twice_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let cross = a.x * b.y - b.x * a.y;
        twice_area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }

    if twice_area.abs() < 1e-12 {
        return (0.0, Vec2::new(0.0, 0.0));
    }

    let area = twice_area / 2.0;
    (
        area,
        Vec2::new(cx / (3.0 * twice_area), cy / (3.0 * twice_area)),
    )
}
