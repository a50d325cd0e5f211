use foundation::math::Vec2;

use crate::world::World;

/// Deterministic point hit-test over country fills.
///
/// Ordering contract:
/// - Shapes are tested in descending index order, so where fills overlap
///   the shape painted last (on top) wins, matching pointer semantics of
///   a painted scene.
/// - Containment uses even-odd parity over all rings, so hole rings
///   exclude their interior.
///
/// The point is in base screen space; callers invert the current view
/// transform before picking.
pub fn pick_point(world: &World, point: Vec2) -> Option<usize> {
    for index in (0..world.len()).rev() {
        let Some(shape) = world.country(index) else {
            continue;
        };
        if !shape.bounds.contains(point) {
            continue;
        }
        if point_in_rings(&shape.rings, point) {
            return Some(index);
        }
    }
    None
}

fn point_in_rings(rings: &[Vec<Vec2>], p: Vec2) -> bool {
    let mut inside = false;
    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let a = ring[i];
            let b = ring[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x_at = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_at {
                    inside = !inside;
                }
            }
            j = i;
        }
    }
    inside
}
