use crate::math::Vec2;

/// Axis-aligned bounding box in screen space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb2 { min, max }
    }

    /// An empty box; extending it with a point yields that point's box.
    pub fn empty() -> Self {
        Aabb2 {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut out = Self::empty();
        for p in points {
            out.extend(p);
        }
        out
    }

    pub fn extend(&mut self, p: Vec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        self.min.midpoint(self.max)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_points_and_dimensions() {
        let b = Aabb2::from_points([
            Vec2::new(2.0, 5.0),
            Vec2::new(-1.0, 3.0),
            Vec2::new(4.0, 4.0),
        ]);
        assert_eq!(b.min, Vec2::new(-1.0, 3.0));
        assert_eq!(b.max, Vec2::new(4.0, 5.0));
        assert_eq!(b.width(), 5.0);
        assert_eq!(b.height(), 2.0);
        assert_eq!(b.center(), Vec2::new(1.5, 4.0));
    }

    #[test]
    fn empty_box_extends_to_a_single_point() {
        assert!(Aabb2::empty().is_empty());
        let mut b = Aabb2::empty();
        b.extend(Vec2::new(3.0, -1.0));
        assert!(!b.is_empty());
        assert_eq!(b, Aabb2::new(Vec2::new(3.0, -1.0), Vec2::new(3.0, -1.0)));
    }

    #[test]
    fn contains_is_inclusive() {
        let b = Aabb2::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        assert!(b.contains(Vec2::new(0.0, 2.0)));
        assert!(b.contains(Vec2::new(1.0, 1.0)));
        assert!(!b.contains(Vec2::new(2.1, 1.0)));
    }
}
