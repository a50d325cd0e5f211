use foundation::math::Vec2;

/// Shared boundary lines between distinct countries, projected once at
/// build time and rendered as a single stroked overlay.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BorderMesh {
    pub lines: Vec<Vec<Vec2>>,
}

/// Straight connector between two selected centroids.
///
/// Endpoints are captured in final screen space under the transform
/// current when the second selection happened; later pan/zoom does not
/// move them. The connector disappears on reset or selection restart.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Connector {
    pub from: Vec2,
    pub to: Vec2,
}

impl Connector {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }
}
