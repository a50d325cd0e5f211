use foundation::bounds::Aabb2;
use foundation::math::Vec2;

/// Fraction of the viewport a framed region fills. The remaining margin
/// keeps the framed country clear of the viewport edges.
pub const FIT_FILL_FRACTION: f64 = 0.9;

/// Uniform scale `k` plus screen-space translation. Scene points map to
/// the screen as `screen = k * p + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.k * p.x + self.x, self.k * p.y + self.y)
    }

    pub fn invert(&self, p: Vec2) -> Vec2 {
        Vec2::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Line width that stays visually constant on screen while the map
    /// is scaled by `k`.
    pub fn stroke_width(&self, base: f64) -> f64 {
        base / self.k
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Allowed zoom range for `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleExtent {
    pub min: f64,
    pub max: f64,
}

impl ScaleExtent {
    pub const DEFAULT: Self = Self {
        min: 1.0,
        max: 2.67,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Constrains `k` to the extent. Built from f64 min/max so an
    /// inverted extent or a NaN `k` still resolves to a bound instead
    /// of panicking or propagating NaN into the transform.
    pub fn clamp(&self, k: f64) -> f64 {
        self.min.max(self.max.min(k))
    }
}

impl Default for ScaleExtent {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Viewport size in screen units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Transform that frames `bounds` centered in `viewport`. The region
/// fills [`FIT_FILL_FRACTION`] of the viewport unless the scale cap wins
/// first; the scale is clamped to `extent` before the translation is
/// derived, so a capped zoom still centers the region.
pub fn fit_bounds(viewport: Viewport, bounds: &Aabb2, extent: ScaleExtent) -> ViewTransform {
    if bounds.is_empty() {
        return ViewTransform::IDENTITY;
    }

    let span = f64::max(
        bounds.width() / viewport.width,
        bounds.height() / viewport.height,
    );
    let k = extent.clamp(FIT_FILL_FRACTION / span);

    let center = bounds.center();
    ViewTransform::new(
        k,
        viewport.width / 2.0 - k * center.x,
        viewport.height / 2.0 - k * center.y,
    )
}
