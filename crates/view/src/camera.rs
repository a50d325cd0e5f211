//! Camera over a projected 2D map.
//!
//! The camera owns the current [`ViewTransform`], the allowed scale
//! range, and at most one in-flight [`ZoomTransition`]. Gestures follow
//! the usual interactive-map rules:
//! - a drag or wheel gesture interrupts any running transition,
//! - a new animated move restarts from the mid-flight transform,
//! - wheel zoom keeps the map point under the pointer fixed.

use foundation::bounds::Aabb2;
use foundation::math::Vec2;

use crate::transform::{ScaleExtent, ViewTransform, Viewport, fit_bounds};
use crate::transition::ZoomTransition;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewCamera {
    viewport: Viewport,
    extent: ScaleExtent,
    transform: ViewTransform,
    transition: Option<ZoomTransition>,
}

impl ViewCamera {
    pub fn new(viewport: Viewport, extent: ScaleExtent) -> Self {
        Self {
            viewport,
            extent,
            transform: ViewTransform::IDENTITY,
            transition: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn extent(&self) -> ScaleExtent {
        self.extent
    }

    /// The transform as of the last `advance` call.
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Starts an animated move to `target`. If a transition is already
    /// running it is replaced, and the new one starts from the current
    /// mid-flight transform rather than the old target.
    pub fn animate_to(&mut self, target: ViewTransform, duration_ms: f64) {
        let transition = ZoomTransition::new(self.transform, target, duration_ms);
        if transition.is_finished() {
            self.transform = target;
            self.transition = None;
        } else {
            self.transition = Some(transition);
        }
    }

    /// Sets the transform immediately, dropping any running transition.
    pub fn jump_to(&mut self, target: ViewTransform) {
        self.transform = target;
        self.transition = None;
    }

    /// Animated move that frames `bounds` in the viewport.
    pub fn frame_bounds(&mut self, bounds: &Aabb2, duration_ms: f64) {
        let target = fit_bounds(self.viewport, bounds, self.extent);
        self.animate_to(target, duration_ms);
    }

    /// Animated move back to the unzoomed full map.
    pub fn reset_view(&mut self, duration_ms: f64) {
        self.animate_to(ViewTransform::IDENTITY, duration_ms);
    }

    /// Direct pan by a screen-space delta. Interrupts any transition.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.interrupt();
        self.transform.x += dx;
        self.transform.y += dy;
    }

    /// Multiplies the scale by `factor`, clamped to the extent, while
    /// keeping the map point under `anchor` fixed on screen. Interrupts
    /// any transition.
    pub fn zoom_by_at(&mut self, factor: f64, anchor: Vec2) {
        self.interrupt();
        let k0 = self.transform.k;
        let k1 = self.extent.clamp(k0 * factor);
        if k1 == k0 {
            return;
        }
        let ratio = k1 / k0;
        self.transform = ViewTransform::new(
            k1,
            anchor.x - (anchor.x - self.transform.x) * ratio,
            anchor.y - (anchor.y - self.transform.y) * ratio,
        );
    }

    /// Drives the active transition by `dt_ms`. Returns true while a
    /// transition is still running after this call.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        let Some(transition) = &mut self.transition else {
            return false;
        };
        transition.advance(dt_ms);
        self.transform = transition.value();
        if transition.is_finished() {
            self.transition = None;
            return false;
        }
        true
    }

    fn interrupt(&mut self) {
        self.transition = None;
    }
}

#[cfg(test)]
mod tests {
    use super::ViewCamera;
    use crate::transform::{ScaleExtent, ViewTransform, Viewport};
    use foundation::bounds::Aabb2;
    use foundation::math::Vec2;

    fn camera() -> ViewCamera {
        ViewCamera::new(Viewport::new(975.0, 610.0), ScaleExtent::DEFAULT)
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} != {b} (eps {eps})");
    }

    #[test]
    fn transition_lands_exactly_on_the_framed_target() {
        let mut cam = camera();
        let bounds = Aabb2::from_points([Vec2::new(100.0, 100.0), Vec2::new(200.0, 150.0)]);
        cam.frame_bounds(&bounds, 750.0);
        assert!(cam.is_animating());

        let mut steps = 0;
        while cam.advance(16.0) {
            steps += 1;
            assert!(steps < 100, "transition never finished");
        }

        assert!(!cam.is_animating());
        assert_close(cam.transform().k, 2.67, 1e-12);
        let center = cam.transform().apply(Vec2::new(150.0, 125.0));
        assert_close(center.x, 487.5, 1e-9);
        assert_close(center.y, 305.0, 1e-9);
    }

    #[test]
    fn override_mid_flight_restarts_from_the_current_transform() {
        let mut cam = camera();
        cam.animate_to(ViewTransform::new(2.0, 100.0, 50.0), 750.0);
        cam.advance(375.0);
        let mid_flight = cam.transform();
        assert!(mid_flight != ViewTransform::IDENTITY);
        assert!(mid_flight != ViewTransform::new(2.0, 100.0, 50.0));

        cam.reset_view(750.0);
        // Progress zero: still exactly at the interrupted transform.
        assert_eq!(cam.transform(), mid_flight);
        cam.advance(375.0);
        let halfway = cam.transform();
        assert_close(halfway.k, (mid_flight.k + 1.0) / 2.0, 1e-12);
    }

    #[test]
    fn wheel_zoom_keeps_the_anchor_point_fixed() {
        let mut cam = camera();
        cam.jump_to(ViewTransform::new(1.5, 20.0, -10.0));
        let anchor = Vec2::new(300.0, 200.0);
        let world_before = cam.transform().invert(anchor);

        cam.zoom_by_at(1.3, anchor);
        let world_after = cam.transform().invert(anchor);

        assert_close(world_after.x, world_before.x, 1e-9);
        assert_close(world_after.y, world_before.y, 1e-9);
        assert_close(cam.transform().k, 1.95, 1e-12);
    }

    #[test]
    fn zoom_clamps_to_the_scale_extent() {
        let mut cam = camera();
        let anchor = Vec2::new(487.5, 305.0);
        for _ in 0..50 {
            cam.zoom_by_at(0.8, anchor);
        }
        assert_eq!(cam.transform().k, 1.0);

        for _ in 0..50 {
            cam.zoom_by_at(1.25, anchor);
        }
        assert_eq!(cam.transform().k, 2.67);
    }

    #[test]
    fn pan_interrupts_an_active_transition() {
        let mut cam = camera();
        cam.animate_to(ViewTransform::new(2.0, 100.0, 50.0), 750.0);
        cam.advance(100.0);
        let mid_flight = cam.transform();

        cam.pan_by(10.0, -5.0);
        assert!(!cam.is_animating());
        assert_close(cam.transform().x, mid_flight.x + 10.0, 1e-12);
        assert_close(cam.transform().y, mid_flight.y - 5.0, 1e-12);

        // Further frames no longer move the camera.
        cam.advance(500.0);
        assert_close(cam.transform().x, mid_flight.x + 10.0, 1e-12);
    }

    #[test]
    fn zero_duration_moves_jump_without_animating() {
        let mut cam = camera();
        cam.animate_to(ViewTransform::new(2.0, 1.0, 1.0), 0.0);
        assert!(!cam.is_animating());
        assert_eq!(cam.transform(), ViewTransform::new(2.0, 1.0, 1.0));
    }
}
