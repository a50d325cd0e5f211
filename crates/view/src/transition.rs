use crate::easing::cubic_in_out;
use crate::transform::ViewTransform;

/// An in-flight animated move between two view transforms. Scale and
/// translation are interpolated directly under one eased clock, which
/// keeps the motion deterministic for a given sequence of `advance`
/// calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomTransition {
    from: ViewTransform,
    to: ViewTransform,
    duration_ms: f64,
    elapsed_ms: f64,
}

impl ZoomTransition {
    pub fn new(from: ViewTransform, to: ViewTransform, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Eased progress in `[0, 1]`. A zero-duration transition is
    /// complete immediately.
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        cubic_in_out(self.elapsed_ms / self.duration_ms)
    }

    pub fn value(&self) -> ViewTransform {
        if self.is_finished() {
            return self.to;
        }
        let e = self.progress();
        ViewTransform::new(
            lerp(self.from.k, self.to.k, e),
            lerp(self.from.x, self.to.x, e),
            lerp(self.from.y, self.to.y, e),
        )
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::ZoomTransition;
    use crate::transform::ViewTransform;

    #[test]
    fn starts_exactly_at_the_source_transform() {
        let from = ViewTransform::new(1.0, 0.0, 0.0);
        let to = ViewTransform::new(2.67, 87.0, -28.75);
        let transition = ZoomTransition::new(from, to, 750.0);
        assert_eq!(transition.value(), from);
    }

    #[test]
    fn lands_exactly_on_the_target_after_the_full_duration() {
        let from = ViewTransform::new(1.0, 0.0, 0.0);
        let to = ViewTransform::new(2.67, 87.0, -28.75);
        let mut transition = ZoomTransition::new(from, to, 750.0);

        for _ in 0..45 {
            transition.advance(16.0);
        }
        transition.advance(30.0);

        assert!(transition.is_finished());
        assert_eq!(transition.value(), to);
    }

    #[test]
    fn halfway_through_sits_halfway_between_the_endpoints() {
        let from = ViewTransform::new(1.0, 0.0, 100.0);
        let to = ViewTransform::new(3.0, 200.0, 0.0);
        let mut transition = ZoomTransition::new(from, to, 750.0);
        transition.advance(375.0);

        let mid = transition.value();
        assert!((mid.k - 2.0).abs() < 1e-12);
        assert!((mid.x - 100.0).abs() < 1e-12);
        assert!((mid.y - 50.0).abs() < 1e-12);
    }

    #[test]
    fn zero_duration_snaps_to_the_target() {
        let from = ViewTransform::IDENTITY;
        let to = ViewTransform::new(2.0, 10.0, 10.0);
        let transition = ZoomTransition::new(from, to, 0.0);
        assert!(transition.is_finished());
        assert_eq!(transition.value(), to);
    }

    #[test]
    fn overshooting_advance_does_not_pass_the_target() {
        let from = ViewTransform::IDENTITY;
        let to = ViewTransform::new(2.0, 10.0, 10.0);
        let mut transition = ZoomTransition::new(from, to, 750.0);
        transition.advance(10_000.0);
        assert_eq!(transition.value(), to);
    }
}
