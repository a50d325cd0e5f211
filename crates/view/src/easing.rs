/// Symmetric cubic ease: slow start, fast middle, slow settle. Input is
/// clamped to `[0, 1]` and the endpoints map exactly to 0 and 1, so a
/// finished transition lands on its target without rounding drift.
pub fn cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        (t * t * t) / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}
