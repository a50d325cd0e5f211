use serde::Deserialize;

use view::{ScaleExtent, Viewport};

/// Engine options. Defaults give a 975x610 viewport, zoom between 1x
/// and 2.67x, up to two selected countries, and 750 ms animated
/// transitions.
///
/// Deserializable so the CLI and the server can apply overrides from
/// config payloads; absent fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub width: f64,
    pub height: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// How many countries stay selected at once (1 or 2).
    pub max_selected: usize,
    pub transition_ms: f64,
    /// Exponent step per wheel-delta unit: `k *= 2^(-delta * wheel_step)`.
    pub wheel_step: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            width: 975.0,
            height: 610.0,
            min_scale: 1.0,
            max_scale: 2.67,
            max_selected: 2,
            transition_ms: 750.0,
            wheel_step: 0.002,
        }
    }
}

impl MapOptions {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    pub fn scale_extent(&self) -> ScaleExtent {
        ScaleExtent::new(self.min_scale, self.max_scale)
    }

    /// Scale multiplier for one wheel event. Negative deltas (wheel up)
    /// zoom in.
    pub fn wheel_factor(&self, delta: f64) -> f64 {
        (-delta * self.wheel_step).exp2()
    }
}

#[cfg(test)]
mod tests {
    use super::MapOptions;

    #[test]
    fn defaults_are_stable() {
        let options = MapOptions::default();
        assert_eq!(options.width, 975.0);
        assert_eq!(options.height, 610.0);
        assert_eq!(options.min_scale, 1.0);
        assert_eq!(options.max_scale, 2.67);
        assert_eq!(options.max_selected, 2);
        assert_eq!(options.transition_ms, 750.0);
    }

    #[test]
    fn partial_overrides_keep_the_remaining_defaults() {
        let options: MapOptions =
            serde_json::from_str(r#"{"max_scale": 8.0, "max_selected": 1}"#)
                .expect("parse options");
        assert_eq!(options.max_scale, 8.0);
        assert_eq!(options.max_selected, 1);
        assert_eq!(options.width, 975.0);
        assert_eq!(options.transition_ms, 750.0);
    }

    #[test]
    fn wheel_up_zooms_in_and_wheel_down_zooms_out() {
        let options = MapOptions::default();
        assert!(options.wheel_factor(-120.0) > 1.0);
        assert!(options.wheel_factor(120.0) < 1.0);
        assert_eq!(options.wheel_factor(0.0), 1.0);
    }
}
