// View crate: pan/zoom state for a flat projected map. No projection
// math here; the scene is projected once and the camera only moves a
// scale-and-translate transform over it.

pub mod camera;
pub mod easing;
pub mod transform;
pub mod transition;

pub use camera::*;
pub use easing::*;
pub use transform::*;
pub use transition::*;
