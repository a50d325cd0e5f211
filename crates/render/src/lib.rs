// Render crate: frame snapshots and SVG output. The controller stays
// headless; this crate turns its state into a drawable document.

pub mod frame;
pub mod svg;
pub mod theme;

pub use frame::*;
pub use svg::*;
pub use theme::*;
