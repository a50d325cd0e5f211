pub mod feature;
pub mod hit;
pub mod overlay;
pub mod popup;
pub mod selection;
pub mod world;

pub use world::*;
