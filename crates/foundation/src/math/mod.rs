pub mod geo;
pub mod project;
pub mod vec;

pub use geo::*;
pub use project::*;
pub use vec::*;
