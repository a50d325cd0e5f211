pub mod atlas_loader;
pub mod energy;
pub mod manifest;
pub mod package;
pub mod topology;
pub mod trade;

pub use atlas_loader::*;
pub use energy::*;
pub use manifest::*;
pub use package::*;
pub use topology::*;
pub use trade::*;
