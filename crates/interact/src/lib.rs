pub mod controller;
pub mod event;
pub mod options;

pub use controller::*;
pub use event::*;
pub use options::*;
