//! Domain models for the GeoCrop platform

mod alert;
mod farm;
mod prediction;

pub use alert::*;
pub use farm::*;
pub use prediction::*;
