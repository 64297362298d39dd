//! Request parameter extraction.

pub mod params;
pub use params::*;
