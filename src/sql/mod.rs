//! Safe SQL builder: identifiers only after validation, values as `?` parameters.

mod builder;
pub mod ids;
pub mod params;
pub use builder::*;
pub use ids::*;
pub use params::*;
