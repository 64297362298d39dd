//! Route table and its registration on an axum `Router`.

pub mod api;
pub mod wiring;

pub use api::*;
pub use wiring::*;
