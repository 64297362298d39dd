//! HTTP handlers wired by the API table.

pub mod common;
pub mod db;

pub use common::*;
pub use db::*;
