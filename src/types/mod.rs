//! Core types shared across the crate.

pub mod error;
pub mod row;

pub use error::{LoreError, Result};
pub use row::{Category, RawRow};
