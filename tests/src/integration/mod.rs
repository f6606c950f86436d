//! Cross-module integration scenarios.

pub mod lifecycle;
pub mod persistence;
