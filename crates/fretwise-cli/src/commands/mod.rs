//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod config;
pub mod generate;
pub mod notes;
pub mod render;
pub mod variations;
