//! CLI command implementations.

pub mod common;
pub mod import;
pub mod info;
pub mod migrate;
pub mod pitch;
pub mod play;
pub mod presets;
pub mod render;
