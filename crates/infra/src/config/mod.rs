//! Configuration loading
//!
//! This module loads the connection configuration from environment
//! variables, a `.env` file, or TOML/JSON files.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
