//! Configuration file handling for appstow
//!
//! This module contains data structures for:
//! - `config.yaml` - store location, payload cache, transformer command and
//!   download timeouts

pub mod settings;

// Re-export commonly used types
pub use settings::{
    CONFIG_ENV, FetchSettings, HOME_ENV, Settings, TransformerSettings, default_config_path,
};
