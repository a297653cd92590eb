//! Command implementations for appstow CLI

pub mod cache;
pub mod completions;
pub mod helpers;
pub mod inspect;
pub mod install;
pub mod list;
pub mod show;
pub mod uninstall;
pub mod version;

pub use helpers::GlobalOptions;
