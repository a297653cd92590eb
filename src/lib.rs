//! appstow - application package installer
//!
//! Installs descriptor + bytecode archive application packages into an
//! application store. The store is only ever changed by renaming a fully
//! populated staging directory into place, and an application's user data
//! survives upgrades, including upgrades that change its store key.
//!
//! ```no_run
//! use std::path::Path;
//! use appstow::{CommandTransformer, InstallPipeline, Store};
//!
//! # fn main() -> appstow::Result<()> {
//! let store = Store::open("/var/lib/appstow")?;
//! let transformer = CommandTransformer::new("d8", vec!["--output={output}".into(), "{input}".into()]);
//! let pipeline = InstallPipeline::new(store, transformer)?;
//!
//! let ctx = pipeline.inspect(Path::new("Snake.jad"))?;
//! if ctx.outcome().is_installable() {
//!     let record = pipeline.commit(&ctx)?;
//!     println!("installed {} as {}", record.name, record.key);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cancel;
pub mod cli;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod fetch;
pub mod hash;
pub mod pipeline;
pub mod progress;
pub mod resolver;
pub mod store;
pub mod transform;

pub use cancel::CancellationToken;
pub use descriptor::{Descriptor, StoreKey, Version};
pub use error::{AppstowError, Result};
pub use fetch::{FetchOptions, Fetcher};
pub use pipeline::{ArchiveLocation, InstallContext, InstallPipeline};
pub use progress::{PipelineStage, ProgressReporter};
pub use resolver::{InstallOutcome, Integrity};
pub use store::{Store, StoreRecord, StoreWriter};
pub use transform::{CommandTransformer, Transformer};
