pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;
pub use config::Settings;

pub use adapters::{FixedConfirm, LocalStorage, SupabaseClient, TerminalConfirm};
pub use crate::core::{engine::ImportEngine, pipeline::ImportPipeline};
pub use utils::error::{LoaderError, Result};
