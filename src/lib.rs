pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::{GitCliPublisher, LocalStorage};
pub use crate::config::environment::{EnvironmentResolver, ProcessEnv};
pub use crate::config::RunSettings;
pub use crate::core::{engine::DrEngine, patcher::DocumentPatcher};
pub use crate::utils::error::{DrError, Result};
