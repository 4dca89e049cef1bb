pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};

pub use adapters::{HttpLuxmedApi, JsonFileStore, LocalStorage};
pub use config::toml_config::AppConfig;
pub use core::{hunter::LuxmedHunter, reference::ReferenceCache};
pub use domain::model::TermQuery;
pub use utils::error::{HunterError, Result};
