pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{http::ReqwestClient, storage::FileSinkFactory};
pub use crate::config::{RunConfig, TomlConfig};
pub use crate::core::{converter::convert, dispatcher::Dispatcher, Record, RunSummary};
pub use crate::utils::error::{ConvertError, FetchError, PipelineError, Result};
