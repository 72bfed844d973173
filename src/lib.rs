pub mod api;
pub mod config;
pub mod core;
pub mod utils;

pub use api::ApiClient;
pub use config::{CliConfig, Credentials};
pub use core::stager::{StageSummary, Stager};
pub use utils::error::{Result, StagerError};
