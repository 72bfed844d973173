use crate::utils::error::{Result, StagerError};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};
use clap::Parser;
use std::path::PathBuf;

pub const USERNAME_ENV: &str = "GEUEBT_API_USERNAME";
pub const PASSWORD_ENV: &str = "GEUEBT_API_PASSWORD";

#[derive(Debug, Clone, Parser)]
#[command(name = "geuebt-stager")]
#[command(about = "Push per-sample characterization results to the geuebt API")]
pub struct CliConfig {
    /// Per-sample characterization summary files (JSON), in pipeline order
    #[arg(required = true)]
    pub summaries: Vec<PathBuf>,

    /// Directory for per-isolate sample sheets
    #[arg(long)]
    pub sheet_out: PathBuf,

    /// Path for the merged JSON array output
    #[arg(long)]
    pub merged: PathBuf,

    /// Path for the QC status JSON output
    #[arg(long)]
    pub qc_out: PathBuf,

    /// Base URL of the geuebt API
    #[arg(long)]
    pub api_url: String,

    /// Characterization pipeline version tag recorded in every sample sheet
    #[arg(long)]
    pub ver: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_url)?;
        validate_non_empty_string("ver", &self.ver)?;
        validate_path("sheet_out", &self.sheet_out.to_string_lossy())?;
        validate_path("merged", &self.merged.to_string_lossy())?;
        validate_path("qc_out", &self.qc_out.to_string_lossy())?;
        Ok(())
    }
}

/// API credentials, resolved from the environment once at startup and passed
/// into the orchestrator explicitly. Missing or empty values abort the run
/// before any network call.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: String, password: String) -> Result<Self> {
        if username.is_empty() || password.is_empty() {
            return Err(StagerError::ConfigError {
                message: format!("Missing {} or {} env vars", USERNAME_ENV, PASSWORD_ENV),
            });
        }
        Ok(Self { username, password })
    }

    pub fn from_env() -> Result<Self> {
        let username = std::env::var(USERNAME_ENV).unwrap_or_default();
        let password = std::env::var(PASSWORD_ENV).unwrap_or_default();
        Self::new(username, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_reject_empty_values() {
        assert!(Credentials::new("alice".to_string(), "secret".to_string()).is_ok());
        assert!(Credentials::new(String::new(), "secret".to_string()).is_err());
        assert!(Credentials::new("alice".to_string(), String::new()).is_err());
    }

    #[test]
    fn test_credentials_error_names_env_vars() {
        let err = Credentials::new(String::new(), String::new()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(USERNAME_ENV));
        assert!(message.contains(PASSWORD_ENV));
    }

    #[test]
    fn test_config_validation() {
        let config = CliConfig {
            summaries: vec![PathBuf::from("sample1.json")],
            sheet_out: PathBuf::from("./sheets"),
            merged: PathBuf::from("./merged.json"),
            qc_out: PathBuf::from("./qc.json"),
            api_url: "http://localhost:8000".to_string(),
            ver: "1.2.0".to_string(),
            verbose: false,
        };
        assert!(config.validate().is_ok());

        let mut bad_url = config.clone();
        bad_url.api_url = "not-a-url".to_string();
        assert!(bad_url.validate().is_err());

        let mut empty_ver = config.clone();
        empty_ver.ver = "  ".to_string();
        assert!(empty_ver.validate().is_err());
    }
}
