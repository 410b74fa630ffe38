//! Shared CLI helpers

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{load_config, merge_cli_with_config, redacted, CliOverrides};
use crate::domain::Config;
use crate::error::{ReviewError, Service};

fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to read the current directory")
}

/// Config from file and environment with CLI overrides applied.
pub fn effective_config(config_path: Option<&Path>, overrides: CliOverrides) -> Result<Config> {
    let base = load_config(&working_dir()?, config_path)?;
    Ok(merge_cli_with_config(base, overrides))
}

/// Both APIs need credentials; fail before any request is made.
pub fn require_credentials(config: &Config) -> Result<(), ReviewError> {
    if config.github_token.as_deref().is_none_or(|t| t.trim().is_empty()) {
        return Err(ReviewError::missing_credential(
            Service::GitHub,
            "set GITHUB_TOKEN or pass --token",
        ));
    }
    if config.openai_api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
        return Err(ReviewError::missing_credential(Service::OpenAi, "set OPENAI_API_KEY"));
    }
    Ok(())
}

pub fn print_config(config_path: Option<&Path>) -> Result<()> {
    let config = effective_config(config_path, CliOverrides::default())?;
    let rendered =
        toml::to_string_pretty(&redacted(&config)).context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::require_credentials;
    use crate::domain::Config;

    #[test]
    fn credentials_are_checked_in_order() {
        let err = require_credentials(&Config::default()).expect_err("no github token");
        assert!(err.to_string().contains("GitHub"));

        let config = Config { github_token: Some("ghp".to_string()), ..Config::default() };
        let err = require_credentials(&config).expect_err("no openai key");
        assert!(err.to_string().contains("OpenAI"));

        let config = Config { openai_api_key: Some("  ".to_string()), ..config };
        let err = require_credentials(&config).expect_err("blank openai key");
        assert!(err.to_string().contains("OpenAI"));

        let config = Config { openai_api_key: Some("sk".to_string()), ..config };
        assert!(require_credentials(&config).is_ok());
    }
}
