//! Configuration loading
//!
//! Layers, lowest to highest precedence: built-in defaults, `pr-review.toml`
//! (or the file given with `--config`), `PR_REVIEW_*` environment variables,
//! the conventional `GITHUB_TOKEN` / `OPENAI_API_KEY` variables, and finally
//! command-line flags via [`merge_cli_with_config`].

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::Path;
use tracing::debug;

use crate::domain::Config;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "pr-review.toml";

/// Prefix for environment overrides; nested keys use `__` (e.g. `PR_REVIEW_MODELS__BUDGET_TOKENS`).
pub const ENV_PREFIX: &str = "PR_REVIEW_";

pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<Config> {
    figment(dir, explicit)?.extract().context("Invalid configuration")
}

fn figment(dir: &Path, explicit: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match explicit {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Toml::file(path));
        }
        None => {
            let candidate = dir.join(DEFAULT_CONFIG_FILE);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "loading config file");
                figment = figment.merge(Toml::file(candidate));
            }
        }
    }

    Ok(figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Env::raw().only(&["GITHUB_TOKEN", "OPENAI_API_KEY"])))
}

/// Copy of `config` that is safe to print.
pub fn redacted(config: &Config) -> Config {
    let mask = |value: &Option<String>| value.as_ref().map(|_| "********".to_string());
    Config {
        github_token: mask(&config.github_token),
        openai_api_key: mask(&config.openai_api_key),
        ..config.clone()
    }
}
