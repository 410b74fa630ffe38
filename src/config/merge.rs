//! CLI argument merging with config

use crate::domain::Config;

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub github_token: Option<String>,
    pub budget_tokens: Option<usize>,
    pub max_changes_per_file: Option<usize>,
    pub truncate_lines: Option<usize>,
}

pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(github_token) = cli.github_token.filter(|t| !t.trim().is_empty()) {
        base_config.github_token = Some(github_token);
    }

    if let Some(budget_tokens) = cli.budget_tokens {
        base_config.models.budget_tokens = budget_tokens;
    }
    if let Some(max_changes_per_file) = cli.max_changes_per_file {
        base_config.limits.max_changes_per_file = max_changes_per_file;
    }
    if let Some(truncate_lines) = cli.truncate_lines {
        base_config.limits.truncate_lines = truncate_lines;
    }

    base_config
}
