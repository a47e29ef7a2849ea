// crates/review_code/src/config.rs

use clap::Parser;
use std::env;
use std::path::PathBuf;

/// Environment variable holding a log filter, e.g. `debug` or
/// `find_incomplete_functions=debug`.
pub const LOG_ENV: &str = "REVIEW_CODE_LOG";

/// Command-line surface of `review_code`.
#[derive(Debug, Parser)]
#[command(
    name = "review_code",
    version,
    about = "Checks fenced code blocks in a chat for TODO comments and incomplete functions"
)]
pub struct Cli {
    /// Process a saved JSON transcript once instead of starting a session
    #[arg(long, value_name = "FILE", env = "REVIEW_CODE_TRANSCRIPT")]
    pub transcript: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}

/// Runtime configuration composed from CLI + environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub transcript: Option<PathBuf>,
    pub verbose: bool,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Self {
        Self::from_parts(cli, env::var(LOG_ENV).ok())
    }

    fn from_parts(cli: Cli, log_env: Option<String>) -> Self {
        let log_filter = log_env
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| if cli.verbose { "debug" } else { "warn" }.to_string());
        Self {
            transcript: cli.transcript,
            verbose: cli.verbose,
            log_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn default_filter_is_warn() {
        let config = AppConfig::from_parts(parse(&["review_code"]), None);
        assert_eq!(config.log_filter, "warn");
        assert!(!config.verbose);
    }

    #[test]
    fn verbose_raises_filter_to_debug() {
        let config = AppConfig::from_parts(parse(&["review_code", "--verbose"]), None);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn env_filter_wins_over_verbose() {
        let config = AppConfig::from_parts(
            parse(&["review_code", "--verbose"]),
            Some("extract_code_blocks=trace".to_string()),
        );
        assert_eq!(config.log_filter, "extract_code_blocks=trace");
    }

    #[test]
    fn transcript_path_is_kept() {
        let config =
            AppConfig::from_parts(parse(&["review_code", "--transcript", "chat.json"]), None);
        assert_eq!(config.transcript, Some(PathBuf::from("chat.json")));
    }
}
