//! Server configuration from the command line and environment.

use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};

use crate::limits;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Startup configuration, read once in `main` and passed down.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "kinesis-mcp-server",
    version,
    about = "MCP server for Amazon Kinesis Data Streams"
)]
pub struct ServerConfig {
    /// Region used when a tool call names none.
    #[arg(long, env = "AWS_REGION", default_value = limits::DEFAULT_REGION)]
    pub region: String,

    /// Surface backend failures as errors instead of null results.
    ///
    /// Any value of `TESTING` other than `0`, `false`, `no`, `off` or an empty
    /// string turns this on.
    #[arg(long, env = "TESTING", value_parser = FalseyValueParser::new())]
    pub testing: bool,

    /// Allow tools that delete or narrow Kinesis resources.
    #[arg(long, env = "KINESIS_MCP_ALLOW_DESTRUCTIVE", value_parser = FalseyValueParser::new())]
    pub allow_destructive: bool,

    /// Log output format. Logs go to stderr; the filter comes from RUST_LOG.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            region: limits::DEFAULT_REGION.to_string(),
            testing: false,
            allow_destructive: false,
            log_format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    static ENV: Mutex<()> = Mutex::new(());

    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV.lock().unwrap_or_else(|e| e.into_inner());
        // SAFETY: every test that reads or writes these variables holds `ENV`.
        unsafe {
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }
        let out = f();
        unsafe {
            for (k, _) in vars {
                std::env::remove_var(k);
            }
        }
        out
    }

    #[test]
    fn defaults_without_flags() {
        let _guard = ENV.lock().unwrap_or_else(|e| e.into_inner());
        let config = ServerConfig::try_parse_from(["kinesis-mcp-server"]).unwrap();
        assert!(!config.allow_destructive);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "kinesis-mcp-server",
            "--region",
            "eu-west-1",
            "--testing",
            "--allow-destructive",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert!(config.testing);
        assert!(config.allow_destructive);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn env_flags_accept_one() {
        let config = with_env(
            &[("TESTING", "1"), ("KINESIS_MCP_ALLOW_DESTRUCTIVE", "1")],
            || ServerConfig::try_parse_from(["kinesis-mcp-server"]),
        )
        .unwrap();
        assert!(config.testing);
        assert!(config.allow_destructive);
    }

    #[test]
    fn env_flags_accept_words() {
        let config = with_env(
            &[("TESTING", "yes"), ("KINESIS_MCP_ALLOW_DESTRUCTIVE", "off")],
            || ServerConfig::try_parse_from(["kinesis-mcp-server"]),
        )
        .unwrap();
        assert!(config.testing);
        assert!(!config.allow_destructive);
    }

    #[test]
    fn default_matches_documented_region() {
        assert_eq!(ServerConfig::default().region, "us-west-2");
    }
}
