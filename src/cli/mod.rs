//! # Command line
//!
//! Runs the contract suites against a base URL and prints one report per
//! suite. Every flag can also come from the environment.
//!
//! ```text
//! storecheck --suite e2e --format json --report-path report.json
//! STORECHECK_BASE_URL=http://localhost:3001/api/v1 storecheck
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::TransportError;
use crate::http::client::parse_header_lines;
use crate::suites::SuiteKind;

pub const DEFAULT_BASE_URL: &str = "https://api.escuelajs.co/api/v1";

#[derive(Debug, Clone, Parser)]
#[command(name = "storecheck", version, about = "Contract checks for the storefront REST API")]
pub struct CliConfig {
    /// Base address every request path is resolved against.
    #[arg(long, env = "STORECHECK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Suite to run; repeat for several. Runs all suites when omitted.
    #[arg(long = "suite", value_enum)]
    pub suites: Vec<SuiteKind>,

    /// Extra default header, as `Key: Value`; repeatable.
    #[arg(long = "header")]
    pub headers: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file.
    #[arg(long, env = "STORECHECK_REPORT_PATH")]
    pub report_path: Option<PathBuf>,

    /// `tracing` filter directive, e.g. `info` or `storecheck=debug`.
    #[arg(long, env = "STORECHECK_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Selected suites, deduplicated, in their canonical order.
    pub fn selected_suites(&self) -> Vec<SuiteKind> {
        if self.suites.is_empty() {
            return SuiteKind::ALL.to_vec();
        }
        let mut suites = self.suites.clone();
        suites.sort();
        suites.dedup();
        suites
    }

    pub fn default_headers(&self) -> Result<Vec<(String, String)>, TransportError> {
        parse_header_lines(self.headers.iter().map(String::as_str))
    }
}

/// Report format written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
