mod cli;
mod error;
mod http;
mod logging;
mod models;
mod session;
mod suites;
mod testing;

use std::collections::HashMap;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::task::JoinSet;

use cli::{CliConfig, OutputFormat};
use http::{HttpClient, Transport};
use suites::SuiteKind;
use testing::RunReport;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = CliConfig::parse();
    logging::init_tracing(&config.log_level, config.log_format)?;

    let headers = config.default_headers()?;
    let http = HttpClient::new(&config.base_url, &headers)?;
    tracing::info!(base_url = %http.base_url(), "storecheck starting");
    let client: Arc<dyn Transport> = Arc::new(http);

    let reports = run_suites(config.selected_suites(), client).await?;

    match config.format {
        OutputFormat::Text => {
            for report in &reports {
                println!("{report}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    if let Some(path) = &config.report_path {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    if reports.iter().all(RunReport::success) {
        return Ok(ExitCode::SUCCESS);
    }
    tracing::warn!("contract violations found");
    Ok(ExitCode::from(1))
}

/// Run each suite on its own task; reports come back in suite order.
///
/// A suite task that panics yields an aborted report instead of cancelling
/// the others.
async fn run_suites(
    kinds: Vec<SuiteKind>,
    client: Arc<dyn Transport>,
) -> anyhow::Result<Vec<RunReport>> {
    let mut tasks = JoinSet::new();
    let mut spawned = HashMap::new();
    for kind in kinds {
        let suite = kind
            .build()
            .with_context(|| format!("invalid {kind} suite"))?;
        tracing::debug!(suite = %suite.name(), order = ?suite.order(), "suite planned");
        let client = Arc::clone(&client);
        let handle = tasks.spawn(async move { (kind, suite.run(client).await) });
        spawned.insert(handle.id(), kind);
    }

    let mut reports = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(finished) => reports.push(finished),
            Err(err) => {
                let Some(&kind) = spawned.get(&err.id()) else {
                    anyhow::bail!("unknown suite task failed: {err}");
                };
                tracing::error!(suite = %kind, error = %err, "suite task aborted");
                reports.push((kind, RunReport::aborted(kind.to_string(), err.to_string())));
            }
        }
    }
    reports.sort_by_key(|(kind, _)| *kind);
    Ok(reports.into_iter().map(|(_, report)| report).collect())
}
