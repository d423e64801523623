//! jobscout - aggregated job search over Job Bank, Adzuna, an employer
//! directory and a synthetic fallback.

mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use jobscout_core::config::JobscoutConfig;
use jobscout_core::models::{CandidateProfile, SearchOptions, SearchResult};
use jobscout_core::orchestration::{SearchSession, SessionOutcome};

use crate::cli::{Cli, Commands, SearchArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    let config = JobscoutConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match &cli.command {
        Commands::Search(args) => search(&config, args).await,
        Commands::Sources => {
            let aggregator = config.build_aggregator(config.build_cache())?;
            let sources: Vec<_> = aggregator
                .sources()
                .iter()
                .map(|source| {
                    json!({
                        "id": source.id,
                        "name": source.display_name,
                        "tier": source.tier,
                    })
                })
                .collect();
            print_json(&sources)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Translate { tags } => {
            let aggregator = config.build_aggregator(config.build_cache())?;
            println!("{}", aggregator.translator().translate(tags));
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn search(config: &JobscoutConfig, args: &SearchArgs) -> Result<ExitCode> {
    let aggregator = config.build_aggregator(config.build_cache())?;
    let session = SearchSession::new(Arc::new(aggregator));

    if let Some(path) = &args.profile {
        session.set_profile(Some(load_profile(path)?)).await;
    }

    let options = SearchOptions {
        force_refresh: args.force_refresh,
    };
    let outcome = session
        .search(args.to_query(), options)
        .await
        .context("search rejected")?;

    let SessionOutcome::Committed(mut result) = outcome else {
        anyhow::bail!("search was superseded before it completed");
    };
    if let Some(limit) = args.limit {
        result.postings.truncate(limit);
    }

    print_json(&result)?;
    Ok(exit_code(&result))
}

fn load_profile(path: &Path) -> Result<CandidateProfile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse profile {}", path.display()))
}

fn exit_code(result: &SearchResult) -> ExitCode {
    match &result.error {
        Some(error) => {
            tracing::error!(kind = ?error.kind, message = %error.message, "no job source answered");
            ExitCode::from(2)
        }
        None => ExitCode::SUCCESS,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,jobscout=info,jobscout_core=info",
        1 => "info,jobscout=debug,jobscout_core=debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
