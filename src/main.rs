mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{parse_email_lines, Cli, Commands};
use email_verifier_core::core::config::{find_config_file, load_config_file};
use email_verifier_core::{BulkSummary, Config, ConfigBuilder, EmailVerifier};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "email_verifier_core=debug,email_verifier=debug,smtp_probe=debug,dns=debug,verifier=debug,rate_limiter=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut builder = ConfigBuilder::new();
    if let Some(path) = find_config_file(cli.config.as_deref())? {
        let file = load_config_file(&path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
        builder = builder.with_file(&file, Some(path.display().to_string()));
    }
    let config = builder
        .with_overrides(&cli.overrides())
        .build()
        .context("Invalid configuration")?;
    Ok(config)
}

fn write_json<T: Serialize, W: Write>(writer: W, value: &T, compact: bool) -> Result<()> {
    let mut writer = writer;
    if compact {
        serde_json::to_writer(&mut writer, value)?;
    } else {
        serde_json::to_writer_pretty(&mut writer, value)?;
    }
    writeln!(writer)?;
    Ok(())
}

async fn run_bulk(
    verifier: &EmailVerifier,
    input: &Path,
    output: Option<&Path>,
    concurrency: Option<usize>,
    compact: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file {}", input.display()))?;
    let emails = parse_email_lines(&content);
    tracing::info!("Read {} addresses from {}", emails.len(), input.display());

    let progress = ProgressBar::new(emails.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ETA {eta} {msg}",
        )?
        .progress_chars("=>-"),
    );

    let started = Instant::now();
    let results = verifier
        .verify_bulk_with_progress(&emails, concurrency, |completed, total, result| {
            progress.set_length(total as u64);
            progress.set_position(completed as u64);
            progress.set_message(format!("{} {}", result.email, result.status));
        })
        .await;
    progress.finish_and_clear();

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            write_json(BufWriter::new(file), &results, compact)?;
        }
        None => write_json(io::stdout().lock(), &results, compact)?,
    }

    let summary = BulkSummary::from_results(&results);
    eprintln!(
        "Verified {} addresses in {:.1?}: {} valid, {} invalid, {} risky, {} unknown (avg risk {:.1})",
        summary.total,
        started.elapsed(),
        summary.valid,
        summary.invalid,
        summary.risky,
        summary.unknown,
        summary.average_risk_score
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    tracing::debug!("Using configuration: {:?}", config);
    let verifier = EmailVerifier::new(config).context("Failed to initialize verifier")?;

    match &cli.command {
        Commands::Verify { emails } => {
            for email in emails {
                let result = verifier.verify(email).await;
                write_json(io::stdout().lock(), &result, cli.compact)?;
            }
        }
        Commands::Bulk {
            input,
            output,
            concurrency,
        } => {
            run_bulk(&verifier, input, output.as_deref(), *concurrency, cli.compact).await?;
        }
    }

    Ok(())
}
