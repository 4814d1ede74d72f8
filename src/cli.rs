//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use email_verifier_core::CliOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "email-verifier",
    version,
    about = "Verify email deliverability via DNS and a live SMTP handshake, without sending mail."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML configuration file.
    #[arg(long, global = true, env = "EMAIL_VERIFIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// SMTP timeout per probe, in milliseconds.
    #[arg(long, global = true)]
    pub smtp_timeout: Option<u64>,

    /// Port to probe on the MX host.
    #[arg(long, global = true)]
    pub smtp_port: Option<u16>,

    /// Run an extra probe with a random mailbox to detect catch-all domains.
    #[arg(long, global = true)]
    pub catch_all: bool,

    /// Maximum simultaneous SMTP connections.
    #[arg(long, global = true)]
    pub max_concurrent: Option<usize>,

    /// Maximum probes per domain per minute.
    #[arg(long, global = true)]
    pub max_per_domain: Option<usize>,

    /// Print compact single-line JSON.
    #[arg(long, global = true)]
    pub compact: bool,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify one or more addresses given on the command line.
    Verify {
        #[arg(required = true)]
        emails: Vec<String>,
    },
    /// Verify addresses read from a file, one per line.
    Bulk {
        /// Input file; blank lines and lines starting with '#' are skipped.
        #[arg(short, long)]
        input: PathBuf,

        /// Write the JSON array here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verifications in flight at once (capped by --max-concurrent).
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        let bulk_concurrency = match &self.command {
            Commands::Bulk { concurrency, .. } => *concurrency,
            Commands::Verify { .. } => None,
        };
        CliOverrides {
            smtp_timeout_ms: self.smtp_timeout,
            smtp_port: self.smtp_port,
            catch_all_check_enabled: self.catch_all.then_some(true),
            max_concurrent: self.max_concurrent,
            max_per_domain: self.max_per_domain,
            bulk_concurrency,
        }
    }
}

/// Addresses from a bulk input file.
pub fn parse_email_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bulk_subcommand_and_overrides() {
        let cli = Cli::try_parse_from([
            "email-verifier",
            "bulk",
            "--input",
            "list.txt",
            "--concurrency",
            "3",
            "--catch-all",
            "--smtp-timeout",
            "2000",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.bulk_concurrency, Some(3));
        assert_eq!(overrides.catch_all_check_enabled, Some(true));
        assert_eq!(overrides.smtp_timeout_ms, Some(2000));
        assert_eq!(overrides.max_concurrent, None);
    }

    #[test]
    fn verify_requires_an_address() {
        assert!(Cli::try_parse_from(["email-verifier", "verify"]).is_err());
    }

    #[test]
    fn bulk_lines_skip_comments_and_blanks() {
        let parsed = parse_email_lines("# header\n a@b.com \n\nc@d.com\n");
        assert_eq!(parsed, vec!["a@b.com", "c@d.com"]);
    }
}
