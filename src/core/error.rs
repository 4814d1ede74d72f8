//! Defines the custom error types for the email-verifier engine.

use std::{io, net::AddrParseError};
use thiserror::Error;

/// The primary error type for the verification engine.
///
/// These errors never reach callers of [`crate::EmailVerifier::verify`]; the
/// pipeline folds them into an `unknown_error` result. They surface directly
/// only from construction, configuration loading and the CLI.
#[derive(Error, Debug)]
pub enum AppError {
    /// Error occurring during configuration loading or validation.
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Error initializing necessary components (e.g., resolvers).
    #[error("Initialization Error: {0}")]
    Initialization(String),

    /// Error related to file input/output operations.
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing a TOML configuration file.
    #[error("TOML Parsing Error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Error during DNS resolution.
    #[error("DNS Resolution Error: {0}")]
    Dns(#[from] trust_dns_resolver::error::ResolveError),

    /// DNS operation timed out.
    #[error("DNS Timeout for domain: {0}")]
    DnsTimeout(String),

    /// Failed to extract a domain from an address that passed syntax checks.
    #[error("Failed to extract domain from address: {0}")]
    DomainExtraction(String),

    /// Error parsing an IP address or socket address.
    #[error("Address Parsing Error: {0}")]
    AddrParse(#[from] AddrParseError),

    /// Error related to concurrency or task execution.
    #[error("Task Execution Error: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_errors_convert_with_question_mark() {
        fn parse(raw: &str) -> Result<toml::Value> {
            Ok(toml::from_str(raw)?)
        }
        assert!(matches!(parse("[smtp"), Err(AppError::Toml(_))));

        fn addr(raw: &str) -> Result<std::net::IpAddr> {
            Ok(raw.parse()?)
        }
        let err = addr("not-an-ip").unwrap_err();
        assert!(err.to_string().starts_with("Address Parsing Error"));
    }
}
