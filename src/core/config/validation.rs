//! Sanity checks applied to a fully assembled [`Config`].

use super::Config;
use crate::core::error::{AppError, Result};
use std::net::IpAddr;

pub(crate) fn validate_config(config: &Config) -> Result<()> {
    let limits = &config.rate_limits;

    if limits.max_concurrent == 0 {
        return Err(AppError::Config(
            "rate_limits.max_concurrent must be at least 1".to_string(),
        ));
    }
    if limits.max_per_domain == 0 {
        return Err(AppError::Config(
            "rate_limits.max_per_domain must be at least 1".to_string(),
        ));
    }
    if config.smtp_timeout.is_zero() {
        return Err(AppError::Config(
            "smtp.smtp_timeout must be greater than zero".to_string(),
        ));
    }
    if config.bulk_concurrency == 0 {
        return Err(AppError::Config(
            "verification.bulk_concurrency must be at least 1".to_string(),
        ));
    }
    if config.helo_identity.trim().is_empty() {
        return Err(AppError::Config(
            "smtp.helo_identity must not be empty".to_string(),
        ));
    }
    if !config.smtp_sender_email.contains('@') {
        return Err(AppError::Config(format!(
            "smtp.smtp_sender_email '{}' is not an address",
            config.smtp_sender_email
        )));
    }
    for server in &config.dns_servers {
        server.parse::<IpAddr>().map_err(|e| {
            AppError::Config(format!("Invalid DNS server '{}': {}", server, e))
        })?;
    }

    Ok(())
}
