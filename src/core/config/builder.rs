//! Layered construction of [`Config`]: defaults, then file values, then CLI overrides.

use super::file::ConfigFile;
use super::validation::validate_config;
use super::{Config, RateLimitConfig};
use crate::core::error::Result;
use std::time::Duration;

/// Values supplied on the command line. `None` leaves the lower layer untouched.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub smtp_timeout_ms: Option<u64>,
    pub smtp_port: Option<u16>,
    pub catch_all_check_enabled: Option<bool>,
    pub max_concurrent: Option<usize>,
    pub max_per_domain: Option<usize>,
    pub bulk_concurrency: Option<usize>,
}

/// Builds a validated [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Applies every value present in a parsed configuration file.
    pub fn with_file(mut self, file: &ConfigFile, source_path: Option<String>) -> Self {
        let c = &mut self.config;

        if let Some(ms) = file.smtp.smtp_timeout {
            c.smtp_timeout = Duration::from_millis(ms);
        }
        if let Some(port) = file.smtp.smtp_port {
            c.smtp_port = port;
        }
        if let Some(ref identity) = file.smtp.helo_identity {
            c.helo_identity = identity.clone();
        }
        if let Some(ref sender) = file.smtp.smtp_sender_email {
            c.smtp_sender_email = sender.clone();
        }

        if let Some(ms) = file.dns.dns_timeout {
            c.dns_timeout = Duration::from_millis(ms);
        }
        if let Some(ref servers) = file.dns.dns_servers {
            c.dns_servers = servers.clone();
        }

        let limits = &file.rate_limits;
        if let Some(v) = limits.max_per_domain {
            c.rate_limits.max_per_domain = v;
        }
        if let Some(v) = limits.max_concurrent {
            c.rate_limits.max_concurrent = v;
        }
        if let Some(ms) = limits.delay_between_same_domain {
            c.rate_limits.delay_between_same_domain = Duration::from_millis(ms);
        }
        if let Some(ms) = limits.delay_between_requests {
            c.rate_limits.delay_between_requests = Duration::from_millis(ms);
        }
        if let Some(ms) = limits.retry_delay {
            c.rate_limits.retry_delay = Duration::from_millis(ms);
        }
        if let Some(v) = limits.max_retries {
            c.rate_limits.max_retries = v;
        }

        if let Some(v) = file.verification.catch_all_check_enabled {
            c.catch_all_check_enabled = v;
        }
        if let Some(v) = file.verification.bulk_concurrency {
            c.bulk_concurrency = v;
        }
        if let Some(v) = file.verification.max_email_length {
            c.max_email_length = v;
        }

        c.loaded_config_path = source_path;
        self
    }

    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Self {
        let c = &mut self.config;
        if let Some(ms) = overrides.smtp_timeout_ms {
            c.smtp_timeout = Duration::from_millis(ms);
        }
        if let Some(port) = overrides.smtp_port {
            c.smtp_port = port;
        }
        if let Some(v) = overrides.catch_all_check_enabled {
            c.catch_all_check_enabled = v;
        }
        if let Some(v) = overrides.max_concurrent {
            c.rate_limits.max_concurrent = v;
        }
        if let Some(v) = overrides.max_per_domain {
            c.rate_limits.max_per_domain = v;
        }
        if let Some(v) = overrides.bulk_concurrency {
            c.bulk_concurrency = v;
        }
        self
    }

    pub fn smtp_timeout(mut self, timeout: Duration) -> Self {
        self.config.smtp_timeout = timeout;
        self
    }

    pub fn smtp_port(mut self, port: u16) -> Self {
        self.config.smtp_port = port;
        self
    }

    pub fn catch_all_check(mut self, enabled: bool) -> Self {
        self.config.catch_all_check_enabled = enabled;
        self
    }

    pub fn rate_limits(mut self, limits: RateLimitConfig) -> Self {
        self.config.rate_limits = limits;
        self
    }

    pub fn dns_servers(mut self, servers: Vec<String>) -> Self {
        self.config.dns_servers = servers;
        self
    }

    pub fn bulk_concurrency(mut self, concurrency: usize) -> Self {
        self.config.bulk_concurrency = concurrency;
        self
    }

    /// Validates and returns the assembled configuration.
    pub fn build(self) -> Result<Config> {
        validate_config(&self.config)?;
        tracing::debug!("Built configuration: {:?}", self.config);
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_beat_file_values() {
        let file: ConfigFile = toml::from_str(
            r#"
            [smtp]
            smtp_timeout = 9000
            [rate_limits]
            max_concurrent = 3
            max_retries = 4
            "#,
        )
        .unwrap();
        let overrides = CliOverrides {
            smtp_timeout_ms: Some(1500),
            ..Default::default()
        };

        let config = ConfigBuilder::new()
            .with_file(&file, Some("test.toml".into()))
            .with_overrides(&overrides)
            .build()
            .unwrap();

        assert_eq!(config.smtp_timeout, Duration::from_millis(1500));
        assert_eq!(config.rate_limits.max_concurrent, 3);
        assert_eq!(config.rate_limits.max_retries, 4);
        assert_eq!(config.loaded_config_path.as_deref(), Some("test.toml"));
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.smtp_timeout, Duration::from_secs(5));
        assert!(!config.catch_all_check_enabled);
        assert_eq!(config.rate_limits.max_per_domain, 10);
        assert_eq!(config.rate_limits.max_concurrent, 5);
        assert_eq!(
            config.rate_limits.delay_between_same_domain,
            Duration::from_millis(200)
        );
        assert_eq!(config.rate_limits.max_retries, 1);
    }

    #[test]
    fn build_rejects_zero_concurrency() {
        let limits = RateLimitConfig {
            max_concurrent: 0,
            ..Default::default()
        };
        assert!(ConfigBuilder::new().rate_limits(limits).build().is_err());
    }
}
