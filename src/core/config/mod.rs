//! Defines the core runtime `Config` struct, its defaults, and related utilities.
//! Submodules handle loading, building, and validation.

pub(crate) mod builder;
pub(crate) mod file;
pub(crate) mod loading;
pub(crate) mod validation;

pub use builder::{CliOverrides, ConfigBuilder};
pub use file::ConfigFile;
pub use loading::{find_config_file, load_config_file};

use std::time::Duration;

/// Admission-control and retry settings shared by every SMTP probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests to one domain allowed within any trailing 60 seconds.
    pub max_per_domain: usize,
    /// SMTP connections open at once, process-wide.
    pub max_concurrent: usize,
    pub delay_between_same_domain: Duration,
    pub delay_between_requests: Duration,
    /// Base of the exponential backoff between retries.
    pub retry_delay: Duration,
    pub max_retries: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_domain: 10,
            max_concurrent: 5,
            delay_between_same_domain: Duration::from_millis(200),
            delay_between_requests: Duration::from_millis(50),
            retry_delay: Duration::from_millis(1000),
            max_retries: 1,
        }
    }
}

/// Runtime configuration settings used by the verification engine.
#[derive(Debug, Clone)]
pub struct Config {
    pub smtp_timeout: Duration,
    pub smtp_port: u16,
    /// Name announced in EHLO/HELO; also the domain of the probe sender.
    pub helo_identity: String,
    pub smtp_sender_email: String,

    pub dns_timeout: Duration,
    pub dns_servers: Vec<String>,

    pub catch_all_check_enabled: bool,
    pub bulk_concurrency: usize,
    pub max_email_length: usize,

    pub rate_limits: RateLimitConfig,

    pub loaded_config_path: Option<String>,
}

impl Config {
    fn build_default() -> Self {
        let dns_servers = vec![
            "8.8.8.8".to_string(),
            "8.8.4.4".to_string(),
            "1.1.1.1".to_string(),
            "1.0.0.1".to_string(),
        ];

        Config {
            smtp_timeout: Duration::from_secs(5),
            smtp_port: 25,
            helo_identity: "verify.local".to_string(),
            smtp_sender_email: "verify@verify.local".to_string(),
            dns_timeout: Duration::from_secs(5),
            dns_servers,
            catch_all_check_enabled: false,
            bulk_concurrency: 5,
            max_email_length: 254,
            rate_limits: RateLimitConfig::default(),
            loaded_config_path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::build_default()
    }
}
