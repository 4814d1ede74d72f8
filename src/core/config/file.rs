//! Defines the structure mirroring the TOML configuration file format.

use serde::Deserialize;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub(crate) smtp: SmtpConfig,
    #[serde(default)]
    pub(crate) dns: DnsConfig,
    #[serde(default)]
    pub(crate) rate_limits: RateLimitsConfig,
    #[serde(default)]
    pub(crate) verification: VerificationConfig,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct SmtpConfig {
    /// Milliseconds.
    pub(crate) smtp_timeout: Option<u64>,
    pub(crate) smtp_port: Option<u16>,
    pub(crate) helo_identity: Option<String>,
    pub(crate) smtp_sender_email: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct DnsConfig {
    /// Milliseconds.
    pub(crate) dns_timeout: Option<u64>,
    pub(crate) dns_servers: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct RateLimitsConfig {
    pub(crate) max_per_domain: Option<usize>,
    pub(crate) max_concurrent: Option<usize>,
    pub(crate) delay_between_same_domain: Option<u64>,
    pub(crate) delay_between_requests: Option<u64>,
    pub(crate) retry_delay: Option<u64>,
    pub(crate) max_retries: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct VerificationConfig {
    pub(crate) catch_all_check_enabled: Option<bool>,
    pub(crate) bulk_concurrency: Option<usize>,
    pub(crate) max_email_length: Option<usize>,
}
