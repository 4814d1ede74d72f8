//! MX resolution.
//!
//! "No such record" outcomes are terminal and reported as `Ok(None)`; anything
//! else is an error so the caller can retry it.

use crate::core::config::Config;
use crate::core::error::{AppError, Result};
use std::future::Future;
use std::net::IpAddr;
use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::ResolveErrorKind;
use trust_dns_resolver::TokioAsyncResolver;

/// Source of MX records for a domain.
pub trait MxLookup: Send + Sync {
    /// Mail exchangers for `domain`, best (lowest preference) first.
    ///
    /// `Ok(None)` means the domain definitively has no usable MX record.
    fn mx_records(&self, domain: &str)
        -> impl Future<Output = Result<Option<Vec<String>>>> + Send;
}

/// [`MxLookup`] backed by a real DNS resolver.
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
}

impl DnsResolver {
    /// Creates a resolver using the servers and timeout from `config`.
    ///
    /// An empty server list falls back to the system resolver configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut opts = ResolverOpts::default();
        opts.timeout = config.dns_timeout;
        opts.attempts = 1;

        let resolver = if config.dns_servers.is_empty() {
            tracing::debug!(target: "dns", "Using system DNS configuration");
            let (sys_config, mut sys_opts) =
                trust_dns_resolver::system_conf::read_system_conf().map_err(|e| {
                    AppError::Initialization(format!("Failed to read system DNS config: {}", e))
                })?;
            sys_opts.timeout = config.dns_timeout;
            TokioAsyncResolver::tokio(sys_config, sys_opts)
        } else {
            let ips = config
                .dns_servers
                .iter()
                .map(|s| s.parse::<IpAddr>())
                .collect::<std::result::Result<Vec<_>, _>>()?;
            tracing::debug!(target: "dns", "Using DNS servers: {:?}", ips);
            let group = NameServerConfigGroup::from_ips_clear(&ips, 53, true);
            TokioAsyncResolver::tokio(ResolverConfig::from_parts(None, vec![], group), opts)
        };

        Ok(Self { resolver })
    }
}

impl MxLookup for DnsResolver {
    async fn mx_records(&self, domain: &str) -> Result<Option<Vec<String>>> {
        tracing::debug!(target: "dns", "Looking up MX records for {}", domain);

        match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => {
                let mut records: Vec<(u16, String)> = lookup
                    .iter()
                    .map(|mx| {
                        let host = mx.exchange().to_utf8();
                        (mx.preference(), host.trim_end_matches('.').to_string())
                    })
                    .filter(|(_, host)| !host.is_empty())
                    .collect();

                if records.is_empty() {
                    tracing::debug!(target: "dns", "{} returned an empty MX set", domain);
                    return Ok(None);
                }

                records.sort_by_key(|(preference, _)| *preference);
                tracing::debug!(target: "dns", "MX records for {}: {:?}", domain, records);
                Ok(Some(records.into_iter().map(|(_, host)| host).collect()))
            }
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                    tracing::debug!(
                        target: "dns",
                        "No MX records for {} (response code {:?})",
                        domain,
                        response_code
                    );
                    Ok(None)
                }
                ResolveErrorKind::Timeout => Err(AppError::DnsTimeout(domain.to_string())),
                _ => {
                    tracing::warn!(target: "dns", "MX lookup for {} failed: {}", domain, e);
                    Err(AppError::Dns(e))
                }
            },
        }
    }
}
