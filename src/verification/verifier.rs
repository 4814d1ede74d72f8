//! The verification pipeline: single-address `verify` and order-preserving `verify_bulk`.

use crate::core::config::Config;
use crate::core::error::{AppError, Result};
use crate::core::models::{ReasonCode, VerificationResult, VerificationStatus};
use crate::utils::classify::{
    get_suggestion, is_disposable, is_free_provider, is_role_account, split_address,
    validate_syntax,
};
use crate::utils::dns::{DnsResolver, MxLookup};
use crate::utils::smtp::{MailboxProbe, SmtpProber, SmtpResult};
use crate::verification::catch_all::CatchAllDetector;
use crate::verification::rate_limit::RateLimiter;
use crate::verification::retry::{with_retry, RetryPolicy};
use crate::verification::scoring::{calculate_risk_score, RiskSignals};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

const MAX_SMTP_RESPONSE_CHARS: usize = 200;
const PORT_BLOCKED_HINT: &str = " (Port 25 may be blocked on your network)";

/// Verifies addresses using DNS, offline heuristics and a live SMTP probe.
///
/// Owns one rate limiter and one catch-all cache; both are shared by every
/// concurrent verification started through this instance.
pub struct EmailVerifier<R = DnsResolver, P = SmtpProber> {
    config: Config,
    resolver: R,
    prober: P,
    rate_limiter: RateLimiter,
    catch_all: CatchAllDetector,
}

impl EmailVerifier {
    /// Builds a verifier that resolves MX records over DNS and probes over TCP.
    pub fn new(config: Config) -> Result<Self> {
        let resolver = DnsResolver::new(&config)?;
        let prober = SmtpProber::new(&config);
        Ok(Self::with_components(config, resolver, prober))
    }
}

impl<R: MxLookup, P: MailboxProbe> EmailVerifier<R, P> {
    /// Builds a verifier around caller-supplied collaborators.
    pub fn with_components(config: Config, resolver: R, prober: P) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limits.clone());
        Self {
            config,
            resolver,
            prober,
            rate_limiter,
            catch_all: CatchAllDetector::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn catch_all_detector(&self) -> &CatchAllDetector {
        &self.catch_all
    }

    /// Forgets catch-all verdicts and rate-limit history.
    pub fn clear_cache(&self) {
        self.catch_all.clear();
        self.rate_limiter.reset();
    }

    /// Verifies one address. Never fails: internal errors (and panics) become
    /// an `unknown` / `unknown_error` result carrying the diagnostic text.
    pub async fn verify(&self, email: &str) -> VerificationResult {
        let start = Instant::now();
        let normalized = email.trim().to_lowercase();
        let suggestion = get_suggestion(&normalized);
        let mut result = VerificationResult::pending(normalized.clone(), suggestion);

        tracing::debug!(target: "verifier", "Verifying {}", normalized);
        let outcome = AssertUnwindSafe(self.run_pipeline(&normalized, &mut result))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(target: "verifier", "Verification of {} failed: {}", normalized, e);
                mark_unknown(&mut result, e.to_string());
            }
            Err(panic) => {
                let err = AppError::Task(panic_message(panic.as_ref()));
                tracing::error!(target: "verifier", "Verification of {} panicked: {}", normalized, err);
                mark_unknown(&mut result, err.to_string());
            }
        }

        result.verification_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            target: "verifier",
            "{} -> {} ({}), risk {} in {}ms",
            result.email,
            result.status,
            result.reason,
            result.risk_score,
            result.verification_time_ms
        );
        result
    }

    async fn run_pipeline(&self, email: &str, result: &mut VerificationResult) -> Result<()> {
        if email.len() > self.config.max_email_length {
            result.set_verdict(VerificationStatus::Invalid, ReasonCode::InvalidFormat);
            result.risk_score = 100;
            return Ok(());
        }

        if let Err(reason) = validate_syntax(email) {
            result.set_verdict(VerificationStatus::Invalid, reason);
            result.risk_score = 100;
            return Ok(());
        }

        let domain = split_address(email)
            .map(|(_, domain)| domain.to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AppError::DomainExtraction(email.to_string()))?;

        result.is_disposable = is_disposable(email);
        if result.is_disposable {
            result.set_verdict(VerificationStatus::Invalid, ReasonCode::DisposableDomain);
            result.risk_score = 95;
            return Ok(());
        }

        result.is_role_account = is_role_account(email);
        result.is_free_provider = is_free_provider(email);

        let Some(mx_host) = self.resolve_mx(&domain).await.and_then(|mx| mx.into_iter().next())
        else {
            result.set_verdict(VerificationStatus::Invalid, ReasonCode::NoMxRecord);
            result.risk_score = 100;
            return Ok(());
        };
        result.mx_record = Some(mx_host.clone());

        let smtp = self.probe_with_retry(email, &domain, &mx_host).await;
        result.smtp_response = truncate_response(&smtp.response);

        match smtp.reason {
            reason if reason.is_network_failure() => {
                result.set_verdict(VerificationStatus::Risky, reason);
                let mut response = result.smtp_response.take().unwrap_or_default();
                response.push_str(PORT_BLOCKED_HINT);
                result.smtp_response = Some(response);
            }
            reason @ (ReasonCode::Greylisted | ReasonCode::RateLimited | ReasonCode::Blocked) => {
                result.set_verdict(VerificationStatus::Risky, reason);
            }
            ReasonCode::MailboxNotFound => {
                result.set_verdict(VerificationStatus::Invalid, ReasonCode::MailboxNotFound);
            }
            _ if smtp.valid => {
                let catch_all = self.config.catch_all_check_enabled
                    && self
                        .catch_all
                        .is_catch_all(&domain, &mx_host, &self.prober, &self.rate_limiter)
                        .await;
                result.is_catch_all = catch_all;
                if catch_all {
                    result.set_verdict(VerificationStatus::Risky, ReasonCode::CatchAll);
                } else {
                    result.set_verdict(VerificationStatus::Valid, ReasonCode::MailboxExists);
                }
            }
            reason => {
                result.set_verdict(VerificationStatus::Risky, reason);
            }
        }

        result.risk_score = calculate_risk_score(&RiskSignals {
            status: result.status,
            reason: result.reason,
            is_catch_all: result.is_catch_all,
            is_disposable: result.is_disposable,
            is_role_account: result.is_role_account,
            is_free_provider: result.is_free_provider,
            has_mx: true,
        });
        Ok(())
    }

    /// MX hosts for `domain`, or `None` when there are none or resolution kept failing.
    async fn resolve_mx(&self, domain: &str) -> Option<Vec<String>> {
        let policy = RetryPolicy::from(&self.config.rate_limits);
        match with_retry(policy, move || self.resolver.mx_records(domain), |_| true).await {
            Ok(Some(records)) if !records.is_empty() => Some(records),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(target: "verifier", "Giving up on MX lookup for {}: {}", domain, e);
                None
            }
        }
    }

    /// One rate-limited probe, retried only on greylisting or remote rate limiting.
    async fn probe_with_retry(&self, email: &str, domain: &str, mx_host: &str) -> SmtpResult {
        let policy = RetryPolicy::from(&self.config.rate_limits);
        let _permit = self.rate_limiter.acquire(domain).await;
        with_retry(
            policy,
            move || async move { self.prober.probe(email, mx_host).await.into_outcome() },
            SmtpResult::should_retry,
        )
        .await
        .unwrap_or_else(|failure| failure)
    }

    /// Verifies many addresses. See [`Self::verify_bulk_with_progress`].
    pub async fn verify_bulk<I, S>(
        &self,
        emails: I,
        concurrency: Option<usize>,
    ) -> Vec<VerificationResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.verify_bulk_with_progress(emails, concurrency, |_, _, _| {})
            .await
    }

    /// Verifies many addresses with bounded concurrency.
    ///
    /// Input is trimmed, lower-cased and de-duplicated. At most
    /// `min(concurrency, max_concurrent)` verifications run at once.
    /// `on_progress(completed, total, result)` is called on the calling task as
    /// each one finishes. Output follows first-occurrence input order.
    pub async fn verify_bulk_with_progress<I, S, F>(
        &self,
        emails: I,
        concurrency: Option<usize>,
        mut on_progress: F,
    ) -> Vec<VerificationResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(usize, usize, &VerificationResult),
    {
        let mut seen = HashSet::new();
        let unique: Vec<String> = emails
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| seen.insert(e.clone()))
            .collect();

        let total = unique.len();
        let bound = concurrency
            .unwrap_or(self.config.bulk_concurrency)
            .min(self.config.rate_limits.max_concurrent)
            .max(1);
        tracing::info!(
            target: "verifier",
            "Bulk verification of {} unique addresses, concurrency {}",
            total,
            bound
        );

        let mut queue = unique.iter().enumerate();
        let mut in_flight = FuturesUnordered::new();
        let mut results: Vec<(usize, VerificationResult)> = Vec::with_capacity(total);
        let mut completed = 0usize;

        loop {
            while in_flight.len() < bound {
                let Some((index, email)) = queue.next() else {
                    break;
                };
                in_flight.push(async move { (index, self.verify(email).await) });
            }

            let Some((index, result)) = in_flight.next().await else {
                break;
            };
            completed += 1;
            on_progress(completed, total, &result);
            results.push((index, result));
        }

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }
}

fn mark_unknown(result: &mut VerificationResult, message: String) {
    result.set_verdict(VerificationStatus::Unknown, ReasonCode::UnknownError);
    result.smtp_response = Some(message);
    result.risk_score = calculate_risk_score(&RiskSignals {
        status: result.status,
        reason: result.reason,
        is_catch_all: result.is_catch_all,
        is_disposable: result.is_disposable,
        is_role_account: result.is_role_account,
        is_free_provider: result.is_free_provider,
        has_mx: true,
    });
}

fn truncate_response(response: &str) -> Option<String> {
    if response.is_empty() {
        return None;
    }
    Some(response.chars().take(MAX_SMTP_RESPONSE_CHARS).collect())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "verification panicked".to_string()
    }
}
