//! Admission control for SMTP probes.
//!
//! One [`RateLimiter`] is shared by every in-flight verification of an
//! [`crate::EmailVerifier`]. Admission checks and the grant happen under the same
//! lock, so concurrent acquirers can never slip inside each other's spacing.

use crate::core::config::RateLimitConfig;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::time::sleep;

const DOMAIN_WINDOW: Duration = Duration::from_secs(60);
const GLOBAL_WINDOW: Duration = Duration::from_secs(1);
/// Re-check interval while every connection slot is taken.
const SLOT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
struct LimiterState {
    /// Grant times per domain, oldest first, pruned to [`DOMAIN_WINDOW`].
    domain_timestamps: HashMap<String, VecDeque<Instant>>,
    /// Grant times across all domains, pruned to [`GLOBAL_WINDOW`].
    global_timestamps: VecDeque<Instant>,
    active_connections: usize,
}

impl LimiterState {
    /// Drops grants that left their window, and domains with none left.
    fn prune_expired(&mut self, now: Instant) {
        prune(&mut self.global_timestamps, now, GLOBAL_WINDOW);
        self.domain_timestamps.retain(|_, times| {
            prune(times, now, DOMAIN_WINDOW);
            !times.is_empty()
        });
    }
}

fn prune(times: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = times.front() {
        if now.duration_since(oldest) >= window {
            times.pop_front();
        } else {
            break;
        }
    }
}

/// Time-windowed, concurrency-capped admission gate.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: Mutex<LimiterState>,
}

/// Proof of admission. Releases its connection slot when dropped.
#[must_use = "dropping the permit releases the slot immediately"]
#[derive(Debug)]
pub struct RateLimitPermit<'a> {
    limiter: &'a RateLimiter,
}

impl Drop for RateLimitPermit<'_> {
    fn drop(&mut self) {
        self.limiter.release();
    }
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LimiterState::default()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Waits until a probe to `domain` is allowed, then records the grant.
    ///
    /// Never fails; it only delays. The returned permit must be held for the
    /// duration of the probe.
    pub async fn acquire(&self, domain: &str) -> RateLimitPermit<'_> {
        loop {
            let wait = match self.try_grant(domain) {
                None => {
                    tracing::trace!(target: "rate_limiter", "Granted slot for {}", domain);
                    return RateLimitPermit { limiter: self };
                }
                Some(wait) => wait,
            };
            tracing::trace!(
                target: "rate_limiter",
                "Delaying probe to {} by {:?}",
                domain,
                wait
            );
            sleep(wait).await;
        }
    }

    /// Grants and returns `None`, or returns the minimal wait before the next check.
    fn try_grant(&self, domain: &str) -> Option<Duration> {
        let mut state = self.state.lock();
        let now = Instant::now();
        let cfg = &self.config;

        state.prune_expired(now);
        let mut wait = Duration::ZERO;

        if state.active_connections >= cfg.max_concurrent {
            wait = wait.max(SLOT_POLL_INTERVAL);
        }

        if let Some(times) = state.domain_timestamps.get(domain) {
            if times.len() >= cfg.max_per_domain {
                // The oldest in-window grant has to age out first.
                if let Some(&oldest) = times.front() {
                    wait = wait.max(DOMAIN_WINDOW.saturating_sub(now.duration_since(oldest)));
                }
            }
            if let Some(&latest) = times.back() {
                let elapsed = now.duration_since(latest);
                wait = wait.max(cfg.delay_between_same_domain.saturating_sub(elapsed));
            }
        }

        if let Some(&latest) = state.global_timestamps.back() {
            let elapsed = now.duration_since(latest);
            wait = wait.max(cfg.delay_between_requests.saturating_sub(elapsed));
        }

        if !wait.is_zero() {
            return Some(wait);
        }

        state.active_connections += 1;
        state
            .domain_timestamps
            .entry(domain.to_string())
            .or_default()
            .push_back(now);
        state.global_timestamps.push_back(now);
        None
    }

    /// Returns a connection slot. Called by [`RateLimitPermit`]'s `Drop`.
    fn release(&self) {
        let mut state = self.state.lock();
        state.active_connections = state.active_connections.saturating_sub(1);
    }

    /// Clears all timestamps and the active count.
    ///
    /// Meant for reusing a long-lived verifier between batches, not during one.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.domain_timestamps.clear();
        state.global_timestamps.clear();
        state.active_connections = 0;
        tracing::debug!(target: "rate_limiter", "Rate limiter reset");
    }

    /// Probes currently holding a slot.
    pub fn active_connections(&self) -> usize {
        self.state.lock().active_connections
    }
}
