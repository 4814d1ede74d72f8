//! Catch-all detection: does the domain accept a mailbox that cannot exist?

use crate::utils::smtp::MailboxProbe;
use crate::verification::rate_limit::RateLimiter;
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

const TOKEN_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const TOKEN_LEN: usize = 13;

/// Builds a local part from a timestamp and a random token, e.g.
/// `verify-1718000000000-k3j9x0q2m1z7a@example.com`.
pub fn synthetic_address(domain: &str) -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARS[rng.gen_range(0..TOKEN_CHARS.len())] as char)
        .collect();
    let millis = chrono::Utc::now().timestamp_millis();
    format!("verify-{}-{}@{}", millis, token, domain)
}

/// Per-domain catch-all verdicts, computed at most once per domain.
///
/// Concurrent callers for the same domain share a single synthetic probe.
/// Entries never expire.
#[derive(Debug, Default)]
pub struct CatchAllDetector {
    cache: Mutex<HashMap<String, Arc<OnceCell<bool>>>>,
}

impl CatchAllDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `domain` accepts arbitrary recipients, probing `mx_host`
    /// under `limiter` the first time the domain is seen.
    pub async fn is_catch_all<P: MailboxProbe>(
        &self,
        domain: &str,
        mx_host: &str,
        prober: &P,
        limiter: &RateLimiter,
    ) -> bool {
        let cell = {
            let mut cache = self.cache.lock();
            Arc::clone(cache.entry(domain.to_string()).or_default())
        };

        let verdict = cell
            .get_or_init(|| async {
                let _permit = limiter.acquire(domain).await;
                let address = synthetic_address(domain);
                tracing::debug!(target: "verifier", "Catch-all probe for {} using {}", domain, address);
                let result = prober.probe(&address, mx_host).await;
                if result.valid {
                    tracing::info!(target: "verifier", "{} accepts any recipient (catch-all)", domain);
                }
                result.valid
            })
            .await;
        *verdict
    }

    /// The cached verdict, if the domain has been probed.
    pub fn cached(&self, domain: &str) -> Option<bool> {
        self.cache
            .lock()
            .get(domain)
            .and_then(|cell| cell.get().copied())
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}
