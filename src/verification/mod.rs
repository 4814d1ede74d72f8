//! The verification engine: admission control, retries, catch-all detection,
//! scoring and the orchestrating pipeline.

pub mod catch_all;
pub mod rate_limit;
pub mod retry;
pub mod scoring;
pub mod verifier;

pub use catch_all::CatchAllDetector;
pub use rate_limit::{RateLimitPermit, RateLimiter};
pub use retry::{with_retry, RetryPolicy};
pub use scoring::{calculate_risk_score, RiskSignals};
pub use verifier::EmailVerifier;
