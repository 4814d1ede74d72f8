//! # email-verifier
//!
//! Checks whether an email address is deliverable without sending mail:
//! offline heuristics (syntax, disposable domains, role accounts, typos),
//! MX resolution, and a live SMTP handshake that stops after `RCPT TO`.
//!
//! ```no_run
//! use email_verifier_core::{ConfigBuilder, EmailVerifier};
//!
//! # async fn run() -> email_verifier_core::Result<()> {
//! let verifier = EmailVerifier::new(ConfigBuilder::new().build()?)?;
//! let result = verifier.verify("jane@example.com").await;
//! println!("{} ({})", result.status, result.reason);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod utils;
pub mod verification;

pub use crate::core::config::{CliOverrides, Config, ConfigBuilder, ConfigFile, RateLimitConfig};
pub use crate::core::error::{AppError, Result};
pub use crate::core::models::{BulkSummary, ReasonCode, VerificationResult, VerificationStatus};
pub use crate::utils::classify::{
    get_suggestion, is_disposable, is_free_provider, is_role_account, validate_syntax,
};
pub use crate::utils::dns::{DnsResolver, MxLookup};
pub use crate::utils::smtp::{MailboxProbe, SmtpProber, SmtpResult};
pub use crate::verification::{
    calculate_risk_score, EmailVerifier, RateLimitPermit, RateLimiter, RetryPolicy, RiskSignals,
};
