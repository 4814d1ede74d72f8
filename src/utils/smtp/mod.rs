//! SMTP mailbox probing: result type, protocol state machine and the socket driver.

pub mod probe;
pub mod protocol;
pub mod result;

pub use probe::SmtpProber;
pub use result::SmtpResult;

use std::future::Future;

/// Runs one verification attempt for `email` against `mx_host`.
///
/// Implementations produce exactly one outcome and never panic on network
/// failure; errors are folded into [`SmtpResult::reason`].
pub trait MailboxProbe: Send + Sync {
    fn probe(&self, email: &str, mx_host: &str) -> impl Future<Output = SmtpResult> + Send;
}
