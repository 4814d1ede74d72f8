//! Defines the result type for a single SMTP probe attempt.

use crate::core::models::ReasonCode;

/// The outcome of one SMTP conversation against one MX host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpResult {
    /// True only when the server accepted the recipient.
    pub valid: bool,
    /// Reply text (or local diagnostic) that produced the outcome.
    pub response: String,
    pub reason: ReasonCode,
}

impl SmtpResult {
    /// The server accepted `RCPT TO` for the target.
    pub fn accepted(response: impl Into<String>) -> Self {
        Self {
            valid: true,
            response: response.into(),
            reason: ReasonCode::MailboxExists,
        }
    }

    /// Any terminal outcome other than acceptance.
    pub fn failed(reason: ReasonCode, response: impl Into<String>) -> Self {
        Self {
            valid: false,
            response: response.into(),
            reason,
        }
    }

    /// Suggests if retrying might yield a different result.
    pub fn should_retry(&self) -> bool {
        !self.valid && self.reason.is_transient()
    }

    /// Splits into success / structured failure so the retry controller can inspect the cause.
    pub fn into_outcome(self) -> std::result::Result<SmtpResult, SmtpResult> {
        if self.valid {
            Ok(self)
        } else {
            Err(self)
        }
    }
}
