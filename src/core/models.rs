//! Data structures exchanged with callers of the verification engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall verdict for one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Valid,
    Invalid,
    Risky,
    Unknown,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Valid => "valid",
            VerificationStatus::Invalid => "invalid",
            VerificationStatus::Risky => "risky",
            VerificationStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a result carries its status. The set is closed; callers may match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    MailboxExists,
    MailboxNotFound,
    CatchAll,
    InvalidSyntax,
    InvalidFormat,
    NoMxRecord,
    DisposableDomain,
    RoleAccount,
    Timeout,
    ConnectionError,
    Blocked,
    Greylisted,
    RateLimited,
    SmtpError,
    UnknownError,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::MailboxExists => "mailbox_exists",
            ReasonCode::MailboxNotFound => "mailbox_not_found",
            ReasonCode::CatchAll => "catch_all",
            ReasonCode::InvalidSyntax => "invalid_syntax",
            ReasonCode::InvalidFormat => "invalid_format",
            ReasonCode::NoMxRecord => "no_mx_record",
            ReasonCode::DisposableDomain => "disposable_domain",
            ReasonCode::RoleAccount => "role_account",
            ReasonCode::Timeout => "timeout",
            ReasonCode::ConnectionError => "connection_error",
            ReasonCode::Blocked => "blocked",
            ReasonCode::Greylisted => "greylisted",
            ReasonCode::RateLimited => "rate_limited",
            ReasonCode::SmtpError => "smtp_error",
            ReasonCode::UnknownError => "unknown_error",
        }
    }

    /// Remote-side temporary refusals that may clear on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, ReasonCode::Greylisted | ReasonCode::RateLimited)
    }

    /// Failures of the local network path rather than verdicts about the mailbox.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, ReasonCode::Timeout | ReasonCode::ConnectionError)
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete outcome of verifying a single address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Trimmed, lower-cased form of the input.
    pub email: String,
    pub status: VerificationStatus,
    pub reason: ReasonCode,
    pub is_valid: bool,
    pub is_disposable: bool,
    pub is_role_account: bool,
    pub is_free_provider: bool,
    pub is_catch_all: bool,
    /// Highest-priority MX host, when resolution succeeded.
    pub mx_record: Option<String>,
    /// Server reply text (or diagnostic), at most 200 characters plus any network hint.
    pub smtp_response: Option<String>,
    /// 0 (safe) to 100 (certain to bounce).
    pub risk_score: u8,
    /// Corrected address when the domain matches a known typo.
    pub suggestion: Option<String>,
    pub verified_at: DateTime<Utc>,
    pub verification_time_ms: u64,
}

impl VerificationResult {
    /// A result in its initial state: `unknown`, all flags cleared.
    pub(crate) fn pending(email: String, suggestion: Option<String>) -> Self {
        Self {
            email,
            status: VerificationStatus::Unknown,
            reason: ReasonCode::UnknownError,
            is_valid: false,
            is_disposable: false,
            is_role_account: false,
            is_free_provider: false,
            is_catch_all: false,
            mx_record: None,
            smtp_response: None,
            risk_score: 50,
            suggestion,
            verified_at: Utc::now(),
            verification_time_ms: 0,
        }
    }

    pub(crate) fn set_verdict(&mut self, status: VerificationStatus, reason: ReasonCode) {
        self.status = status;
        self.reason = reason;
        self.is_valid = status == VerificationStatus::Valid;
    }
}

/// Aggregate counts over a finished bulk run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub risky: usize,
    pub unknown: usize,
    pub average_risk_score: f64,
}

impl BulkSummary {
    pub fn from_results(results: &[VerificationResult]) -> Self {
        let mut summary = BulkSummary {
            total: results.len(),
            ..Default::default()
        };
        let mut score_sum: u64 = 0;
        for result in results {
            match result.status {
                VerificationStatus::Valid => summary.valid += 1,
                VerificationStatus::Invalid => summary.invalid += 1,
                VerificationStatus::Risky => summary.risky += 1,
                VerificationStatus::Unknown => summary.unknown += 1,
            }
            score_sum += u64::from(result.risk_score);
        }
        if summary.total > 0 {
            summary.average_risk_score = score_sum as f64 / summary.total as f64;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes_serialize_as_snake_case() {
        let json = serde_json::to_string(&ReasonCode::MailboxNotFound).unwrap();
        assert_eq!(json, "\"mailbox_not_found\"");
        assert_eq!(ReasonCode::NoMxRecord.to_string(), "no_mx_record");
    }

    #[test]
    fn verdict_sets_is_valid_only_for_valid_status() {
        let mut result = VerificationResult::pending("a@b.com".into(), None);
        result.set_verdict(VerificationStatus::Valid, ReasonCode::MailboxExists);
        assert!(result.is_valid);
        result.set_verdict(VerificationStatus::Risky, ReasonCode::CatchAll);
        assert!(!result.is_valid);
    }

    #[test]
    fn summary_counts_each_status() {
        let mut a = VerificationResult::pending("a@b.com".into(), None);
        a.set_verdict(VerificationStatus::Valid, ReasonCode::MailboxExists);
        a.risk_score = 10;
        let mut b = VerificationResult::pending("c@d.com".into(), None);
        b.set_verdict(VerificationStatus::Invalid, ReasonCode::NoMxRecord);
        b.risk_score = 100;
        let summary = BulkSummary::from_results(&[a, b]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.risky, 0);
        assert!((summary.average_risk_score - 55.0).abs() < f64::EPSILON);
    }
}
