//! Fuses verification signals into a single 0-100 risk score.

use crate::core::models::{ReasonCode, VerificationStatus};

/// Inputs to [`calculate_risk_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskSignals {
    pub status: VerificationStatus,
    pub reason: ReasonCode,
    pub is_catch_all: bool,
    pub is_disposable: bool,
    pub is_role_account: bool,
    pub is_free_provider: bool,
    pub has_mx: bool,
}

/// Deterministic risk score, higher is riskier.
///
/// Order: status base, additive adjustments, floors (disposable, missing MX),
/// then reason caps. A cap can therefore pull a floor back down.
pub fn calculate_risk_score(signals: &RiskSignals) -> u8 {
    let mut score: f64 = match signals.status {
        VerificationStatus::Valid => 5.0,
        VerificationStatus::Risky => 50.0,
        VerificationStatus::Unknown => 60.0,
        VerificationStatus::Invalid => 95.0,
    };

    if signals.is_catch_all {
        score += 25.0;
    }
    if signals.is_role_account {
        score += 10.0;
    }
    if signals.is_free_provider {
        score += 3.0;
    }

    if signals.is_disposable {
        score = score.max(90.0);
    }
    if !signals.has_mx {
        score = score.max(95.0);
    }

    match signals.reason {
        ReasonCode::Greylisted => score = score.min(55.0),
        ReasonCode::Timeout => score = score.min(65.0),
        ReasonCode::MailboxExists if !signals.is_catch_all => score = score.min(15.0),
        _ => {}
    }

    score.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(status: VerificationStatus, reason: ReasonCode) -> RiskSignals {
        RiskSignals {
            status,
            reason,
            is_catch_all: false,
            is_disposable: false,
            is_role_account: false,
            is_free_provider: false,
            has_mx: true,
        }
    }

    #[test]
    fn base_scores_by_status() {
        use VerificationStatus::*;
        assert_eq!(calculate_risk_score(&signals(Valid, ReasonCode::MailboxExists)), 5);
        assert_eq!(calculate_risk_score(&signals(Risky, ReasonCode::Blocked)), 50);
        assert_eq!(calculate_risk_score(&signals(Unknown, ReasonCode::UnknownError)), 60);
        assert_eq!(calculate_risk_score(&signals(Invalid, ReasonCode::MailboxNotFound)), 95);
    }

    #[test]
    fn mailbox_exists_is_capped_unless_catch_all() {
        let mut s = signals(VerificationStatus::Valid, ReasonCode::MailboxExists);
        s.is_role_account = true;
        s.is_free_provider = true;
        assert_eq!(calculate_risk_score(&s), 15);
    }

    #[test]
    fn catch_all_adds_risk() {
        let mut s = signals(VerificationStatus::Risky, ReasonCode::CatchAll);
        s.is_catch_all = true;
        assert_eq!(calculate_risk_score(&s), 75);
        s.is_role_account = true;
        s.is_free_provider = true;
        assert_eq!(calculate_risk_score(&s), 88);
    }

    #[test]
    fn floors_apply_after_additions() {
        let mut s = signals(VerificationStatus::Risky, ReasonCode::SmtpError);
        s.is_disposable = true;
        s.is_role_account = true;
        assert_eq!(calculate_risk_score(&s), 90);

        let mut s = signals(VerificationStatus::Invalid, ReasonCode::NoMxRecord);
        s.has_mx = false;
        assert_eq!(calculate_risk_score(&s), 95);
    }

    #[test]
    fn reason_caps_run_last() {
        let mut s = signals(VerificationStatus::Risky, ReasonCode::Greylisted);
        s.is_role_account = true;
        assert_eq!(calculate_risk_score(&s), 55);

        s.is_disposable = true;
        assert_eq!(calculate_risk_score(&s), 55);

        let t = signals(VerificationStatus::Risky, ReasonCode::Timeout);
        assert_eq!(calculate_risk_score(&t), 50);
    }

    #[test]
    fn score_is_clamped() {
        let mut s = signals(VerificationStatus::Invalid, ReasonCode::MailboxNotFound);
        s.is_catch_all = true;
        s.is_role_account = true;
        s.is_free_provider = true;
        assert_eq!(calculate_risk_score(&s), 100);
    }

    #[test]
    fn every_combination_stays_in_range() {
        use VerificationStatus::*;
        let statuses = [Valid, Invalid, Risky, Unknown];
        let reasons = [
            ReasonCode::MailboxExists,
            ReasonCode::MailboxNotFound,
            ReasonCode::CatchAll,
            ReasonCode::Greylisted,
            ReasonCode::Timeout,
            ReasonCode::UnknownError,
        ];
        for status in statuses {
            for reason in reasons {
                for bits in 0u8..32 {
                    let s = RiskSignals {
                        status,
                        reason,
                        is_catch_all: bits & 1 != 0,
                        is_disposable: bits & 2 != 0,
                        is_role_account: bits & 4 != 0,
                        is_free_provider: bits & 8 != 0,
                        has_mx: bits & 16 != 0,
                    };
                    assert!(calculate_risk_score(&s) <= 100);
                }
            }
        }
    }
}
