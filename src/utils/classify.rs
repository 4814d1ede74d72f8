//! Offline heuristics: syntax validation and lookup-table classification.
//!
//! Nothing here touches the network, so these checks run before any DNS or
//! SMTP work and can short-circuit the pipeline.

use crate::core::models::ReasonCode;
use crate::utils::lists::{DISPOSABLE_DOMAINS, DOMAIN_TYPOS, FREE_PROVIDERS, ROLE_PREFIXES};
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 255;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    let pattern = r#"^(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$"#;
    Regex::new(pattern).expect("Email syntax regex failed to compile. This is a bug.")
});

/// Splits an address at its last `@`.
pub(crate) fn split_address(email: &str) -> Option<(&str, &str)> {
    email.rsplit_once('@')
}

fn domain_of(email: &str) -> Option<String> {
    split_address(email)
        .map(|(_, domain)| domain.to_lowercase())
        .filter(|d| !d.is_empty())
}

/// Checks an address against a practical RFC 5322 grammar.
///
/// Returns `Err(InvalidFormat)` when the overall shape is wrong and
/// `Err(InvalidSyntax)` for the finer structural rules.
pub fn validate_syntax(email: &str) -> Result<(), ReasonCode> {
    let trimmed = email.trim().to_lowercase();
    if trimmed.is_empty() {
        return Err(ReasonCode::InvalidSyntax);
    }

    if !EMAIL_REGEX.is_match(&trimmed) {
        return Err(ReasonCode::InvalidFormat);
    }

    let (local, domain) = split_address(&trimmed).ok_or(ReasonCode::InvalidSyntax)?;

    if local.is_empty() || local.len() > MAX_LOCAL_PART_LEN {
        return Err(ReasonCode::InvalidSyntax);
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err(ReasonCode::InvalidSyntax);
    }

    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN || !domain.contains('.') {
        return Err(ReasonCode::InvalidSyntax);
    }

    let Some((without_tld, tld)) = domain.rsplit_once('.') else {
        return Err(ReasonCode::InvalidSyntax);
    };
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ReasonCode::InvalidSyntax);
    }
    if !without_tld.is_empty() && without_tld.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReasonCode::InvalidSyntax);
    }

    Ok(())
}

/// True when the domain, or any parent domain of it, is a known disposable provider.
pub fn is_disposable(email: &str) -> bool {
    let Some(domain) = domain_of(email) else {
        return false;
    };
    if DISPOSABLE_DOMAINS.contains(&domain) {
        return true;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    (1..labels.len().saturating_sub(1))
        .map(|i| labels[i..].join("."))
        .any(|suffix| DISPOSABLE_DOMAINS.contains(&suffix))
}

pub fn is_free_provider(email: &str) -> bool {
    domain_of(email).is_some_and(|d| FREE_PROVIDERS.contains(d.as_str()))
}

/// True for functional mailboxes such as `support@`, `admin2@` or `sales-eu@`.
pub fn is_role_account(email: &str) -> bool {
    let Some((local, _)) = split_address(email) else {
        return false;
    };
    let local = local.to_lowercase();
    if local.is_empty() {
        return false;
    }

    if ROLE_PREFIXES.contains(local.as_str()) {
        return true;
    }

    let without_digits = local.trim_end_matches(|c: char| c.is_ascii_digit());
    if ROLE_PREFIXES.contains(without_digits) {
        return true;
    }

    ROLE_PREFIXES.iter().any(|prefix| {
        local
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(['.', '_', '-']))
    })
}

/// Suggests a corrected address when the domain (or its TLD) is a known typo.
///
/// Only exact table hits produce a suggestion.
pub fn get_suggestion(email: &str) -> Option<String> {
    let lowered = email.to_lowercase();
    let (local, domain) = lowered.split_once('@')?;
    if domain.is_empty() {
        return None;
    }

    if let Some(correction) = DOMAIN_TYPOS.get(domain) {
        return Some(format!("{}@{}", local, correction));
    }

    let (head, tld) = domain.rsplit_once('.')?;
    let tld_key = format!(".{}", tld);
    DOMAIN_TYPOS
        .get(tld_key.as_str())
        .map(|fixed| format!("{}@{}{}", local, head, fixed))
}
