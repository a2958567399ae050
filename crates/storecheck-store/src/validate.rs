//! Input checks applied before any administrative write.
//!
//! Each check returns the normalized value on success so callers store
//! exactly what was validated.

use storecheck_contracts::error::{StorecheckError, StorecheckResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Trim `value` and reject it if nothing is left.
pub fn required_text(field: &str, value: &str) -> StorecheckResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StorecheckError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Accept `local@domain.tld`, lower-cased.
pub fn email(value: &str) -> StorecheckResult<String> {
    let candidate = required_text("email", value)?.to_lowercase();
    let malformed = || StorecheckError::validation(format!("email '{candidate}' is malformed"));

    if candidate.chars().any(char::is_whitespace) {
        return Err(malformed());
    }
    let (local, domain) = candidate.split_once('@').ok_or_else(malformed)?;
    if local.is_empty() || domain.contains('@') {
        return Err(malformed());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(malformed());
    }
    Ok(candidate)
}

pub fn password(value: &str) -> StorecheckResult<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(StorecheckError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
