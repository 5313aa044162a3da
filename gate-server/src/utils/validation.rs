//! Input validation helpers
//!
//! Centralized length constants and validation for values arriving from
//! readers and clients. Rejection here happens before any store lookup and
//! produces no log entry or alert.

use crate::utils::AppError;

// ── Length limits ───────────────────────────────────────────────────

/// NFC tokens shorter than this are reader noise, not lookups
pub const MIN_TOKEN_LEN: usize = 6;

/// Upper bound for tokens and other short identifiers
pub const MAX_TOKEN_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate a presented NFC token.
///
/// Returns the trimmed token on success. Whitespace-padded reads are
/// common with handheld readers, so trimming happens before the length
/// check.
pub fn validate_token(raw: &str) -> Result<&str, AppError> {
    let token = raw.trim();
    if token.len() < MIN_TOKEN_LEN {
        return Err(AppError::Validation("Invalid NFC token".to_string()));
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(AppError::Validation(format!(
            "NFC token is too long ({} chars, max {MAX_TOKEN_LEN})",
            token.len()
        )));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tokens_rejected() {
        assert!(validate_token("12345").is_err());
        assert!(validate_token("  12345  ").is_err());
        assert!(validate_token("").is_err());
    }

    #[test]
    fn trimmed_token_returned() {
        assert_eq!(validate_token("  abc123  ").unwrap(), "abc123");
    }

    #[test]
    fn oversized_token_rejected() {
        let long = "x".repeat(MAX_TOKEN_LEN + 1);
        assert!(validate_token(&long).is_err());
    }
}
