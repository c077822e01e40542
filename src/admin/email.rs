//! Email helpers shared by the HTTP layer and registration.

use regex::Regex;

/// Normalize an email for lookup/uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
#[must_use]
pub fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Ada@X.COM "), "ada@x.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@x.com"));
        assert!(valid_email("name.surname@agency.travel"));
    }

    #[test]
    fn valid_email_rejects_malformed() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a@x"));
        assert!(!valid_email("a b@x.com"));
        assert!(!valid_email(""));
    }
}
