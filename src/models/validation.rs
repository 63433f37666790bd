//! Field validators shared by request payloads

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{9}[\dX]|\d{13})$").expect("valid ISBN regex"));

/// Reject empty or whitespace-only strings
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Reject leading or trailing whitespace
pub fn trimmed(value: &str) -> Result<(), ValidationError> {
    if value.trim() != value {
        let mut err = ValidationError::new("whitespace");
        err.message = Some("must not start or end with whitespace".into());
        return Err(err);
    }
    Ok(())
}

/// Strip separators and upper-case a trailing check character
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Validate an ISBN-10 or ISBN-13 after normalization
pub fn valid_isbn(isbn: &str) -> Result<(), ValidationError> {
    if ISBN_RE.is_match(&normalize_isbn(isbn)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("isbn");
        err.message = Some("ISBN must have 10 or 13 digits".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Dune").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   \t").is_err());
    }

    #[test]
    fn test_trimmed() {
        assert!(trimmed("alice").is_ok());
        assert!(trimmed("mary jane").is_ok());
        assert!(trimmed(" alice").is_err());
        assert!(trimmed("alice\n").is_err());
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn("978-2-07-040850-4"), "9782070408504");
        assert_eq!(normalize_isbn("2 07 040850 x"), "207040850X");
    }

    #[test]
    fn test_valid_isbn() {
        assert!(valid_isbn("978-2-07-040850-4").is_ok());
        assert!(valid_isbn("0-306-40615-2").is_ok());
        assert!(valid_isbn("080442957X").is_ok());
        assert!(valid_isbn("12345").is_err());
        assert!(valid_isbn("97820704085X4").is_err());
        assert!(valid_isbn("abcdefghij").is_err());
    }
}
