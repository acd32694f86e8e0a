//! Input validation shared by the lifecycle and catalog operations.
//!
//! Each helper returns the normalized value (trimmed text, `None` for blank
//! optional fields) so callers store exactly what was validated.

use crate::errors::{Error, Result};
use validator::ValidateEmail;

/// Requires a non-blank value of at most `max_chars` characters.
pub fn require_text(field: &'static str, value: &str, max_chars: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    if trimmed.chars().count() > max_chars {
        return Err(Error::validation(
            field,
            format!("must be at most {max_chars} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Accepts digits with common separators; 10 to 15 digits in total.
pub fn validate_phone(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ');
    if trimmed.is_empty() || !trimmed.chars().all(allowed) {
        return Err(Error::validation("phone", format!("'{trimmed}' is not a phone number")));
    }

    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    if !(10..=15).contains(&digits) {
        return Err(Error::validation(
            "phone",
            format!("'{trimmed}' must contain 10 to 15 digits"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validates a required email address.
///
/// On top of the syntax check the domain must contain a dot, so local-only
/// hosts such as `user@localhost` are rejected.
pub fn validate_email(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let dotted_domain = trimmed
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));
    if !trimmed.validate_email() || !dotted_domain {
        return Err(Error::validation("email", format!("'{trimmed}' is not an email address")));
    }
    Ok(trimmed.to_string())
}

/// Validates an optional email; blank input counts as absent.
pub fn validate_optional_email(value: Option<&str>) -> Result<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(email) => validate_email(email).map(Some),
    }
}

/// Prices must be finite and non-negative.
pub fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(price)
}

/// Quantities must be at least 1.
pub const fn validate_quantity(quantity: i32) -> Result<i32> {
    if quantity < 1 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("name", "  Rose  ", 10).unwrap(), "Rose");
        assert!(matches!(
            require_text("name", "   ", 10),
            Err(Error::Validation { field: "name", .. })
        ));
        assert!(require_text("name", "Хризантема", 10).is_ok());
        assert!(require_text("name", "Хризантемы", 9).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone(" +7 (900) 123-45-67 ").unwrap(), "+7 (900) 123-45-67");
        assert!(validate_phone("89001234567").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me maybe").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("anna@example.com").unwrap(), "anna@example.com");
        assert!(validate_email("anna@").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("anna@example").is_err());
        assert!(validate_email("an na@example.com").is_err());
    }

    #[test]
    fn test_validate_email_rejects_malformed_domains_and_quotes() {
        for bad in ["a@b..c", "a@-.x", "a@b.c)", "\"@x.y", "a@.ru", "a@b.ru."] {
            assert!(
                matches!(validate_email(bad), Err(Error::Validation { field: "email", .. })),
                "{bad} should be rejected"
            );
        }
        assert!(validate_email("first.last+tag@flowers-shop.ru").is_ok());
    }

    #[test]
    fn test_validate_optional_email() {
        assert_eq!(validate_optional_email(None).unwrap(), None);
        assert_eq!(validate_optional_email(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_optional_email(Some("a@b.ru")).unwrap(),
            Some("a@b.ru".to_string())
        );
        assert!(validate_optional_email(Some("nope")).is_err());
    }

    #[test]
    fn test_validate_price_and_quantity() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
        assert_eq!(validate_quantity(1).unwrap(), 1);
        assert!(matches!(
            validate_quantity(0),
            Err(Error::InvalidQuantity { quantity: 0 })
        ));
    }
}
