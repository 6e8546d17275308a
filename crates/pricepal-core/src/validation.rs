//! # Validation Module
//!
//! Input validation for registration, login and inventory forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Host UI                                                      │
//! │  └── Buttons disabled while required fields are empty                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Commands (apps/pricepal)                                     │
//! │  └── THIS MODULE: format and length rules                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── UNIQUE email, NOT NULL, foreign keys                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricepal_core::validation::{validate_barcode, validate_item_price};
//!
//! assert!(validate_barcode("012345678905").is_ok());
//! assert!(validate_item_price("1.99").is_ok());
//! assert!(validate_item_price("free").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

const MAX_BARCODE_LEN: usize = 64;
const MAX_NAME_LEN: usize = 200;
const MAX_EMAIL_LEN: usize = 254;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn at_most(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace
///
/// ## Returns
/// The trimmed, lowercased address used as the account key.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();
    required("email", email)?;
    at_most("email", email, MAX_EMAIL_LEN)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("missing '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@example.com"));
    }

    let dot = domain.rfind('.').ok_or_else(|| invalid("domain needs a dot"))?;
    if dot == 0 || dot == domain.len() - 1 {
        return Err(invalid("must look like name@example.com"));
    }

    Ok(email.to_lowercase())
}

/// Validates a password at registration.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a shop name. Shop names are document keys, so `/` is rejected.
///
/// ## Returns
/// The trimmed shop name.
pub fn validate_shop_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();
    required("shop name", name)?;
    at_most("shop name", name, MAX_NAME_LEN)?;

    if name.contains('/') {
        return Err(ValidationError::InvalidFormat {
            field: "shop name".to_string(),
            reason: "must not contain '/'".to_string(),
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Inventory Validators
// =============================================================================

/// Validates a barcode typed into the inventory form or decoded by the scanner.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - No whitespace (the value is used as a document field name)
pub fn validate_barcode(barcode: &str) -> ValidationResult<String> {
    let barcode = barcode.trim();
    required("barcode", barcode)?;
    at_most("barcode", barcode, MAX_BARCODE_LEN)?;

    if barcode.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(barcode.to_string())
}

/// Validates an item name.
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();
    required("item name", name)?;
    at_most("item name", name, MAX_NAME_LEN)?;
    Ok(name.to_string())
}

/// Validates an item price.
///
/// ## Rules
/// - Must not be empty
/// - Non-negative decimal: digits, optionally a `.` and one or two digits
///
/// ## Example
/// ```rust
/// use pricepal_core::validation::validate_item_price;
///
/// assert_eq!(validate_item_price(" 12.5 ").unwrap(), "12.5");
/// assert!(validate_item_price("0").is_ok());
/// assert!(validate_item_price("-1").is_err());
/// assert!(validate_item_price("1.999").is_err());
/// ```
pub fn validate_item_price(price: &str) -> ValidationResult<String> {
    let price = price.trim();
    required("price", price)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: "must be a non-negative amount with at most two decimals".to_string(),
    };

    let (whole, fraction) = match price.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (price, None),
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    if let Some(fraction) = fraction {
        if fraction.is_empty() || fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
    }

    Ok(price.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(" Owner@Example.com ").unwrap(),
            "owner@example.com"
        );
        assert!(validate_email("").is_err());
        assert!(validate_email("owner").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("owner@example").is_err());
        assert!(validate_email("owner@example.").is_err());
        assert!(validate_email("own er@example.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert_eq!(
            validate_password("abc"),
            Err(ValidationError::TooShort {
                field: "password".to_string(),
                min: 6
            })
        );
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_shop_name() {
        assert_eq!(validate_shop_name(" Corner Market ").unwrap(), "Corner Market");
        assert!(validate_shop_name("   ").is_err());
        assert!(validate_shop_name("a/b").is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("012345678905").is_ok());
        assert!(validate_barcode("ABC-123").is_ok());
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("12 34").is_err());
        assert!(validate_barcode(&"9".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_item_price() {
        assert!(validate_item_price("0").is_ok());
        assert!(validate_item_price("1.99").is_ok());
        assert!(validate_item_price("10.5").is_ok());
        assert!(validate_item_price("").is_err());
        assert!(validate_item_price("1.").is_err());
        assert!(validate_item_price(".5").is_err());
        assert!(validate_item_price("1,99").is_err());
        assert!(validate_item_price("abc").is_err());
    }
}
