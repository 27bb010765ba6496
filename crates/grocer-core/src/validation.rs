//! # Validation Module
//!
//! Input validation for forms submitted to the storefront backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form fields (web UI)                                         │
//! │  └── Required markers, input types                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Runs before any request leaves the client                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST backend                                                 │
//! │  └── Authoritative; its message is shown when it rejects a request     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
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
/// - Domain must contain a dot that is not at either end
///
/// ```rust
/// use grocer_core::validation::validate_email;
///
/// assert!(validate_email("asha@example.in").is_ok());
/// assert!(validate_email("asha@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a new password and its confirmation.
///
/// ## Rules
/// - At least 8 characters
/// - Confirmation must match
pub fn validate_new_password(password: &str, confirm: &str) -> ValidationResult<()> {
    required("password", password)?;

    if password.chars().count() < 8 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        });
    }

    if password != confirm {
        return Err(ValidationError::Mismatch {
            field: "confirm_password".to_string(),
            other: "password".to_string(),
        });
    }

    Ok(())
}

/// Validates a one-time password from the forgot-password email.
///
/// ## Rules
/// - Exactly 6 ASCII digits
pub fn validate_otp(otp: &str) -> ValidationResult<()> {
    let otp = otp.trim();
    required("otp", otp)?;

    if otp.len() != 6 || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "otp".to_string(),
            reason: "must be 6 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Address Validators
// =============================================================================

/// Validates a phone number.
///
/// ## Rules
/// - Optional leading `+`
/// - 10 to 15 digits once spaces and hyphens are removed
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    required("phone", phone)?;

    let digits: String = phone
        .trim_start_matches('+')
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();

    if !digits.chars().all(|c| c.is_ascii_digit()) || !(10..=15).contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain 10 to 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a postal code.
///
/// ## Rules
/// - 3 to 10 characters, letters, digits, spaces or hyphens
pub fn validate_zipcode(zipcode: &str) -> ValidationResult<()> {
    let zipcode = zipcode.trim();
    required("zipcode", zipcode)?;

    let valid_chars = zipcode
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-');
    if !valid_chars || !(3..=10).contains(&zipcode.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "zipcode".to_string(),
            reason: "must be 3 to 10 letters or digits".to_string(),
        });
    }

    Ok(())
}

/// Validates the fields of an address form.
///
/// `line2` is optional and not checked.
pub fn validate_address(
    line1: &str,
    city: &str,
    state: &str,
    country: &str,
    zipcode: &str,
    phone: &str,
) -> ValidationResult<()> {
    required("line1", line1)?;
    required("city", city)?;
    required("state", state)?;
    required("country", country)?;
    validate_zipcode(zipcode)?;
    validate_phone(phone)?;
    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a category, sub-category or product name.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();
    required(field, name)?;

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a discount percentage.
pub fn validate_discount(discount: i64) -> ValidationResult<()> {
    if !(0..=100).contains(&discount) {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a free-text search query and returns it trimmed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}
