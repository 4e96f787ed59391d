//! # Validation
//!
//! Checks applied to configuration values before they reach SQL.
//!
//! Table names cannot be bound as query parameters, so they are spliced into
//! statements as quoted identifiers. Only plain identifiers are accepted.

use crate::error::ValidationError;

/// Longest identifier PostgreSQL keeps without truncation.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Result type for validation functions.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a table name.
///
/// ## Rules
/// - Cannot be empty
/// - At most 63 characters
/// - Starts with a letter or underscore
/// - Only ASCII letters, digits and underscores
///
/// ## Example
/// ```rust
/// use rollup_core::validation::validate_table_name;
///
/// assert!(validate_table_name("vendor_cleaned").is_ok());
/// assert!(validate_table_name("vendor\"; DROP TABLE sales; --").is_err());
/// ```
pub fn validate_table_name(name: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "table name".to_string(),
        });
    }

    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: format!("table name '{}'", name),
            max: MAX_IDENTIFIER_LEN,
        });
    }

    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !starts_ok {
        return Err(ValidationError::InvalidFormat {
            field: format!("table name '{}'", name),
            reason: "must start with a letter or underscore".to_string(),
        });
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: format!("table name '{}'", name),
            reason: "only letters, digits and underscores are allowed".to_string(),
        });
    }

    Ok(())
}

/// Validates that no table name appears twice.
///
/// Reading from and writing to the same table would make the replace step
/// destroy its own input.
pub fn validate_distinct_tables(names: &[&str]) -> ValidationResult<()> {
    for (i, name) in names.iter().enumerate() {
        if names[i + 1..].contains(name) {
            return Err(ValidationError::Duplicate {
                field: "table name".to_string(),
                value: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Quotes a validated identifier for splicing into SQL.
///
/// Both PostgreSQL and SQLite accept double-quoted identifiers, and quoting
/// keeps the source's case-sensitive column names intact.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("vendor_cleaned").is_ok());
        assert!(validate_table_name("_staging").is_ok());
        assert!(validate_table_name("sales2024").is_ok());

        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("2024_sales").is_err());
        assert!(validate_table_name("vendor cleaned").is_err());
        assert!(validate_table_name("vendor\"cleaned").is_err());
        assert!(validate_table_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_validate_distinct_tables() {
        assert!(validate_distinct_tables(&["purchases", "sales", "vendor_cleaned"]).is_ok());
        assert!(validate_distinct_tables(&["purchases", "sales", "purchases"]).is_err());
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("VendorNumber"), "\"VendorNumber\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
