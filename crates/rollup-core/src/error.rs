//! # Error Types
//!
//! Domain-specific error types for rollup-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rollup-core errors (this file)                                        │
//! │  ├── CoreError        - Transform failures                             │
//! │  └── ValidationError  - Identifier / input validation failures         │
//! │                                                                         │
//! │  rollup-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  vendor-rollup errors (job binary)                                     │
//! │  └── RollupError      - Which stage of the run failed                  │
//! │                                                                         │
//! │  Flow: CoreError       → RollupError::Transform → process exit         │
//! │        ValidationError → RollupError::Config    → process exit         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Transform errors.
///
/// Raised while turning the extracted snapshot into summary rows. Every
/// variant is fatal for the run.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A price reference carried a Volume that is not a number.
    ///
    /// ## When This Occurs
    /// - `purchase_prices."Volume"` holds text such as `"750ml"` or `"N/A"`
    /// - The column was loaded from a CSV with mixed content
    #[error("Non-numeric Volume '{value}' for vendor {vendor_number}, brand {brand}")]
    InvalidVolume {
        vendor_number: i64,
        brand: String,
        value: String,
    },

    /// An aggregate came out as NaN or infinity.
    ///
    /// Sums of finite source values stay finite; this only fires when the
    /// store hands back non-finite floats.
    #[error("Non-finite {field} for vendor {vendor_number}, brand {brand}")]
    NonFiniteAggregate {
        field: &'static str,
        vendor_number: i64,
        brand: String,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. a table name with a quote in it).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two settings that must differ are equal.
    #[error("{field} '{value}' is used more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidVolume {
            vendor_number: 2,
            brand: "58".to_string(),
            value: "750ml".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Non-numeric Volume '750ml' for vendor 2, brand 58"
        );
    }

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::Duplicate {
            field: "table name".to_string(),
            value: "sales".to_string(),
        };
        assert_eq!(err.to_string(), "table name 'sales' is used more than once");
    }
}
