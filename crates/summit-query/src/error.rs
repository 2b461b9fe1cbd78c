//! Filter validation errors.

/// Errors produced while turning filter triples into a query plan.
///
/// Any error aborts the whole request; filters are never partially
/// applied.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Unknown field token, unknown operator token, or a value that
    /// cannot be coerced to the field's type.
    #[error("Invalid filter: {message}")]
    InvalidFilter {
        /// Description of the offending filter.
        message: String,
    },

    /// Inequality operators were applied to more than one distinct field.
    #[error("Unsupported filter combination: inequality on both '{first}' and '{second}'")]
    UnsupportedCombination {
        /// Field already carrying an inequality.
        first: String,
        /// Second field attempting an inequality.
        second: String,
    },
}

impl QueryError {
    /// Creates a new `InvalidFilter` error.
    #[must_use]
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            message: message.into(),
        }
    }

    /// Creates a new `UnsupportedCombination` error.
    #[must_use]
    pub fn unsupported_combination(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::UnsupportedCombination {
            first: first.into(),
            second: second.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::invalid_filter("unknown field 'bogus'");
        assert_eq!(err.to_string(), "Invalid filter: unknown field 'bogus'");

        let err = QueryError::unsupported_combination("city", "month");
        assert_eq!(
            err.to_string(),
            "Unsupported filter combination: inequality on both 'city' and 'month'"
        );
    }
}
