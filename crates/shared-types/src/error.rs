//! Error taxonomy for the review engine.
//!
//! All failures surface at two boundaries only: catalog construction
//! (invalid or uncompilable rules) and input validation. There is no
//! partial-success state; a scan either runs against a fully valid
//! catalog or does not run.

/// Errors the review engine can return.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Input text failed validation (e.g. exceeds the configured maximum
    /// length). No partial result is produced.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A pattern rule failed validation at catalog build time. The whole
    /// catalog build fails; the engine never starts with a partially valid
    /// rule set.
    #[error("invalid rule '{rule_id}': {reason}")]
    InvalidRule { rule_id: String, reason: String },

    /// A rule's regex pattern failed to compile, surfaced at catalog build
    /// time.
    #[error("rule '{rule_id}' has an uncompilable pattern: {reason}")]
    RegexCompilation { rule_id: String, reason: String },
}

impl ReviewError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        ReviewError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn invalid_rule(rule_id: impl Into<String>, reason: impl Into<String>) -> Self {
        ReviewError::InvalidRule {
            rule_id: rule_id.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_rule() {
        let err = ReviewError::invalid_rule("exagg-best", "matcher must not be empty");
        assert_eq!(
            err.to_string(),
            "invalid rule 'exagg-best': matcher must not be empty"
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err = ReviewError::invalid_input("text exceeds 100000 characters");
        assert!(err.to_string().starts_with("invalid input:"));
    }
}
