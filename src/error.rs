// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for wcagbot

use thiserror::Error;

/// Main error type for wcagbot
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Rule {rule_id} skipped {element}: {reason}")]
    RuleEvaluationSkipped {
        rule_id: String,
        element: String,
        reason: String,
    },

    #[error("Unrecognized response shape for prompt {prompt}: {found}")]
    UnrecognizedResponseShape { prompt: String, found: String },

    #[error("Judgment failed for prompt {prompt}: {message}")]
    JudgmentFailed { prompt: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_part() {
        let err = AuditError::UnrecognizedResponseShape {
            prompt: "link_clarity".into(),
            found: "string".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unrecognized response shape for prompt link_clarity: string"
        );

        let err = AuditError::RuleEvaluationSkipped {
            rule_id: "FOCUS_001".into(),
            element: "<div>".into(),
            reason: "tabindex is not numeric".into(),
        };
        assert_eq!(err.to_string(), "Rule FOCUS_001 skipped <div>: tabindex is not numeric");
    }

    #[test]
    fn test_io_conversion() {
        let err: AuditError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, AuditError::Io(_)));
    }
}
