// src/error.rs
use thiserror::Error;

/// Errors raised by a viewer instance.
///
/// Only `Configuration` ever reaches the caller of the constructor. `Load` and
/// `Clipboard` are caught inside the viewer, logged, and turned into degraded
/// behavior (empty viewport, prompt fallback).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    #[error("invalid {field} \"{value}\": expected {expected}")]
    Configuration {
        field: &'static str,
        value: String,
        expected: String,
    },
    #[error("failed to load SVG: {0}")]
    Load(String),
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

impl ViewerError {
    /// A value outside a closed set of allowed strings.
    pub fn invalid_choice(field: &'static str, value: impl Into<String>, allowed: &[&str]) -> Self {
        ViewerError::Configuration {
            field,
            value: value.into(),
            expected: format!("one of {}", allowed.join(", ")),
        }
    }

    pub fn invalid_value(
        field: &'static str,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        ViewerError::Configuration {
            field,
            value: value.into(),
            expected: expected.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_choice_names_field_and_values() {
        let err = ViewerError::invalid_choice("panMode", "fly", &["drag", "scroll"]);
        let msg = err.to_string();
        assert!(msg.contains("panMode"));
        assert!(msg.contains("\"fly\""));
        assert!(msg.ends_with("one of drag, scroll"));
    }

    #[test]
    fn test_load_message() {
        let err = ViewerError::Load("HTTP 404".to_string());
        assert_eq!(err.to_string(), "failed to load SVG: HTTP 404");
    }
}
