//! Core error types for diagram processing
//!
//! This module defines the hard-failure error type used throughout the
//! model-building pipeline. Recoverable problems never surface here; they
//! are accumulated as [`crate::core::Diagnostic`] records instead.

use thiserror::Error;

/// Hard failures in the model-building pipeline
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Parse error: {message} at line {line}, column {column}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Detection error: {message}")]
    DetectionError { message: String },

    #[error("Unrecognized diagram kind: no marker found in {snippet:?}")]
    UnrecognizedDiagramKind { snippet: String },

    #[error("Combine error: {message}")]
    CombineError { message: String },
}

impl ModelError {
    /// Create a new parse error
    pub fn parse_error(message: String, line: usize, column: usize) -> Self {
        Self::ParseError {
            message,
            line,
            column,
        }
    }

    /// Create a new detection error
    pub fn detection_error(message: String) -> Self {
        Self::DetectionError { message }
    }

    /// Create an unrecognized-kind error, keeping a short input snippet
    /// so logs show what was handed to the detector.
    pub fn unrecognized_kind(input: &str) -> Self {
        let snippet: String = input.trim().chars().take(40).collect();
        Self::UnrecognizedDiagramKind { snippet }
    }

    /// Create a new combine error
    pub fn combine_error(message: String) -> Self {
        Self::CombineError { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let error = ModelError::parse_error("Invalid member".to_string(), 5, 10);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Parse error"));
        assert!(error_msg.contains("Invalid member"));
        assert!(error_msg.contains("line 5"));
        assert!(error_msg.contains("column 10"));
    }

    #[test]
    fn test_detection_error() {
        let error = ModelError::detection_error("Detection failed".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Detection error"));
        assert!(error_msg.contains("Detection failed"));
    }

    #[test]
    fn test_unrecognized_kind_truncates_snippet() {
        let long_input = "x".repeat(200);
        let error = ModelError::unrecognized_kind(&long_input);
        match error {
            ModelError::UnrecognizedDiagramKind { snippet } => {
                assert_eq!(snippet.len(), 40);
            }
            _ => panic!("Expected UnrecognizedDiagramKind"),
        }
    }

    #[test]
    fn test_combine_error() {
        let error = ModelError::combine_error("Class diagram is required".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Combine error"));
        assert!(error_msg.contains("Class diagram is required"));
    }
}
