//! Core type definitions for diagram processing
//!
//! This module contains the fundamental types shared by every diagram
//! plugin: the closed set of supported diagram kinds and the type tokens
//! used when the input does not spell one out.

use std::fmt;

use crate::core::error::ModelError;

/// Placeholder type assigned to parameters declared without a type annotation.
pub const OBJECT_TYPE: &str = "Object";

/// Default return type for methods and messages that do not declare one.
pub const VOID_TYPE: &str = "void";

/// The supported diagram dialects
///
/// This is a closed set: detection either lands on one of these variants or
/// fails, since every downstream parser assumes a known kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    /// Class diagram: `classDiagram` header
    Class,
    /// Sequence diagram: `sequenceDiagram` header
    Sequence,
    /// State diagram: `stateDiagram` / `stateDiagram-v2` header
    State,
}

impl DiagramKind {
    /// All kinds in detection order
    ///
    /// The order matters when a text contains several markers: the first
    /// kind whose marker is found wins.
    pub const ALL: [DiagramKind; 3] = [
        DiagramKind::Class,
        DiagramKind::Sequence,
        DiagramKind::State,
    ];

    /// The marker substring identifying this kind in lowercased input
    pub fn marker(&self) -> &'static str {
        match self {
            DiagramKind::Class => "classdiagram",
            DiagramKind::Sequence => "sequencediagram",
            DiagramKind::State => "statediagram",
        }
    }

    /// Detect the diagram kind from raw text
    ///
    /// Normalizes the input (trim + lowercase) and returns the first kind
    /// whose marker substring is present. This is the only hard failure in
    /// the detection stage.
    pub fn detect(input: &str) -> Result<Self, ModelError> {
        let normalized = input.trim().to_lowercase();
        for kind in Self::ALL {
            if normalized.contains(kind.marker()) {
                return Ok(kind);
            }
        }
        Err(ModelError::unrecognized_kind(input))
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramKind::Class => write!(f, "class"),
            DiagramKind::Sequence => write!(f, "sequence"),
            DiagramKind::State => write!(f, "state"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_class() {
        assert_eq!(
            DiagramKind::detect("classDiagram\n    class User").unwrap(),
            DiagramKind::Class
        );
        assert_eq!(
            DiagramKind::detect("  CLASSDIAGRAM  ").unwrap(),
            DiagramKind::Class
        );
    }

    #[test]
    fn test_detect_sequence() {
        assert_eq!(
            DiagramKind::detect("sequenceDiagram\n    A->>B: hi()").unwrap(),
            DiagramKind::Sequence
        );
    }

    #[test]
    fn test_detect_state() {
        assert_eq!(
            DiagramKind::detect("stateDiagram-v2\n    [*] --> Idle").unwrap(),
            DiagramKind::State
        );
    }

    #[test]
    fn test_detect_unknown_fails() {
        assert!(DiagramKind::detect("graph TD; A-->B").is_err());
        assert!(DiagramKind::detect("").is_err());
    }

    #[test]
    fn test_detection_order_prefers_class() {
        // A text carrying several markers resolves to the first in order.
        let input = "classDiagram\n%% see also sequenceDiagram below";
        assert_eq!(DiagramKind::detect(input).unwrap(), DiagramKind::Class);
    }

    #[test]
    fn test_display() {
        assert_eq!(DiagramKind::Class.to_string(), "class");
        assert_eq!(DiagramKind::Sequence.to_string(), "sequence");
        assert_eq!(DiagramKind::State.to_string(), "state");
    }
}
