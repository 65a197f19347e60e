//! Draughtsman - turn loose UML diagram text into a consistent model
//!
//! A library for parsing class, sequence, and state diagrams written in a
//! lightweight arrow-based dialect, and merging them into an enriched
//! in-memory model that code emitters can consume without ambiguity.
//!
//! # Quick Start
//!
//! ```rust
//! use draughtsman::combine;
//!
//! let class_diagram = r#"classDiagram
//!     class User {
//!         +UUID id
//!         +String email
//!     }"#;
//!
//! let model = combine(class_diagram, None, None).unwrap();
//! assert_eq!(model.classes.len(), 1);
//! assert_eq!(model.classes[0].model.name, "User");
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use draughtsman::prelude::*;
//!
//! let input = "classDiagram\n    class User {\n        +UUID id\n    }";
//!
//! // Parse into a model store
//! let parser = ClassParser::new();
//! let mut diagram = Diagram::new();
//! let mut diagnostics = Diagnostics::new();
//! parser.parse(input, &mut diagram, &mut diagnostics).unwrap();
//!
//! assert_eq!(diagram.class_count(), 1);
//! assert!(diagnostics.is_empty());
//! ```

pub mod core;
pub mod enhance;
pub mod plugins;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Detector, DiagramKind, DiagramMetadata, Diagnostic, Diagnostics, GenerationStatus,
        MetadataFilter, ModelError, Parser, Severity,
    };
    pub use crate::enhance::{
        BehaviorExtractor, BusinessMethod, EnhancedClass, ModelCombiner, StateEnhancer, StateEnum,
        StateTransitionMethod,
    };
    pub use crate::plugins::class::{
        ClassDetector, ClassModel, ClassParser, Diagram, Field, Method, RelationKind,
        Relationship, RelationshipKind, Visibility,
    };
    pub use crate::plugins::orchestrator::{
        CombinedModel, Orchestrator, ParseReport, ParsedDiagram,
    };
    pub use crate::plugins::sequence::{
        MethodParameter, SequenceDetector, SequenceDiagram, SequenceMethod, SequenceParser,
    };
    pub use crate::plugins::state::{
        State, StateDetector, StateMachine, StateParser, StateTransition,
    };
}

use crate::plugins::orchestrator::{CombinedModel, Orchestrator, ParseReport};

/// Detect the diagram kind of a text
///
/// # Example
/// ```rust
/// use draughtsman::{detect, DiagramKind};
///
/// assert_eq!(detect("classDiagram\nclass A").unwrap(), DiagramKind::Class);
/// assert!(detect("graph TD; A-->B").is_err());
/// ```
pub fn detect(input: &str) -> Result<DiagramKind, ModelError> {
    DiagramKind::detect(input)
}

/// Detect and parse one diagram text
///
/// This is the simplest way to get a model out of a single diagram.
///
/// # Example
/// ```rust
/// use draughtsman::parse;
/// use draughtsman::plugins::orchestrator::ParsedDiagram;
///
/// let report = parse("classDiagram\nclass User {\n    +UUID id\n}").unwrap();
/// match report.diagram {
///     ParsedDiagram::Class(diagram) => assert_eq!(diagram.class_count(), 1),
///     _ => unreachable!(),
/// }
/// ```
pub fn parse(input: &str) -> anyhow::Result<ParseReport> {
    Orchestrator::with_default_plugins().process(input)
}

/// Parse up to three diagram sources and combine them into the enriched
/// model
///
/// The class diagram is required; sequence and state inputs are optional.
///
/// # Example
/// ```rust
/// use draughtsman::combine;
///
/// let model = combine(
///     "classDiagram\nclass Order {\n    +String status\n}",
///     Some("sequenceDiagram\nUser->>OrderService: createOrder(total: Long)"),
///     Some("stateDiagram-v2\n[*] --> NEW\nNEW --> PAID : pay"),
/// )
/// .unwrap();
///
/// let order = &model.classes[0];
/// assert!(order.stateful);
/// assert_eq!(order.behavior_methods[0].return_type, "Order");
/// ```
pub fn combine(
    class_input: &str,
    sequence_input: Option<&str>,
    state_input: Option<&str>,
) -> anyhow::Result<CombinedModel> {
    Orchestrator::with_default_plugins().combine_sources(class_input, sequence_input, state_input)
}
