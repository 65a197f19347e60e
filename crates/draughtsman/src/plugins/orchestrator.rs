//! Plugin orchestrator for the model-building pipeline
//!
//! The orchestrator wires detection, parsing, and combination together:
//! Detector → kind-specific parser → enrichment → combined model.
//!
//! Parsers are handed out by factory functions so every invocation gets a
//! fresh instance; concurrent callers parsing unrelated diagrams never
//! share state.

use std::collections::HashMap;

use anyhow::Result;
use tracing::{debug, info, span, trace, warn, Level};

use crate::core::{
    DiagramKind, DiagramMetadata, Diagnostics, Detector, GenerationStatus, ModelError, Parser,
};
use crate::enhance::{EnhancedClass, ModelCombiner};
use crate::plugins::class::{ClassDetector, ClassParser, Diagram};
use crate::plugins::sequence::{SequenceDetector, SequenceDiagram, SequenceParser};
use crate::plugins::state::{StateDetector, StateMachine, StateParser};

/// Output of one kind-dispatched parse: a closed tagged union over the
/// three model types.
#[derive(Debug, Clone)]
pub enum ParsedDiagram {
    Class(Diagram),
    Sequence(SequenceDiagram),
    State(StateMachine),
}

impl ParsedDiagram {
    pub fn kind(&self) -> DiagramKind {
        match self {
            ParsedDiagram::Class(_) => DiagramKind::Class,
            ParsedDiagram::Sequence(_) => DiagramKind::Sequence,
            ParsedDiagram::State(_) => DiagramKind::State,
        }
    }
}

/// Result of processing one diagram text
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub kind: DiagramKind,
    pub diagram: ParsedDiagram,
    pub metadata: DiagramMetadata,
    pub diagnostics: Diagnostics,
}

/// The combined, enriched model of up to three diagram sources
#[derive(Debug, Clone)]
pub struct CombinedModel {
    pub classes: Vec<EnhancedClass>,
    pub status: GenerationStatus,
    pub diagnostics: Diagnostics,
    pub metadata: DiagramMetadata,
}

/// Parser factory: constructs a fresh parser per call and runs it.
type ParseFn = fn(&str, &mut Diagnostics) -> Result<ParsedDiagram>;

fn parse_class_diagram(input: &str, diagnostics: &mut Diagnostics) -> Result<ParsedDiagram> {
    let parser = ClassParser::new();
    let mut diagram = Diagram::new();
    parser.parse(input, &mut diagram, diagnostics)?;
    Ok(ParsedDiagram::Class(diagram))
}

fn parse_sequence_diagram(input: &str, diagnostics: &mut Diagnostics) -> Result<ParsedDiagram> {
    let parser = SequenceParser::new();
    let mut diagram = SequenceDiagram::new();
    parser.parse(input, &mut diagram, diagnostics)?;
    Ok(ParsedDiagram::Sequence(diagram))
}

fn parse_state_diagram(input: &str, diagnostics: &mut Diagnostics) -> Result<ParsedDiagram> {
    let parser = StateParser::new();
    let mut machine = StateMachine::new();
    parser.parse(input, &mut machine, diagnostics)?;
    Ok(ParsedDiagram::State(machine))
}

/// Plugin orchestrator coordinating the full pipeline
pub struct Orchestrator {
    detectors: HashMap<DiagramKind, Box<dyn Detector>>,
    factories: HashMap<DiagramKind, ParseFn>,
}

impl Orchestrator {
    /// Create a new empty orchestrator
    pub fn new() -> Self {
        Self {
            detectors: HashMap::new(),
            factories: HashMap::new(),
        }
    }

    /// Create an orchestrator with all three diagram plugins registered
    pub fn with_default_plugins() -> Self {
        let mut orchestrator = Self::new();
        orchestrator.register_detector(DiagramKind::Class, Box::new(ClassDetector::new()));
        orchestrator.register_detector(DiagramKind::Sequence, Box::new(SequenceDetector::new()));
        orchestrator.register_detector(DiagramKind::State, Box::new(StateDetector::new()));
        orchestrator
            .factories
            .insert(DiagramKind::Class, parse_class_diagram as ParseFn);
        orchestrator
            .factories
            .insert(DiagramKind::Sequence, parse_sequence_diagram as ParseFn);
        orchestrator
            .factories
            .insert(DiagramKind::State, parse_state_diagram as ParseFn);
        orchestrator
    }

    /// Register a detector plugin
    pub fn register_detector(&mut self, kind: DiagramKind, detector: Box<dyn Detector>) {
        self.detectors.insert(kind, detector);
    }

    /// Registered diagram kinds
    pub fn kinds(&self) -> Vec<DiagramKind> {
        self.factories.keys().copied().collect()
    }

    /// Detect the diagram kind of an input text
    pub fn detect_kind(&self, input: &str) -> Result<DiagramKind, ModelError> {
        let detect_span = span!(Level::INFO, "detect_diagram_kind", input_len = input.len());
        let _enter = detect_span.enter();

        for (kind, detector) in &self.detectors {
            trace!(
                kind = %kind,
                confidence = detector.confidence(input),
                "Checking detector"
            );
        }

        let kind = DiagramKind::detect(input)?;
        info!(kind = %kind, "Detected diagram kind");
        Ok(kind)
    }

    /// Process one diagram text through detection and parsing
    pub fn process(&self, input: &str) -> Result<ParseReport> {
        let process_span = span!(Level::INFO, "process_diagram", input_len = input.len());
        let _enter = process_span.enter();

        let kind = self.detect_kind(input)?;
        self.process_as(kind, input)
    }

    /// Parse input as a known kind, skipping detection
    pub fn process_as(&self, kind: DiagramKind, input: &str) -> Result<ParseReport> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| anyhow::anyhow!("no parser registered for {kind} diagrams"))?;

        let mut diagnostics = Diagnostics::new();
        let diagram = factory(input, &mut diagnostics)?;
        let metadata = DiagramMetadata::scan(input);

        debug!(
            kind = %kind,
            diagnostic_count = diagnostics.len(),
            "Diagram processed"
        );

        Ok(ParseReport {
            kind,
            diagram,
            metadata,
            diagnostics,
        })
    }

    /// Parse up to three diagram sources and combine them into the
    /// enriched model.
    ///
    /// The class diagram is required; sequence and state inputs are
    /// optional. Inputs are parsed independently and merged in one pass.
    pub fn combine_sources(
        &self,
        class_input: &str,
        sequence_input: Option<&str>,
        state_input: Option<&str>,
    ) -> Result<CombinedModel> {
        let combine_span = span!(Level::INFO, "combine_sources");
        let _enter = combine_span.enter();

        let mut diagnostics = Diagnostics::new();
        let mut metadata = DiagramMetadata::scan(class_input);

        if class_input.trim().is_empty() {
            warn!("No class diagram supplied");
            return Err(ModelError::combine_error(
                "class diagram is required for model combination".to_string(),
            )
            .into());
        }

        let class_diagram = {
            let mut class_diagnostics = Diagnostics::new();
            let ParsedDiagram::Class(diagram) =
                parse_class_diagram(class_input, &mut class_diagnostics)?
            else {
                unreachable!("class factory returns class diagrams");
            };
            diagnostics.absorb(class_diagnostics);
            diagram
        };

        let sequence_diagram = match sequence_input.filter(|s| !s.trim().is_empty()) {
            Some(input) => {
                let mut sequence_diagnostics = Diagnostics::new();
                let ParsedDiagram::Sequence(diagram) =
                    parse_sequence_diagram(input, &mut sequence_diagnostics)?
                else {
                    unreachable!("sequence factory returns sequence diagrams");
                };
                diagnostics.absorb(sequence_diagnostics);
                for (key, value) in DiagramMetadata::scan(input).iter() {
                    metadata.insert(key, value);
                }
                Some(diagram)
            }
            None => None,
        };

        let state_machine = match state_input.filter(|s| !s.trim().is_empty()) {
            Some(input) => {
                let mut state_diagnostics = Diagnostics::new();
                let ParsedDiagram::State(machine) =
                    parse_state_diagram(input, &mut state_diagnostics)?
                else {
                    unreachable!("state factory returns state machines");
                };
                diagnostics.absorb(state_diagnostics);
                for (key, value) in DiagramMetadata::scan(input).iter() {
                    metadata.insert(key, value);
                }
                Some(machine)
            }
            None => None,
        };

        let classes = ModelCombiner::new().combine(
            Some(&class_diagram),
            sequence_diagram.as_ref(),
            state_machine.as_ref(),
        )?;

        let status = GenerationStatus::evaluate(true, &diagnostics);
        info!(
            class_count = classes.len(),
            status = %status,
            "Model combination completed"
        );

        Ok(CombinedModel {
            classes,
            status,
            diagnostics,
            metadata,
        })
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_orchestrator() {
        let orchestrator = Orchestrator::new();
        assert!(orchestrator.kinds().is_empty());
        assert!(orchestrator.process("classDiagram\nclass A").is_err());
    }

    #[test]
    fn test_detect_kind() {
        let orchestrator = Orchestrator::with_default_plugins();
        assert_eq!(
            orchestrator.detect_kind("classDiagram\nclass A").unwrap(),
            DiagramKind::Class
        );
        assert_eq!(
            orchestrator
                .detect_kind("sequenceDiagram\nA->>B: x()")
                .unwrap(),
            DiagramKind::Sequence
        );
        assert_eq!(
            orchestrator
                .detect_kind("stateDiagram-v2\n[*] --> A")
                .unwrap(),
            DiagramKind::State
        );
    }

    #[test]
    fn test_detect_unknown_kind_fails() {
        let orchestrator = Orchestrator::with_default_plugins();
        assert!(orchestrator.detect_kind("graph TD; A-->B").is_err());
    }

    #[test]
    fn test_process_class_diagram() {
        let orchestrator = Orchestrator::with_default_plugins();
        let report = orchestrator
            .process("classDiagram\nclass User {\n    +UUID id\n}")
            .unwrap();
        assert_eq!(report.kind, DiagramKind::Class);
        match report.diagram {
            ParsedDiagram::Class(diagram) => assert_eq!(diagram.class_count(), 1),
            _ => panic!("Expected class diagram"),
        }
    }

    #[test]
    fn test_process_collects_metadata() {
        let orchestrator = Orchestrator::with_default_plugins();
        let report = orchestrator
            .process("%% package: com.example\nclassDiagram\nclass User {\n}")
            .unwrap();
        assert_eq!(report.metadata.get("package"), Some("com.example"));
    }

    #[test]
    fn test_combine_sources_full() {
        let orchestrator = Orchestrator::with_default_plugins();
        let model = orchestrator
            .combine_sources(
                "classDiagram\nclass Order {\n    +UUID id\n    +String status\n}",
                Some("sequenceDiagram\nUser->>OrderService: createOrder(total: BigDecimal)"),
                Some("stateDiagram-v2\n[*] --> NEW\nNEW --> PAID : pay"),
            )
            .unwrap();

        assert_eq!(model.classes.len(), 1);
        let order = &model.classes[0];
        assert_eq!(order.behavior_methods.len(), 1);
        assert_eq!(order.behavior_methods[0].return_type, "Order");
        assert!(order.stateful);
        assert_eq!(model.status, GenerationStatus::Success);
    }

    #[test]
    fn test_combine_sources_requires_class_diagram() {
        let orchestrator = Orchestrator::with_default_plugins();
        assert!(orchestrator.combine_sources("", None, None).is_err());
        assert!(orchestrator.combine_sources("   \n  ", None, None).is_err());
    }

    #[test]
    fn test_combine_sources_status_reflects_warnings() {
        let orchestrator = Orchestrator::with_default_plugins();
        let model = orchestrator
            .combine_sources(
                "classDiagram\nclass User {\n    +UUID id\n    +++\n}",
                None,
                None,
            )
            .unwrap();
        assert_eq!(model.status, GenerationStatus::Warnings);
    }
}
