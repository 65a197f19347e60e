//! Edge case integration tests
//!
//! Inputs on the ragged edge of the dialects: fallback escalation,
//! malformed lines, metadata interleaving, forward references.

use draughtsman::parse;
use draughtsman::prelude::*;

fn parse_class(input: &str) -> (Diagram, Diagnostics) {
    let parser = ClassParser::new();
    let mut diagram = Diagram::new();
    let mut diagnostics = Diagnostics::new();
    parser.parse(input, &mut diagram, &mut diagnostics).unwrap();
    (diagram, diagnostics)
}

#[test]
fn test_strict_failure_escalates_to_whole_diagram_rescan() {
    // The stray token breaks the strict grammar; the tolerant scanner
    // must still recover every well-formed statement.
    let input = r#"classDiagram
    class User {
        +UUID id
    }
    ???
    class Order {
        +UUID id
    }
    User "1" --> "*" Order"#;

    let (diagram, diagnostics) = parse_class(input);
    assert_eq!(diagram.class_count(), 2);
    assert_eq!(diagram.relationship_count(), 1);
    assert!(diagnostics
        .iter()
        .any(|d| d.severity == Severity::Info && d.message.contains("tolerant")));
}

#[test]
fn test_one_malformed_attribute_does_not_block_the_rest() {
    let input = r#"classDiagram
    class User {
        +UUID id
        !!!bad line!!!
        +String email
    }"#;

    let (diagram, diagnostics) = parse_class(input);
    let user = diagram.get_class("User").unwrap();
    assert_eq!(user.fields.len(), 2);
    assert_eq!(user.fields[0].name, "id");
    assert_eq!(user.fields[1].name, "email");
    assert!(diagnostics.has_warnings());
}

#[test]
fn test_relationship_to_undeclared_class_stays_unresolved() {
    let input = "classDiagram\nclass User {\n}\nGhost <|-- User";
    let (diagram, _) = parse_class(input);
    // Best-effort: the relationship is kept, the superclass resolves to
    // the referenced name, and no phantom class is created.
    assert_eq!(diagram.class_count(), 1);
    assert_eq!(diagram.relationship_count(), 1);
    assert_eq!(
        diagram.get_class("User").unwrap().super_class.as_deref(),
        Some("Ghost")
    );
}

#[test]
fn test_metadata_sections_interleaved_with_content() {
    let input = r#"%% package: com.example
classDiagram
%% @section persistence
%% table: users
%% strategy: uuid
%% @end-section
    class User {
        +UUID id
    }
%% trailing comment
    class Order {
    }"#;

    let (diagram, diagnostics) = parse_class(input);
    assert_eq!(diagram.class_count(), 2);
    assert!(diagnostics.is_empty());

    let metadata = DiagramMetadata::scan(input);
    assert_eq!(metadata.get("package"), Some("com.example"));
    assert_eq!(metadata.get("table"), Some("users"));
}

#[test]
fn test_empty_class_bodies() {
    let (diagram, _) = parse_class("classDiagram\nclass A {\n}\nclass B {\n}");
    assert_eq!(diagram.class_count(), 2);
    assert!(diagram.get_class("A").unwrap().fields.is_empty());
}

#[test]
fn test_class_without_braces() {
    let (diagram, _) = parse_class("classDiagram\nclass Standalone");
    assert_eq!(diagram.class_count(), 1);
}

#[test]
fn test_duplicate_class_declarations_keep_one_model() {
    let (diagram, _) = parse_class("classDiagram\nclass User {\n    +UUID id\n}\nclass User {\n    +String email\n}");
    // Names stay unique; the first declaration owns the model and later
    // bodies merge into it.
    assert_eq!(diagram.class_count(), 1);
    assert_eq!(diagram.get_class("User").unwrap().fields.len(), 2);
}

#[test]
fn test_sequence_with_only_noise_produces_empty_model() {
    let report = parse("sequenceDiagram\n    participant A\n    participant B").unwrap();
    let ParsedDiagram::Sequence(diagram) = report.diagram else {
        panic!("Expected sequence diagram");
    };
    assert!(diagram.is_empty());
}

#[test]
fn test_state_fallback_flagged_not_silent() {
    let report = parse("stateDiagram-v2\n    %% nothing but comments").unwrap();
    let ParsedDiagram::State(machine) = report.diagram else {
        panic!("Expected state machine");
    };
    assert!(machine.fallback_injected());
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message.contains("substituted")));
}

#[test]
fn test_state_with_content_never_gets_fallback() {
    let report = parse("stateDiagram-v2\n    A --> B : go").unwrap();
    let ParsedDiagram::State(machine) = report.diagram else {
        panic!("Expected state machine");
    };
    assert!(!machine.fallback_injected());
    assert_eq!(machine.transition_count(), 1);
}

#[test]
fn test_crlf_line_endings() {
    let input = "classDiagram\r\nclass User {\r\n    +UUID id\r\n}\r\n";
    let (diagram, _) = parse_class(input);
    assert_eq!(diagram.class_count(), 1);
    assert_eq!(diagram.get_class("User").unwrap().fields.len(), 1);
}

#[test]
fn test_parsers_share_nothing_between_calls() {
    // A body left open in one parse must not leak into the next.
    let parser = ClassParser::new();

    let mut first = Diagram::new();
    let mut first_diags = Diagnostics::new();
    parser
        .parse("classDiagram\nclass Open {\n    +UUID id", &mut first, &mut first_diags)
        .unwrap();

    let mut second = Diagram::new();
    let mut second_diags = Diagnostics::new();
    parser
        .parse("classDiagram\nclass Fresh {\n}", &mut second, &mut second_diags)
        .unwrap();

    assert!(second.get_class("Open").is_none());
    assert_eq!(second.class_count(), 1);
}
