//! Strict class diagram grammar
//!
//! Chumsky-based structural parser for class diagram syntax. This is the
//! first of the two class-parsing strategies: it demands the whole input
//! conform to the grammar and fails otherwise, at which point the tolerant
//! line scanner takes over (see [`super::parser::ClassParser`]).
//!
//! Member lines inside class bodies are captured as raw slices here;
//! their semantics are shared with the tolerant scanner so both
//! strategies agree on what a `+name: Type` line means.

use anyhow::Result;
use chumsky::prelude::*;
use chumsky::text::ident;

use super::database::RelationshipKind;

/// A class statement as parsed by the strict grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClass {
    pub name: String,
    pub stereotype: Option<String>,
    /// Raw body lines, trimmed, blank lines removed
    pub members: Vec<String>,
}

/// A relationship statement as parsed by the strict grammar
///
/// Inheritance is normalized: `source` is always the parent, regardless of
/// which arrow direction was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRelationship {
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
    pub source_multiplicity: Option<String>,
    pub target_multiplicity: Option<String>,
}

/// A top-level statement in a class diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Class(ParsedClass),
    Relationship(ParsedRelationship),
}

/// Edge operator tokens, longest first to avoid partial matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeOp {
    InheritLeft,  // <|--  (parent on the left)
    InheritRight, // --|>  (parent on the right)
    Compose,      // *--
    Aggregate,    // o--
    Associate,    // -->
}

/// Strict chumsky-based class diagram parser
pub struct StrictClassParser;

impl StrictClassParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete class diagram into statements
    pub fn parse_diagram(&self, input: &str) -> Result<Vec<Statement>> {
        let parser = Self::diagram_parser();

        parser
            .parse(input)
            .into_result()
            .map_err(|errors| anyhow::anyhow!("strict parse errors: {:?}", errors))
    }

    /// Parse a single statement (useful for targeted tests)
    pub fn parse_statement(&self, input: &str) -> Result<Statement> {
        let parser = Self::statement_parser().then_ignore(end());

        parser
            .parse(input.trim())
            .into_result()
            .map_err(|errors| anyhow::anyhow!("strict parse errors: {:?}", errors))
    }

    fn diagram_parser<'src>() -> impl Parser<'src, &'src str, Vec<Statement>> {
        // Skip the classDiagram header if present
        let header = text::keyword("classDiagram")
            .or(text::keyword("classdiagram"))
            .or_not();

        let ws_required = one_of(" \t\n\r").repeated().at_least(1).ignored();
        let ws_optional = one_of(" \t\n\r").repeated().ignored();

        ws_optional
            .clone()
            .ignore_then(header)
            .then_ignore(ws_required.clone().or_not())
            .ignore_then(
                Self::statement_parser()
                    .separated_by(ws_required)
                    .allow_trailing()
                    .collect(),
            )
            .then_ignore(ws_optional)
            .then_ignore(end())
    }

    fn statement_parser<'src>() -> impl Parser<'src, &'src str, Statement> + Clone {
        Self::class_parser()
            .map(Statement::Class)
            .or(Self::relationship_parser().map(Statement::Relationship))
    }

    fn class_parser<'src>() -> impl Parser<'src, &'src str, ParsedClass> + Clone {
        let inline_ws = one_of(" \t").repeated().ignored();

        let class_name = ident().map(|s: &str| s.to_string());

        let stereotype = just("<<")
            .ignore_then(ident())
            .then_ignore(just(">>"))
            .map(|s: &str| s.to_string());

        // Body lines are captured raw; member semantics live with the
        // tolerant scanner so both strategies share one interpretation.
        let body = just('{')
            .ignore_then(none_of("{}").repeated().to_slice())
            .then_ignore(just('}'))
            .map(|raw: &str| {
                raw.lines()
                    .map(|line| line.trim().to_string())
                    .filter(|line| !line.is_empty())
                    .collect::<Vec<_>>()
            });

        text::keyword("class")
            .then_ignore(one_of(" \t").repeated().at_least(1).ignored())
            .ignore_then(class_name)
            .then_ignore(inline_ws.clone())
            .then(stereotype.or_not())
            .then_ignore(inline_ws)
            .then(body.or_not())
            .map(|((name, stereotype), body)| ParsedClass {
                name,
                stereotype,
                members: body.unwrap_or_default(),
            })
    }

    fn relationship_parser<'src>() -> impl Parser<'src, &'src str, ParsedRelationship> + Clone {
        // Inline whitespace only: newlines separate statements and must not
        // be consumed inside a relationship line.
        let inline_ws = one_of(" \t").repeated().ignored();

        let class_name = ident().map(|s: &str| s.to_string());

        let multiplicity = just('"')
            .ignore_then(none_of("\"\n\r").repeated().to_slice())
            .then_ignore(just('"'))
            .map(|s: &str| s.trim().to_string());

        let op = just("<|--")
            .to(EdgeOp::InheritLeft)
            .or(just("--|>").to(EdgeOp::InheritRight))
            .or(just("*--").to(EdgeOp::Compose))
            .or(just("o--").to(EdgeOp::Aggregate))
            .or(just("-->").to(EdgeOp::Associate));

        // Optional trailing label, consumed to end of line
        let label = just(':')
            .ignore_then(none_of("\n\r").repeated())
            .ignored()
            .or_not();

        class_name
            .then_ignore(inline_ws.clone())
            .then(multiplicity.clone().then_ignore(inline_ws.clone()).or_not())
            .then(op)
            .then_ignore(inline_ws.clone())
            .then(multiplicity.then_ignore(inline_ws.clone()).or_not())
            .then(ident().map(|s: &str| s.to_string()))
            .then_ignore(inline_ws)
            .then_ignore(label)
            .map(|((((left, left_mult), op), right_mult), right)| match op {
                EdgeOp::InheritLeft => ParsedRelationship {
                    source: left,
                    target: right,
                    kind: RelationshipKind::Inheritance,
                    source_multiplicity: None,
                    target_multiplicity: None,
                },
                EdgeOp::InheritRight => ParsedRelationship {
                    source: right,
                    target: left,
                    kind: RelationshipKind::Inheritance,
                    source_multiplicity: None,
                    target_multiplicity: None,
                },
                EdgeOp::Compose => ParsedRelationship {
                    source: left,
                    target: right,
                    kind: RelationshipKind::Composition,
                    source_multiplicity: left_mult,
                    target_multiplicity: right_mult,
                },
                EdgeOp::Aggregate => ParsedRelationship {
                    source: left,
                    target: right,
                    kind: RelationshipKind::Aggregation,
                    source_multiplicity: left_mult,
                    target_multiplicity: right_mult,
                },
                EdgeOp::Associate => ParsedRelationship {
                    source: left,
                    target: right,
                    kind: RelationshipKind::Association,
                    source_multiplicity: left_mult,
                    target_multiplicity: right_mult,
                },
            })
    }
}

impl Default for StrictClassParser {
    fn default() -> Self {
        Self::new()
    }
}
