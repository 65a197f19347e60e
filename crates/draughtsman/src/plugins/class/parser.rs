//! Class diagram parser
//!
//! Dual-strategy parsing: a strict structural grammar is attempted first;
//! if it rejects the input for any reason the entire diagram is re-parsed
//! by a tolerant line scanner. Escalation is diagram-level: the two
//! strategies are never mixed within one parse, so every model element has
//! a single provenance.

use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, span, trace, warn, Level};

use super::database::{
    Diagram, Field, Method, Parameter, Relationship, RelationshipKind, Visibility,
};
use super::strict::{Statement, StrictClassParser};
use crate::core::{Diagnostics, MetadataFilter, Parser, OBJECT_TYPE, VOID_TYPE};

static CLASS_HEADER_RE: OnceLock<Regex> = OnceLock::new();
static INHERIT_LEFT_RE: OnceLock<Regex> = OnceLock::new();
static INHERIT_RIGHT_RE: OnceLock<Regex> = OnceLock::new();
static EDGE_RE: OnceLock<Regex> = OnceLock::new();

fn class_header_re() -> &'static Regex {
    CLASS_HEADER_RE.get_or_init(|| {
        Regex::new(r#"^class\s+(\w+)(?:\s*<<(\w+)>>)?\s*(\{)?"#)
            .expect("class header regex must compile")
    })
}

fn inherit_left_re() -> &'static Regex {
    INHERIT_LEFT_RE.get_or_init(|| {
        Regex::new(r"(\w+)\s*<\|--\s*(\w+)").expect("inheritance regex must compile")
    })
}

fn inherit_right_re() -> &'static Regex {
    INHERIT_RIGHT_RE.get_or_init(|| {
        Regex::new(r"(\w+)\s*--\|>\s*(\w+)").expect("inheritance regex must compile")
    })
}

fn edge_re() -> &'static Regex {
    EDGE_RE.get_or_init(|| {
        Regex::new(r#"^(\w+)\s*(?:"([^"]+)"\s*)?(\*--|o--|-->)\s*(?:"([^"]+)"\s*)?(\w+)"#)
            .expect("edge regex must compile")
    })
}

/// A parsed class body line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberLine {
    Attribute(Field),
    Method(Method),
}

/// Split a body line into member segments.
///
/// Compact bodies may carry several members on one line
/// (`+UUID id  +String email`); a new segment starts at every visibility
/// symbol that follows whitespace outside parentheses.
pub fn split_member_segments(line: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut prev_is_space = true;

    for c in line.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth == 0
            && prev_is_space
            && Visibility::from_symbol(c).is_some()
            && !current.trim().is_empty()
        {
            segments.push(current.trim().to_string());
            current.clear();
        }
        current.push(c);
        prev_is_space = c.is_whitespace();
    }
    if !current.trim().is_empty() {
        segments.push(current.trim().to_string());
    }
    segments
}

/// Parse one member line from a class body.
///
/// The line must start with a visibility symbol. Lines with parentheses
/// are methods (`name(params) returnType`, empty return defaults to void,
/// untyped parameters get the Object placeholder); all other lines are
/// attributes in either `Type name` or `name: Type` order, disambiguated
/// by the presence of `:`.
pub fn parse_member_line(line: &str) -> Option<MemberLine> {
    let mut chars = line.chars();
    let visibility = Visibility::from_symbol(chars.next()?)?;
    let rest = chars.as_str().trim();
    if rest.is_empty() {
        return None;
    }

    if let Some(open) = rest.find('(') {
        let name = rest[..open].trim();
        if name.is_empty() {
            return None;
        }
        let close = rest.rfind(')')?;
        if close < open {
            return None;
        }

        let parameters = rest[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| match p.split_once(':') {
                Some((n, t)) => Parameter::new(n.trim(), t.trim()),
                None => Parameter::new(p, OBJECT_TYPE),
            })
            .collect();

        let after = rest[close + 1..].trim();
        let after = after.strip_prefix(':').map(str::trim).unwrap_or(after);
        let return_type = if after.is_empty() { VOID_TYPE } else { after };

        Some(MemberLine::Method(
            Method::new(name)
                .with_visibility(visibility)
                .with_return_type(return_type)
                .with_parameters(parameters),
        ))
    } else if let Some((name, field_type)) = rest.split_once(':') {
        let (name, field_type) = (name.trim(), field_type.trim());
        if name.is_empty() || field_type.is_empty() {
            return None;
        }
        Some(MemberLine::Attribute(
            Field::new(name, field_type).with_visibility(visibility),
        ))
    } else {
        // `Type name`: the name is the last whitespace-separated token so
        // generic types containing spaces stay intact.
        let mut parts = rest.rsplitn(2, char::is_whitespace);
        let name = parts.next()?.trim();
        let field_type = parts.next()?.trim();
        if name.is_empty() || field_type.is_empty() {
            return None;
        }
        Some(MemberLine::Attribute(
            Field::new(name, field_type).with_visibility(visibility),
        ))
    }
}

/// Dual-strategy class diagram parser
pub struct ClassParser;

impl ClassParser {
    pub fn new() -> Self {
        Self
    }

    /// Run the strict strategy, producing a complete diagram or an error.
    ///
    /// The diagram is built into a scratch value so a mid-way failure
    /// leaves nothing behind.
    fn strict_pass(input: &str) -> Result<Diagram, String> {
        let statements = StrictClassParser::new()
            .parse_diagram(input)
            .map_err(|e| e.to_string())?;

        let mut diagram = Diagram::new();
        for statement in statements {
            match statement {
                Statement::Class(parsed) => {
                    let class = diagram.get_or_create_class(&parsed.name);
                    if let Some(stereotype) = &parsed.stereotype {
                        class.apply_stereotype(stereotype);
                    }
                    for line in &parsed.members {
                        for segment in split_member_segments(line) {
                            match parse_member_line(&segment) {
                                Some(MemberLine::Attribute(field)) => class.add_field(field),
                                Some(MemberLine::Method(method)) => class.add_method(method),
                                None => return Err(format!("unparseable member line: {segment}")),
                            }
                        }
                    }
                }
                Statement::Relationship(parsed) => {
                    let mut relationship =
                        Relationship::new(parsed.source, parsed.target, parsed.kind);
                    relationship.source_multiplicity = parsed.source_multiplicity;
                    relationship.target_multiplicity = parsed.target_multiplicity;
                    diagram.add_relationship(relationship);
                }
            }
        }
        Ok(diagram)
    }

    /// Tolerant line scanner: the fallback strategy.
    ///
    /// Never fails; malformed lines are skipped with a warning diagnostic
    /// and parsing of the remaining body continues.
    fn scan_lines(&self, input: &str, database: &mut Diagram, diagnostics: &mut Diagnostics) {
        let mut current: Option<String> = None;
        let mut in_body = false;

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line.to_lowercase().starts_with("classdiagram") {
                continue;
            }

            if line.starts_with("class ") {
                match class_header_re().captures(line) {
                    Some(caps) => {
                        let name = caps[1].to_string();
                        let class = database.get_or_create_class(&name);
                        if let Some(stereotype) = caps.get(2) {
                            class.apply_stereotype(stereotype.as_str());
                        }
                        in_body = false;
                        current = None;
                        if caps.get(3).is_some() {
                            // A closing brace on the same line makes the
                            // body inline; otherwise scanning mode opens.
                            let open = line.find('{').expect("brace was matched");
                            let after = &line[open + 1..];
                            if let Some(close) = after.rfind('}') {
                                self.scan_body_segments(
                                    &after[..close],
                                    &name,
                                    line_no,
                                    database,
                                    diagnostics,
                                );
                            } else {
                                in_body = true;
                                current = Some(name);
                            }
                        }
                    }
                    None => {
                        diagnostics.warning(
                            format!("skipping unparseable class declaration: {line}"),
                            line_no,
                            1,
                        );
                    }
                }
                continue;
            }

            if line == "}" {
                in_body = false;
                current = None;
                continue;
            }

            if in_body {
                if let Some(name) = current.clone() {
                    self.scan_body_segments(line, &name, line_no, database, diagnostics);
                }
                continue;
            }

            self.scan_relationship_line(line, line_no, database, diagnostics);
        }
    }

    /// Parse the member segments of one body line onto a class.
    fn scan_body_segments(
        &self,
        line: &str,
        class_name: &str,
        line_no: usize,
        database: &mut Diagram,
        diagnostics: &mut Diagnostics,
    ) {
        for segment in split_member_segments(line) {
            match parse_member_line(&segment) {
                Some(MemberLine::Attribute(field)) => {
                    if let Some(class) = database.get_class_mut(class_name) {
                        class.add_field(field);
                    }
                }
                Some(MemberLine::Method(method)) => {
                    if let Some(class) = database.get_class_mut(class_name) {
                        class.add_method(method);
                    }
                }
                None => {
                    diagnostics.warning(
                        format!("skipping unparseable member line: {segment}"),
                        line_no,
                        1,
                    );
                }
            }
        }
    }

    fn scan_relationship_line(
        &self,
        line: &str,
        line_no: usize,
        database: &mut Diagram,
        diagnostics: &mut Diagnostics,
    ) {
        // Inheritance first: the parent is always the side adjacent to <|
        if line.contains("<|--") || line.contains("--|>") {
            let parsed = inherit_left_re()
                .captures(line)
                .map(|caps| (caps[1].to_string(), caps[2].to_string()))
                .or_else(|| {
                    inherit_right_re()
                        .captures(line)
                        .map(|caps| (caps[2].to_string(), caps[1].to_string()))
                });
            match parsed {
                Some((parent, child)) => {
                    database.add_relationship(Relationship::new(
                        parent,
                        child,
                        RelationshipKind::Inheritance,
                    ));
                }
                None => diagnostics.warning(
                    format!("skipping unparseable inheritance line: {line}"),
                    line_no,
                    1,
                ),
            }
            return;
        }

        if line.contains("*--") || line.contains("o--") || line.contains("-->") {
            match edge_re().captures(line) {
                Some(caps) => {
                    let source = caps[1].to_string();
                    let target = caps[5].to_string();
                    let source_mult = caps.get(2).map(|m| m.as_str().to_string());
                    let target_mult = caps.get(4).map(|m| m.as_str().to_string());
                    let op = &caps[3];

                    let kind = match op {
                        "*--" => RelationshipKind::Composition,
                        "o--" => RelationshipKind::Aggregation,
                        _ => RelationshipKind::Association,
                    };

                    // An association only counts with multiplicities quoted
                    // on both sides; anything else is noise here.
                    if kind == RelationshipKind::Association
                        && (source_mult.is_none() || target_mult.is_none())
                    {
                        diagnostics.warning(
                            format!("skipping association without multiplicities: {line}"),
                            line_no,
                            1,
                        );
                        return;
                    }

                    let mut relationship = Relationship::new(source, target, kind);
                    relationship.source_multiplicity = source_mult;
                    relationship.target_multiplicity = target_mult;
                    database.add_relationship(relationship);
                }
                None => diagnostics.warning(
                    format!("skipping unparseable relationship line: {line}"),
                    line_no,
                    1,
                ),
            }
            return;
        }

        trace!(line, "Ignoring unrecognized top-level line");
    }
}

impl Default for ClassParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<Diagram> for ClassParser {
    fn parse(&self, input: &str, database: &mut Diagram, diagnostics: &mut Diagnostics) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_class_diagram", input_len = input.len());
        let _enter = parse_span.enter();

        let filtered = MetadataFilter::strip(input);

        match Self::strict_pass(&filtered) {
            Ok(parsed) => {
                debug!(
                    class_count = parsed.class_count(),
                    relationship_count = parsed.relationship_count(),
                    "Strict class parse succeeded"
                );
                *database = parsed;
            }
            Err(reason) => {
                warn!(%reason, "Strict class parse failed, escalating to line scanner");
                diagnostics.info(
                    format!(
                        "strict class grammar rejected input; re-parsed with tolerant line scanner ({reason})"
                    ),
                    0,
                    0,
                );
                database.clear();
                self.scan_lines(&filtered, database, diagnostics);
            }
        }

        database.resolve_inheritance();
        database.apply_associations();

        debug!(
            class_count = database.class_count(),
            relationship_count = database.relationship_count(),
            "Class diagram parsing completed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "class"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        let lower = input.to_lowercase();
        lower.contains("classdiagram") || (lower.contains("class ") && lower.contains('{'))
    }
}
