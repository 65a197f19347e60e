//! Sequence diagram parser
//!
//! Regex-driven extraction of method signatures from message lines:
//!
//! ```text
//! sequenceDiagram
//!     User->>UserService: validateEmail(email: String) -> Boolean
//!     User->>UserService: changePassword(old: String, new: String)
//! ```
//!
//! Per-line failures are logged as warnings and skipped; the overall parse
//! never aborts.

use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, span, trace, Level};

use super::database::{MethodParameter, SequenceDiagram, SequenceMethod};
use crate::core::{Diagnostics, MetadataFilter, Parser, VOID_TYPE};

static MESSAGE_RE: OnceLock<Regex> = OnceLock::new();
static PARAM_RE: OnceLock<Regex> = OnceLock::new();

/// Message pattern:
/// `Actor ->> Target : methodName(params) -> ReturnType`
/// with the return-type suffix optional and `-->>`/`->`/`-->` accepted
/// as arrows.
fn message_re() -> &'static Regex {
    MESSAGE_RE.get_or_init(|| {
        Regex::new(
            r"^(\w+)\s*(?:-->>|->>|-->|->)\s*(\w+)\s*:\s*([A-Za-z_]\w*)\(([^)]*)\)\s*(?:->\s*(.+?))?\s*$",
        )
        .expect("message regex must compile")
    })
}

/// Individual parameter pattern: `name: Type`
fn param_re() -> &'static Regex {
    PARAM_RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_]\w*)\s*:\s*(.+?)\s*$").expect("parameter regex must compile")
    })
}

/// Declaration keywords that are valid sequence syntax but carry no method
/// signature; they are skipped without a diagnostic.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "participant",
    "actor",
    "activate",
    "deactivate",
    "autonumber",
    "note",
    "loop",
    "alt",
    "else",
    "opt",
    "par",
    "end",
];

/// Sequence diagram parser
pub struct SequenceParser;

impl SequenceParser {
    pub fn new() -> Self {
        Self
    }

    /// Split a parameter blob on commas, tracking angle-bracket depth so
    /// generic type arguments (`Map<K,V>`) stay whole.
    fn split_parameters(blob: &str) -> Vec<String> {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut depth: i32 = 0;

        for c in blob.chars() {
            match c {
                '<' => {
                    depth += 1;
                    current.push(c);
                }
                '>' => {
                    depth -= 1;
                    current.push(c);
                }
                ',' if depth == 0 => {
                    parts.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(c),
            }
        }
        if !current.trim().is_empty() {
            parts.push(current.trim().to_string());
        }

        parts.retain(|p| !p.is_empty());
        parts
    }

    /// Parse a parameter blob into typed parameters.
    ///
    /// Fragments that do not match `name: Type` are dropped silently; the
    /// extraction is permissive by design.
    fn parse_parameters(blob: &str) -> Vec<MethodParameter> {
        Self::split_parameters(blob)
            .iter()
            .filter_map(|fragment| {
                param_re()
                    .captures(fragment)
                    .map(|caps| MethodParameter::new(&caps[1], &caps[2]))
            })
            .collect()
    }

    fn is_structural(line: &str) -> bool {
        let lower = line.to_lowercase();
        STRUCTURAL_KEYWORDS.iter().any(|kw| {
            lower == *kw
                || lower
                    .strip_prefix(kw)
                    .is_some_and(|rest| rest.starts_with(char::is_whitespace))
        })
    }
}

impl Default for SequenceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<SequenceDiagram> for SequenceParser {
    fn parse(
        &self,
        input: &str,
        database: &mut SequenceDiagram,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_sequence_diagram", input_len = input.len());
        let _enter = parse_span.enter();

        let mut filter = MetadataFilter::new();

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            if filter.should_skip(raw) {
                continue;
            }
            let line = raw.trim();
            if line.is_empty() || line.to_lowercase().contains("sequencediagram") {
                continue;
            }
            if Self::is_structural(line) {
                continue;
            }

            if let Some(caps) = message_re().captures(line) {
                let parameters = Self::parse_parameters(&caps[4]);
                let return_type = caps
                    .get(5)
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(VOID_TYPE);

                let method = SequenceMethod::new(&caps[1], &caps[2], &caps[3])
                    .with_parameters(parameters)
                    .with_return_type(return_type)
                    .with_line_number(line_no);

                trace!(
                    line = line_no,
                    callee = %method.target_class,
                    method = %method.method_name,
                    params = %method.formatted_parameters(),
                    "Extracted method"
                );
                database.add_method(method);
            } else if line.contains("->") {
                diagnostics.warning(
                    format!("skipping unparseable message line: {line}"),
                    line_no,
                    1,
                );
            } else {
                trace!(line = line_no, "Ignoring non-message line");
            }
        }

        debug!(
            method_count = database.method_count(),
            "Sequence diagram parsing completed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sequence"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        let lower = input.to_lowercase();
        lower.contains("sequencediagram") || lower.contains("->>")
    }
}
