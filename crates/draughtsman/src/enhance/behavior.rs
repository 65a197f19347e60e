//! Behavior extraction from sequence diagrams
//!
//! Groups extracted method calls by target class and synthesizes
//! [`BusinessMethod`] stubs with heuristic return types and illustrative
//! logic skeletons. The verb and suffix heuristics are plain lookup
//! tables, kept out of the parsing data flow so they can be swapped
//! without touching parsers.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::VOID_TYPE;
use crate::plugins::sequence::{MethodParameter, SequenceDiagram};

/// Suffixes stripped from a participant name to obtain the entity type.
const ENTITY_SUFFIXES: &[&str] = &["Service", "Repository", "Controller"];

/// What a verb prefix implies about the return type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReturnShape {
    /// The entity type itself
    Entity,
    /// The entity type, or a collection of it when the name contains "all"
    EntityOrList,
    /// The void token
    Void,
}

/// Verb-prefix → return-shape table, checked in order.
const VERB_RETURN_RULES: &[(&str, ReturnShape)] = &[
    ("create", ReturnShape::Entity),
    ("save", ReturnShape::Entity),
    ("find", ReturnShape::EntityOrList),
    ("get", ReturnShape::EntityOrList),
    ("update", ReturnShape::Entity),
    ("delete", ReturnShape::Void),
];

/// Strip a well-known suffix off a participant name to get its entity type.
pub fn entity_type(participant: &str) -> String {
    for suffix in ENTITY_SUFFIXES {
        if let Some(stem) = participant.strip_suffix(suffix) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }
    participant.to_string()
}

/// Infer a return type from the method name's verb prefix.
pub fn infer_return_type(method_name: &str, target_class: &str) -> String {
    let lower = method_name.to_lowercase();
    for (prefix, shape) in VERB_RETURN_RULES {
        if !lower.starts_with(prefix) {
            continue;
        }
        return match shape {
            ReturnShape::Entity => entity_type(target_class),
            ReturnShape::EntityOrList => {
                if lower.contains("all") {
                    format!("List<{}>", entity_type(target_class))
                } else {
                    entity_type(target_class)
                }
            }
            ReturnShape::Void => VOID_TYPE.to_string(),
        };
    }
    VOID_TYPE.to_string()
}

/// Build the illustrative logic skeleton for a method name.
///
/// These are ordered pseudo-statements for downstream stubs, not
/// executable logic.
fn logic_skeleton(method_name: &str) -> Vec<String> {
    let lower = method_name.to_lowercase();

    if lower.contains("create") || lower.contains("save") {
        vec![
            "validate input".to_string(),
            "reject null entity".to_string(),
            "stamp created/updated audit fields".to_string(),
            "persist entity".to_string(),
        ]
    } else if lower.contains("update") {
        vec![
            "look up existing entity by id".to_string(),
            "return not-found error when absent".to_string(),
            "merge changes onto existing entity".to_string(),
            "stamp updated audit field".to_string(),
            "persist entity".to_string(),
        ]
    } else {
        Vec::new()
    }
}

/// A synthesized business method stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessMethod {
    pub name: String,
    pub parameters: Vec<MethodParameter>,
    pub return_type: String,
    /// Ordered pseudo-statements, illustrative only
    pub logic: Vec<String>,
}

/// Extracts business methods from a sequence diagram
pub struct BehaviorExtractor;

impl BehaviorExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Group calls by target class and synthesize method stubs.
    ///
    /// Within each class the methods keep source order; the map itself is
    /// keyed deterministically.
    pub fn extract(&self, diagram: &SequenceDiagram) -> BTreeMap<String, Vec<BusinessMethod>> {
        let mut grouped: BTreeMap<String, Vec<BusinessMethod>> = BTreeMap::new();

        for call in diagram.methods() {
            let method = BusinessMethod {
                name: call.method_name.clone(),
                parameters: call.parameters.clone(),
                return_type: infer_return_type(&call.method_name, &call.target_class),
                logic: logic_skeleton(&call.method_name),
            };
            grouped
                .entry(call.target_class.clone())
                .or_default()
                .push(method);
        }

        debug!(
            participant_count = grouped.len(),
            "Behavior extraction completed"
        );
        grouped
    }
}

impl Default for BehaviorExtractor {
    fn default() -> Self {
        Self::new()
    }
}
