//! Model combination
//!
//! Merges a class diagram with optional sequence- and state-diagram output
//! into one [`EnhancedClass`] per class. The combiner is the single merge
//! point of the pipeline: it runs after all inputs are fully parsed and
//! builds its output in one pass.

use tracing::{debug, span, Level};

use super::behavior::{BehaviorExtractor, BusinessMethod};
use super::state::{StateEnhancer, StateEnum, StateTransitionMethod, StateValidationRule};
use crate::core::ModelError;
use crate::plugins::class::{ClassModel, Diagram};
use crate::plugins::sequence::SequenceDiagram;
use crate::plugins::state::StateMachine;

/// A class model enriched with behavioral and state artifacts
///
/// Created once per class during combination; external consumers only
/// read it.
#[derive(Debug, Clone)]
pub struct EnhancedClass {
    pub model: ClassModel,
    pub behavior_methods: Vec<BusinessMethod>,
    pub state_enum: Option<StateEnum>,
    pub transition_methods: Vec<StateTransitionMethod>,
    pub validation_rules: Vec<StateValidationRule>,
    pub stateful: bool,
}

impl EnhancedClass {
    pub fn new(model: ClassModel) -> Self {
        Self {
            model,
            behavior_methods: Vec::new(),
            state_enum: None,
            transition_methods: Vec::new(),
            validation_rules: Vec::new(),
            stateful: false,
        }
    }
}

/// Whether an extractor participant key belongs to a class.
///
/// Case-insensitive substring match in either direction, so the key
/// `UserService` lands on class `User` and an exact-name participant
/// matches itself.
fn participant_matches(key: &str, class_name: &str) -> bool {
    let key = key.to_lowercase();
    let class_name = class_name.to_lowercase();
    key.contains(&class_name) || class_name.contains(&key)
}

/// Combines parsed diagrams into the enriched model
pub struct ModelCombiner;

impl ModelCombiner {
    pub fn new() -> Self {
        Self
    }

    /// Build one [`EnhancedClass`] per class in the diagram.
    ///
    /// Fails fast when no class diagram was supplied: without at least one
    /// class there is nothing to enrich.
    pub fn combine(
        &self,
        diagram: Option<&Diagram>,
        sequence: Option<&SequenceDiagram>,
        machine: Option<&StateMachine>,
    ) -> Result<Vec<EnhancedClass>, ModelError> {
        let combine_span = span!(Level::INFO, "combine_models");
        let _enter = combine_span.enter();

        let diagram = diagram.ok_or_else(|| {
            ModelError::combine_error("class diagram is required for model combination".to_string())
        })?;

        let behavior = sequence.map(|s| BehaviorExtractor::new().extract(s));
        let enhancer = StateEnhancer::new();

        let mut enhanced_classes = Vec::with_capacity(diagram.class_count());

        for class in diagram.classes() {
            let mut enhanced = EnhancedClass::new(class.clone());

            if let Some(grouped) = &behavior {
                for (key, methods) in grouped {
                    if participant_matches(key, &class.name) {
                        enhanced.behavior_methods.extend(methods.iter().cloned());
                    }
                }
            }

            if let Some(machine) = machine {
                if enhancer.should_have_state_management(class, machine) {
                    enhanced.state_enum = Some(enhancer.state_enum(machine, &class.name));
                    enhanced.transition_methods = enhancer.transition_methods(machine);
                    enhanced.validation_rules = enhancer.validation_rules(machine);
                    enhanced.stateful = true;
                }
            }

            debug!(
                class = %class.name,
                behavior_methods = enhanced.behavior_methods.len(),
                stateful = enhanced.stateful,
                "Enhanced class"
            );
            enhanced_classes.push(enhanced);
        }

        Ok(enhanced_classes)
    }
}

impl Default for ModelCombiner {
    fn default() -> Self {
        Self::new()
    }
}
