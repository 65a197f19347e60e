//! State enhancement for class models
//!
//! Decides whether a class is stateful, derives a status enum from the
//! machine's states, and groups transitions into named transition methods.

use std::collections::BTreeSet;

use crate::plugins::class::ClassModel;
use crate::plugins::state::{StateMachine, StateTransition, PSEUDO_STATE};

/// One value of a derived status enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEnumValue {
    /// Upper-cased state name
    pub name: String,
    /// Human-readable description, e.g. "Awaiting review"
    pub description: String,
}

/// A `{ClassName}Status` enum derived from the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEnum {
    pub name: String,
    pub values: Vec<StateEnumValue>,
}

/// One generated transition method, grouping all transitions that share a
/// trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransitionMethod {
    /// camelCased trigger, or `changeState` when the trigger is blank
    pub name: String,
    pub trigger: String,
    pub transitions: Vec<StateTransition>,
}

/// A per-state validation rule carried over from one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateValidationRule {
    pub from_state: String,
    pub to_state: String,
    pub trigger: String,
    pub condition: Option<String>,
    pub action: Option<String>,
}

/// Convert a trigger into a camelCase method name.
fn camel_case(trigger: &str) -> String {
    let words: Vec<&str> = trigger
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .collect();

    let mut name = String::new();
    for (idx, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if idx == 0 {
            name.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                name.push(first.to_ascii_uppercase());
                name.push_str(chars.as_str());
            }
        }
    }
    name
}

/// Format a state name as a human-readable description.
///
/// `AWAITING_REVIEW` becomes "Awaiting review".
fn describe_state(name: &str) -> String {
    let lower = name.to_lowercase().replace('_', " ");
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => lower,
    }
}

/// Enhances class models with state-machine artifacts
pub struct StateEnhancer;

impl StateEnhancer {
    pub fn new() -> Self {
        Self
    }

    /// Whether the class should carry state management.
    ///
    /// True when the class has a field whose name contains "status" or
    /// "state" (case-insensitively), or when the machine is non-empty.
    pub fn should_have_state_management(
        &self,
        class: &ClassModel,
        machine: &StateMachine,
    ) -> bool {
        let has_status_field = class.fields.iter().any(|field| {
            let lower = field.name.to_lowercase();
            lower.contains("status") || lower.contains("state")
        });

        has_status_field || !machine.is_empty()
    }

    /// Derive the `{ClassName}Status` enum from the machine.
    ///
    /// Values are the union of declared states and transition endpoints,
    /// upper-cased, with the pseudo end-state excluded.
    pub fn state_enum(&self, machine: &StateMachine, entity_name: &str) -> StateEnum {
        let mut names: BTreeSet<String> = BTreeSet::new();

        for state in machine.states() {
            names.insert(state.name.clone());
        }
        for transition in machine.transitions() {
            names.insert(transition.from_state.clone());
            names.insert(transition.to_state.clone());
        }
        names.remove(PSEUDO_STATE);

        let values = names
            .into_iter()
            .map(|name| StateEnumValue {
                description: describe_state(&name),
                name: name.to_uppercase(),
            })
            .collect();

        StateEnum {
            name: format!("{}Status", entity_name),
            values,
        }
    }

    /// Group transitions by trigger into one method per distinct trigger,
    /// preserving first-seen trigger order.
    pub fn transition_methods(&self, machine: &StateMachine) -> Vec<StateTransitionMethod> {
        let mut methods: Vec<StateTransitionMethod> = Vec::new();

        for transition in machine.transitions() {
            let trigger = transition.trigger.clone();
            match methods.iter_mut().find(|m| m.trigger == trigger) {
                Some(method) => method.transitions.push(transition.clone()),
                None => {
                    let name = if trigger.is_empty() {
                        "changeState".to_string()
                    } else {
                        camel_case(&trigger)
                    };
                    methods.push(StateTransitionMethod {
                        name,
                        trigger,
                        transitions: vec![transition.clone()],
                    });
                }
            }
        }

        methods
    }

    /// Carry each transition over as a validation rule.
    pub fn validation_rules(&self, machine: &StateMachine) -> Vec<StateValidationRule> {
        machine
            .transitions()
            .iter()
            .map(|transition| StateValidationRule {
                from_state: transition.from_state.clone(),
                to_state: transition.to_state.clone(),
                trigger: transition.trigger.clone(),
                condition: transition.condition.clone(),
                action: transition.action.clone(),
            })
            .collect()
    }
}

impl Default for StateEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::class::Field;

    fn sample_machine() -> StateMachine {
        let mut machine = StateMachine::new();
        machine.set_initial("draft");
        machine.add_transition(StateTransition::new("draft", "review", "submit"));
        machine.add_transition(StateTransition::new("review", "draft", "reject"));
        machine.add_transition(StateTransition::new("review", "published", "approve"));
        machine
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("submit"), "submit");
        assert_eq!(camel_case("submit order"), "submitOrder");
        assert_eq!(camel_case("mark_as_done"), "markAsDone");
        assert_eq!(camel_case("re-open"), "reOpen");
        assert_eq!(camel_case("SUBMIT ORDER"), "submitOrder");
    }

    #[test]
    fn test_describe_state() {
        assert_eq!(describe_state("AWAITING_REVIEW"), "Awaiting review");
        assert_eq!(describe_state("draft"), "Draft");
    }

    #[test]
    fn test_stateful_by_field_name() {
        let enhancer = StateEnhancer::new();
        let empty_machine = StateMachine::new();

        let mut class = ClassModel::new("Order");
        class.add_field(Field::new("orderStatus", "String"));
        assert!(enhancer.should_have_state_management(&class, &empty_machine));

        let mut class = ClassModel::new("Order");
        class.add_field(Field::new("lifecycleState", "String"));
        assert!(enhancer.should_have_state_management(&class, &empty_machine));

        let mut class = ClassModel::new("Order");
        class.add_field(Field::new("total", "BigDecimal"));
        assert!(!enhancer.should_have_state_management(&class, &empty_machine));
    }

    #[test]
    fn test_stateful_by_machine() {
        let enhancer = StateEnhancer::new();
        let class = ClassModel::new("Order");
        assert!(enhancer.should_have_state_management(&class, &sample_machine()));
    }

    #[test]
    fn test_state_enum_values() {
        let stats = StateEnhancer::new().state_enum(&sample_machine(), "Order");
        assert_eq!(stats.name, "OrderStatus");
        let names: Vec<_> = stats.values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["DRAFT", "PUBLISHED", "REVIEW"]);
    }

    #[test]
    fn test_state_enum_excludes_pseudo_state() {
        let mut machine = StateMachine::new();
        machine.add_transition(StateTransition::new("Idle", "Done", "finish"));
        machine.mark_final("Done");
        let stats = StateEnhancer::new().state_enum(&machine, "Job");
        assert!(stats.values.iter().all(|v| v.name != "[*]"));
        assert_eq!(stats.values.len(), 2);
    }

    #[test]
    fn test_transition_methods_grouped_by_trigger() {
        let mut machine = sample_machine();
        machine.add_transition(StateTransition::new("published", "review", "reject"));

        let methods = StateEnhancer::new().transition_methods(&machine);
        assert_eq!(methods.len(), 3);

        let reject = methods.iter().find(|m| m.trigger == "reject").unwrap();
        assert_eq!(reject.name, "reject");
        assert_eq!(reject.transitions.len(), 2);
    }

    #[test]
    fn test_blank_trigger_becomes_change_state() {
        let mut machine = StateMachine::new();
        machine.add_transition(StateTransition::new("A", "B", ""));
        let methods = StateEnhancer::new().transition_methods(&machine);
        assert_eq!(methods[0].name, "changeState");
    }

    #[test]
    fn test_validation_rules_carry_guards() {
        let mut machine = StateMachine::new();
        machine.add_transition(
            StateTransition::new("Review", "Published", "approve")
                .with_condition("reviewer assigned")
                .with_action("notify author"),
        );

        let rules = StateEnhancer::new().validation_rules(&machine);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].condition.as_deref(), Some("reviewer assigned"));
        assert_eq!(rules[0].action.as_deref(), Some("notify author"));
    }
}
