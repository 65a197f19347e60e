//! State machine model store
//!
//! States are created implicitly on first appearance; transition endpoints
//! always exist as states after parsing completes. The `[*]` pseudo-state
//! marker is recognized by the parser but never materialized here.

/// The pseudo start/end marker; never stored as a real state.
pub const PSEUDO_STATE: &str = "[*]";

/// A named state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub name: String,
    pub is_initial: bool,
    pub is_final: bool,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_initial: false,
            is_final: false,
        }
    }
}

/// A transition between two states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from_state: String,
    pub to_state: String,
    /// May be blank when the arrow carried no label
    pub trigger: String,
    pub condition: Option<String>,
    pub action: Option<String>,
}

impl StateTransition {
    pub fn new(
        from_state: impl Into<String>,
        to_state: impl Into<String>,
        trigger: impl Into<String>,
    ) -> Self {
        Self {
            from_state: from_state.into(),
            to_state: to_state.into(),
            trigger: trigger.into(),
            condition: None,
            action: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// State machine model
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    states: Vec<State>,
    transitions: Vec<StateTransition>,
    initial_state: Option<String>,
    /// True when the fixed default machine was substituted because no
    /// transitions were found in the input
    fallback_injected: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state by name if it does not exist yet.
    ///
    /// The pseudo-state marker is silently refused.
    pub fn ensure_state(&mut self, name: &str) {
        if name == PSEUDO_STATE {
            return;
        }
        if !self.states.iter().any(|s| s.name == name) {
            self.states.push(State::new(name));
        }
    }

    /// Set the machine's initial state, registering it if needed.
    pub fn set_initial(&mut self, name: &str) {
        self.ensure_state(name);
        if let Some(state) = self.get_state_mut(name) {
            state.is_initial = true;
        }
        self.initial_state = Some(name.to_string());
    }

    /// Mark a state as final, registering it if needed.
    pub fn mark_final(&mut self, name: &str) {
        self.ensure_state(name);
        if let Some(state) = self.get_state_mut(name) {
            state.is_final = true;
        }
    }

    /// Append a transition, auto-registering both endpoints.
    pub fn add_transition(&mut self, transition: StateTransition) {
        self.ensure_state(&transition.from_state);
        self.ensure_state(&transition.to_state);
        self.transitions.push(transition);
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn get_state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }

    fn get_state_mut(&mut self, name: &str) -> Option<&mut State> {
        self.states.iter_mut().find(|s| s.name == name)
    }

    pub fn initial_state(&self) -> Option<&str> {
        self.initial_state.as_deref()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.transitions.is_empty()
    }

    pub fn fallback_injected(&self) -> bool {
        self.fallback_injected
    }

    /// Substitute the fixed two-state default machine.
    ///
    /// States ACTIVE (initial) and SUSPENDED, with `suspend`/`activate`
    /// transitions between them. Callers must surface this substitution as
    /// a diagnostic; it is a documented default, not extracted content.
    pub fn inject_fallback(&mut self) {
        self.ensure_state("ACTIVE");
        self.ensure_state("SUSPENDED");
        if self.initial_state.is_none() {
            self.set_initial("ACTIVE");
        }
        self.add_transition(StateTransition::new("ACTIVE", "SUSPENDED", "suspend"));
        self.add_transition(StateTransition::new("SUSPENDED", "ACTIVE", "activate"));
        self.fallback_injected = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_created_implicitly() {
        let mut machine = StateMachine::new();
        machine.add_transition(StateTransition::new("Idle", "Running", "start"));
        assert_eq!(machine.state_count(), 2);
        assert_eq!(machine.transition_count(), 1);
    }

    #[test]
    fn test_no_duplicate_states() {
        let mut machine = StateMachine::new();
        machine.ensure_state("Idle");
        machine.ensure_state("Idle");
        assert_eq!(machine.state_count(), 1);
    }

    #[test]
    fn test_pseudo_state_never_materialized() {
        let mut machine = StateMachine::new();
        machine.ensure_state(PSEUDO_STATE);
        assert_eq!(machine.state_count(), 0);
    }

    #[test]
    fn test_initial_state_flags() {
        let mut machine = StateMachine::new();
        machine.set_initial("Idle");
        assert_eq!(machine.initial_state(), Some("Idle"));
        assert!(machine.get_state("Idle").unwrap().is_initial);
    }

    #[test]
    fn test_final_state_flags() {
        let mut machine = StateMachine::new();
        machine.mark_final("Done");
        assert!(machine.get_state("Done").unwrap().is_final);
    }

    #[test]
    fn test_fallback_machine() {
        let mut machine = StateMachine::new();
        machine.inject_fallback();
        assert!(machine.fallback_injected());
        assert_eq!(machine.state_count(), 2);
        assert_eq!(machine.initial_state(), Some("ACTIVE"));
        assert_eq!(machine.transitions()[0].trigger, "suspend");
        assert_eq!(machine.transitions()[1].trigger, "activate");
    }
}
