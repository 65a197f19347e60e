//! Sequence diagram model store
//!
//! Holds the method signatures extracted from message lines, in source
//! order.

use crate::core::VOID_TYPE;

/// A method parameter extracted from a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    pub name: String,
    pub param_type: String,
}

impl MethodParameter {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
        }
    }
}

/// A method call extracted from one message line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceMethod {
    /// Who calls the method (e.g., "User", "Controller")
    pub source_actor: String,
    /// Class where the method is defined (e.g., "UserService")
    pub target_class: String,
    pub method_name: String,
    pub parameters: Vec<MethodParameter>,
    /// Declared return type; defaults to the void token
    pub return_type: String,
    /// Originating 1-based line number, for traceability only
    pub line_number: usize,
}

impl SequenceMethod {
    pub fn new(
        source_actor: impl Into<String>,
        target_class: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        Self {
            source_actor: source_actor.into(),
            target_class: target_class.into(),
            method_name: method_name.into(),
            parameters: Vec::new(),
            return_type: VOID_TYPE.to_string(),
            line_number: 0,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<MethodParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    pub fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = line_number;
        self
    }

    /// Parameter list formatted as `name: Type, ...` for logging.
    pub fn formatted_parameters(&self) -> String {
        self.parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.param_type))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Sequence diagram model: ordered extracted method calls
#[derive(Debug, Clone, Default)]
pub struct SequenceDiagram {
    methods: Vec<SequenceMethod>,
}

impl SequenceDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_method(&mut self, method: SequenceMethod) {
        self.methods.push(method);
    }

    pub fn methods(&self) -> &[SequenceMethod] {
        &self.methods
    }

    /// All methods targeting a specific class
    pub fn methods_for(&self, class_name: &str) -> Vec<&SequenceMethod> {
        self.methods
            .iter()
            .filter(|m| m.target_class == class_name)
            .collect()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn clear(&mut self) {
        self.methods.clear();
    }
}
