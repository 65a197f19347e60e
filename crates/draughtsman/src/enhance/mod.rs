//! Model enrichment
//!
//! Consumes the parsed diagrams and produces the enriched model handed to
//! external generators: behavior extraction from sequence diagrams, state
//! enhancement from state machines, and the combiner that merges both
//! onto the class model.

mod behavior;
mod combiner;
mod state;

pub use behavior::{entity_type, infer_return_type, BehaviorExtractor, BusinessMethod};
pub use combiner::{EnhancedClass, ModelCombiner};
pub use state::{
    StateEnhancer, StateEnum, StateEnumValue, StateTransitionMethod, StateValidationRule,
};
