//! Sequence diagram plugin
//!
//! Extracts method signatures from message lines:
//!
//! ```text
//! sequenceDiagram
//!     User->>UserService: validateEmail(email: String) -> Boolean
//! ```

mod database;
mod detector;
mod parser;

pub use database::{MethodParameter, SequenceDiagram, SequenceMethod};
pub use detector::SequenceDetector;
pub use parser::SequenceParser;
