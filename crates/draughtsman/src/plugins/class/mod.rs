//! Class diagram plugin
//!
//! Dual-strategy parsing of class diagram syntax into a [`Diagram`] model:
//! a strict structural grammar with a tolerant line-scanner fallback.

mod database;
mod detector;
mod parser;
mod strict;

pub use database::{
    Cardinality, ClassModel, Diagram, Field, Method, Parameter, RelationKind, Relationship,
    RelationshipKind, Visibility,
};
pub use detector::ClassDetector;
pub use parser::{parse_member_line, ClassParser, MemberLine};
pub use strict::{ParsedClass, ParsedRelationship, Statement, StrictClassParser};
