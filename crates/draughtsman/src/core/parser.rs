//! Core parser trait
//!
//! Each diagram plugin implements this trait against its own store type.
//! Parsers are stateless values: all per-parse state (body cursors,
//! metadata filters) lives in locals, so a fresh instance per call is cheap
//! and concurrent parses never share anything.

use anyhow::Result;

use crate::core::Diagnostics;

/// Trait for diagram parsers
///
/// `parse` fills the given store and accumulates non-fatal problems into
/// `diagnostics`; it only returns `Err` for failures the plugin considers
/// unrecoverable for the whole input.
pub trait Parser<Db>: Send + Sync {
    /// Parse input text into the database
    fn parse(&self, input: &str, database: &mut Db, diagnostics: &mut Diagnostics) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input looks parseable by this parser
    fn can_parse(&self, input: &str) -> bool;
}
