//! Motorola SURFboard signal data for munin
//!
//! Reads the modem's `cmSignalData.htm` status page and reports its
//! downstream, upstream, and codeword statistics tables:
//! - Table extraction driven by a declarative [`Schema`]
//! - Munin multigraph `config` and value output
//!
//! Lookups are plain text matching against a lowercased parse tree, since the
//! page has no stable ids or classes.

pub mod document;
pub mod error;
pub mod extract;
pub mod graph;
pub mod schema;

pub use document::{Document, Source, DEFAULT_URL};
pub use error::{Result, SurfboardError};
pub use extract::*;
pub use schema::{Converter, LogicalTable, RowSpec, Schema};
