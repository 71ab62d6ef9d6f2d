//! XML parsing, tree editing and writing primitives for settings files.
//!
//! Documents are read into an owned [`XmlNode`] tree, edited in place, and
//! written back with 4-space indentation behind the declaration line that the
//! source file started with. Comments survive the round trip, and output is
//! encoded in the charset the source declared.

pub mod document;
pub mod parser;
pub mod tree;
pub mod writer;

pub use document::{declaration_line, XmlDocument, DEFAULT_DECLARATION};
pub use parser::{parse, parse_document, parse_document_file, parse_file, ParseError};
pub use tree::{NodeKind, XmlNode};
pub use writer::{
    write, write_atomic, write_atomic_with_permissions, write_document, write_file, WriteError,
    INDENT_WIDTH,
};
