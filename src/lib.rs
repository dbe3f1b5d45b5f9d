//! cfgtree: hierarchical configuration documents with a dot-path query language
//!
//! A document is an ordered list of named groups. Groups hold scalar or array
//! fields, string metadata and child groups. Same-named siblings form an
//! addressable run, reached with a bracketed offset.
//!
//! # Quick Start
//!
//! ## Loading and Querying
//!
//! ```rust
//! use cfgtree::{DocumentLoader, Result};
//!
//! fn main() -> Result<()> {
//!     let doc = DocumentLoader::new().load_str(
//!         "server:\n  - port: 8080\n  - port: 8081\nlogging:\n  level: info\n",
//!     )?;
//!
//!     assert_eq!(doc.query_int("server.port")?, 8080);
//!     assert_eq!(doc.query_int("server[1].port")?, 8081);
//!     assert_eq!(doc.query_string("logging.level")?, "info");
//!     Ok(())
//! }
//! ```
//!
//! ## Filtering by Metadata
//!
//! ```rust
//! use cfgtree::{DocumentLoader, Result};
//!
//! fn main() -> Result<()> {
//!     let doc = DocumentLoader::new().load_str(
//!         "db:\n  - _meta: {role: primary}\n    host: a\n  - _meta: {role: replica}\n    host: b\n",
//!     )?;
//!
//!     let primaries = doc.get_nodes("[role:primary]");
//!     assert_eq!(primaries.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Modifying Documents
//!
//! ```rust
//! use cfgtree::{Document, Result};
//!
//! fn main() -> Result<()> {
//!     let mut doc = Document::new();
//!     doc.set_value("server.port", "9090")?;
//!     assert_eq!(doc.query_int("server.port")?, 9090);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: the document model, path grammars and query cache
//! - [`io`]: the YAML loader and input file resolution
//! - [`error`]: error types

// Public API exports
pub use crate::error::{CfgTreeError, ErrorSeverity, Result};

// Core types
pub use crate::core::{
    AddressPath, CachePolicy, Document, DocumentOptions, Field, FieldValue, Found, Group, Lookup,
    MetaFilter, Miss, Scalar, Segment, ValueType,
};

// IO types
pub use crate::io::{DocumentLoader, FileResolver, LoaderConfig, ResolverConfig};

pub mod core;
pub mod error;
pub mod io;

/// Convenience functions for common operations
pub mod convenience {
    //! One-call helpers using default loader settings

    use crate::{Document, DocumentLoader, Result};
    use std::path::Path;

    /// Parse a document from YAML text
    pub fn parse_document(content: &str) -> Result<Document> {
        DocumentLoader::new().load_str(content)
    }

    /// Read a document from a file
    pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document> {
        DocumentLoader::new().load_file(path)
    }

    /// Quick way to read a single scalar from a file
    pub fn get_value<P: AsRef<Path>>(path: P, address: &str) -> Result<Option<String>> {
        let document = read_document(path)?;
        match document.query_string(address) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_miss() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
