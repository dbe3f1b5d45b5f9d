//! Core types for configuration documents
//!
//! - Document: ordered top-level groups plus a query cache
//! - Group / Field: the tree nodes and their leaf values
//! - Scalar: string-backed values with lazy typed coercion
//! - path: the address and filter grammars

pub mod cache;
pub mod document;
pub mod field;
pub mod group;
pub mod lookup;
pub mod path;
pub mod value;

pub use cache::{CachePolicy, QueryCache};
pub use document::{Document, DocumentOptions, DEFAULT_MAX_DEPTH};
pub use field::{Field, FieldValue};
pub use group::Group;
pub use lookup::{Found, Lookup, Miss};
pub use path::{AddressPath, MetaFilter, Segment};
pub use value::{Scalar, ValueType};
