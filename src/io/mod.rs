//! Loading documents from files and resolving sets of input files

pub mod fs;
pub mod loader;

pub use fs::{FileResolver, ResolverConfig};
pub use loader::{DocumentLoader, LoaderConfig};
