//! File resolution for processing several configuration sources at once

use crate::error::{CfgTreeError, Result};
use log::trace;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Configuration for file resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Follow symbolic links
    pub follow_links: bool,
    /// Maximum recursion depth for directory traversal
    pub max_depth: Option<usize>,
    /// Include hidden files and directories (starting with .)
    pub include_hidden: bool,
    /// File extensions picked up while walking directories
    pub include_extensions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            max_depth: None,
            include_hidden: false,
            include_extensions: ["yaml", "yml", "md", "markdown"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Expands files and directories into a sorted, de-duplicated file list
#[derive(Debug, Clone, Default)]
pub struct FileResolver {
    config: ResolverConfig,
}

impl FileResolver {
    /// Create a new resolver with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new resolver with custom configuration
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolve multiple paths to a list of files.
    ///
    /// Files named explicitly are always kept; files found by walking a
    /// directory must carry one of the configured extensions.
    pub fn resolve_paths<P>(&self, paths: &[P]) -> Result<Vec<PathBuf>>
    where
        P: AsRef<Path>,
    {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let found = if path.is_file() {
                vec![path.to_path_buf()]
            } else if path.is_dir() {
                self.traverse_directory(path)?
            } else {
                return Err(CfgTreeError::file_not_found(path));
            };

            for file in found {
                if seen.insert(file.clone()) {
                    resolved.push(file);
                }
            }
        }

        resolved.sort();
        Ok(resolved)
    }

    fn traverse_directory(&self, dir_path: &Path) -> Result<Vec<PathBuf>> {
        let include_hidden = self.config.include_hidden;
        let walker = WalkDir::new(dir_path)
            .follow_links(self.config.follow_links)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            .filter_entry(|entry| include_hidden || entry.depth() == 0 || !is_hidden(entry));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                CfgTreeError::path_resolution(format!("Error traversing directory: {}", e))
            })?;

            if entry.file_type().is_file() && self.has_included_extension(entry.path()) {
                trace!("resolved {}", entry.path().display());
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn has_included_extension(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        self.config.include_extensions.contains(&ext)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}
