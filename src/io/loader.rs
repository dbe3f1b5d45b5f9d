//! Building documents from YAML sources
//!
//! The loader maps a YAML mapping onto the group tree:
//!
//! ```yaml
//! server:                 # a group
//!   _meta: {role: primary} # metadata of that group
//!   port: 8080            # scalar field
//!   hosts: [a, b]         # array field
//!   tls:                  # child group
//!     enabled: true
//! worker:                 # a list of mappings is a run of repeated groups
//!   - id: 1
//!   - id: 2
//! ```
//!
//! Markdown files are read through their YAML front matter.

use crate::core::{Document, DocumentOptions, Field, Group, Scalar};
use crate::error::{CfgTreeError, Result};
use gray_matter::{engine::YAML, Matter};
use log::debug;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Configuration for the document loader
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Mapping key whose entries become group metadata
    pub meta_key: String,
    /// Lowercase metadata keys so they line up with filter keys
    pub lowercase_meta_keys: bool,
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<usize>,
    /// Options for every document this loader produces
    pub document: DocumentOptions,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            meta_key: "_meta".to_string(),
            lowercase_meta_keys: true,
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
            document: DocumentOptions::default(),
        }
    }
}

/// Turns YAML text (or markdown front matter) into a [`Document`]
pub struct DocumentLoader {
    config: LoaderConfig,
    matter: Matter<YAML>,
}

impl DocumentLoader {
    /// Create a new loader with default configuration
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    /// Create a new loader with custom configuration
    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            config,
            matter: Matter::<YAML>::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a document from a file path
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CfgTreeError::file_not_found(path));
        }
        if !path.is_file() {
            return Err(CfgTreeError::invalid_source(
                path.to_string_lossy(),
                "not a regular file",
            ));
        }

        if let Some(max_size) = self.config.max_file_size {
            let metadata = fs::metadata(path)?;
            if metadata.len() as usize > max_size {
                return Err(CfgTreeError::validation(format!(
                    "File too large: {} bytes (limit: {} bytes)",
                    metadata.len(),
                    max_size
                )));
            }
        }

        let content = fs::read_to_string(path)?;
        let source_name = path.to_string_lossy();

        if Self::is_markdown_file(path) {
            self.load_front_matter(&content, &source_name)
        } else {
            self.load_named(&content, &source_name)
        }
    }

    /// Load a document from YAML text
    pub fn load_str(&self, content: &str) -> Result<Document> {
        self.load_named(content, "<string>")
    }

    /// Load a document from an in-memory buffer holding UTF-8 YAML
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Document> {
        let content = std::str::from_utf8(bytes)
            .map_err(|e| CfgTreeError::invalid_source("<bytes>", e.to_string()))?;
        self.load_named(content, "<bytes>")
    }

    /// Load a document from the YAML front matter of a markdown text.
    /// Text without front matter gives an empty document.
    pub fn load_front_matter(&self, content: &str, source_name: &str) -> Result<Document> {
        if !content.trim_start().starts_with("---") {
            debug!("{} has no front matter", source_name);
            return Ok(Document::with_options(self.config.document));
        }

        let parsed = self.matter.parse(content);
        let root = match parsed.data {
            Some(data) => data.deserialize::<Value>().map_err(|e| {
                CfgTreeError::invalid_source(
                    source_name,
                    format!("Failed to deserialize front matter: {}", e),
                )
            })?,
            None => Value::Null,
        };
        self.build(root, source_name)
    }

    /// Check if a file is a markdown file
    pub fn is_markdown_file<P: AsRef<Path>>(path: P) -> bool {
        match path.as_ref().extension() {
            Some(ext) => {
                let ext_str = ext.to_string_lossy().to_lowercase();
                matches!(
                    ext_str.as_str(),
                    "md" | "markdown" | "mdown" | "mkd" | "mkdn"
                )
            }
            None => false,
        }
    }

    fn load_named(&self, content: &str, source_name: &str) -> Result<Document> {
        if content.trim().is_empty() {
            return Ok(Document::with_options(self.config.document));
        }
        let root: Value = serde_yaml::from_str(content)?;
        self.build(root, source_name)
    }

    fn build(&self, root: Value, source_name: &str) -> Result<Document> {
        let mapping = match untag(root) {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            other => {
                return Err(CfgTreeError::invalid_source(
                    source_name,
                    format!("Expected mapping or null, found {}", type_name(&other)),
                ));
            }
        };

        let mut document = Document::with_options(self.config.document);
        for (key, value) in mapping {
            let name = key_text(&key, source_name)?;
            match untag(value) {
                Value::Mapping(map) => document.add_group(self.build_group(name, map, source_name)?),
                Value::Null => document.add_group(Group::new(name)),
                Value::Sequence(items) if is_group_run(&items) => {
                    for item in items {
                        if let Value::Mapping(map) = untag(item) {
                            document.add_group(self.build_group(name.clone(), map, source_name)?);
                        }
                    }
                }
                other => {
                    return Err(CfgTreeError::invalid_source(
                        source_name,
                        format!(
                            "top-level entry '{}' must be a mapping or a list of mappings, found {}",
                            name,
                            type_name(&other)
                        ),
                    ));
                }
            }
        }

        document.mark_repeated_siblings();
        debug!(
            "loaded {} top-level groups from {}",
            document.count_groups(),
            source_name
        );
        Ok(document)
    }

    fn build_group(&self, identifier: String, map: Mapping, source_name: &str) -> Result<Group> {
        let meta_key = self.config.meta_key.as_str();
        let metadata = match map.get(meta_key) {
            Some(meta) => self.build_metadata(&identifier, meta.clone(), source_name)?,
            None => Vec::new(),
        };
        let mut group = Group::with_metadata(identifier, metadata);

        for (key, value) in map {
            let name = key_text(&key, source_name)?;
            if name == meta_key {
                continue;
            }
            match untag(value) {
                Value::Mapping(child) => {
                    group.add_child(self.build_group(name, child, source_name)?)
                }
                Value::Sequence(items) if items.is_empty() => {
                    group.insert_field(Field::array(name, Vec::<Scalar>::new()))
                }
                Value::Sequence(items) if is_group_run(&items) => {
                    for item in items {
                        if let Value::Mapping(child) = untag(item) {
                            group.add_child(self.build_group(name.clone(), child, source_name)?);
                        }
                    }
                }
                Value::Sequence(items) => {
                    for item in items {
                        let scalar = scalar_text(untag(item)).ok_or_else(|| {
                            CfgTreeError::invalid_source(
                                source_name,
                                format!("list '{}' mixes scalars with nested values", name),
                            )
                        })?;
                        group.add_to_array_field(name.as_str(), scalar);
                    }
                }
                scalar => group.add_field(name, scalar_text(scalar).unwrap_or_default()),
            }
        }

        Ok(group)
    }

    fn build_metadata(
        &self,
        identifier: &str,
        meta: Value,
        source_name: &str,
    ) -> Result<Vec<(String, String)>> {
        let Value::Mapping(map) = untag(meta) else {
            return Err(CfgTreeError::invalid_source(
                source_name,
                format!("'{}' of group '{}' must be a mapping", self.config.meta_key, identifier),
            ));
        };

        map.into_iter()
            .map(|(key, value)| -> Result<(String, String)> {
                let mut key = key_text(&key, source_name)?;
                if self.config.lowercase_meta_keys {
                    key = key.to_lowercase();
                }
                let value = scalar_text(untag(value)).ok_or_else(|| {
                    CfgTreeError::invalid_source(
                        source_name,
                        format!("metadata '{}' of group '{}' must be a scalar", key, identifier),
                    )
                })?;
                Ok((key, value))
            })
            .collect()
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn untag(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}

fn is_group_run(items: &[Value]) -> bool {
    !items.is_empty()
        && items.iter().all(|item| match item {
            Value::Tagged(tagged) => tagged.value.is_mapping(),
            other => other.is_mapping(),
        })
}

fn key_text(key: &Value, source_name: &str) -> Result<String> {
    key.as_str().map(str::to_string).ok_or_else(|| {
        CfgTreeError::invalid_source(source_name, format!("Non-string key found: {:?}", key))
    })
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
