//! Core document model for configuration trees
//!
//! A [`Document`] owns the ordered top-level groups and a query cache. Reads
//! go through [`Document::query`], which resolves an address path (see
//! [`crate::core::path`]) and memoizes the outcome; writes go through
//! [`Document::set_value`].

use crate::core::{
    cache::{CachePolicy, CachedLookup, QueryCache},
    group::{mark_repeated, select_sibling, Group, Target},
    lookup::{Found, Lookup, Miss},
    path::{split_field_path, AddressPath, MetaFilter},
    value::Scalar,
};
use crate::error::{CfgTreeError, Result};
use log::debug;

/// Longest address path resolved before giving up
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Behavioral knobs for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
    /// How mutations interact with cached query results
    pub cache_policy: CachePolicy,
    /// Maximum number of segments in an address path
    pub max_depth: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            cache_policy: CachePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A configuration document: ordered top-level groups plus a query cache
#[derive(Debug, Clone, Default)]
pub struct Document {
    groups: Vec<Group>,
    cache: QueryCache,
    options: DocumentOptions,
}

impl Document {
    /// Create an empty document with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with custom options
    pub fn with_options(options: DocumentOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Append a top-level group
    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    pub fn count_groups(&self) -> usize {
        self.groups.len()
    }

    /// Positional access to top-level groups
    pub fn group_at(&self, index: usize) -> Result<&Group> {
        self.groups.get(index).ok_or_else(|| {
            CfgTreeError::index_out_of_range("", index, self.groups.len())
        })
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Find a top-level group by name.
    ///
    /// `None` returns the first group with that identifier. `Some(n)` returns
    /// the n-th same-named group, provided it is flagged as repeated.
    pub fn get_group(&self, name: &str, offset: Option<usize>) -> Option<&Group> {
        select_sibling(&self.groups, name, offset).map(|(_, g)| g)
    }

    /// Resolve an address path, consulting the cache first.
    ///
    /// Any outcome of a non-empty path is cached under the exact string,
    /// including misses.
    pub fn query(&self, path: &str) -> Lookup<'_> {
        if path.is_empty() {
            return Err(Miss::NotFound);
        }

        let resolved = match self.cache.get(path) {
            Some(cached) => cached,
            None => {
                let resolved = self.resolve(path);
                self.cache.insert(path, resolved.clone());
                resolved
            }
        };
        self.materialize(resolved)
    }

    /// Query a scalar and return its text
    pub fn query_string(&self, path: &str) -> Result<String> {
        self.query_scalar(path, "string").map(Scalar::into_string)
    }

    /// Query a scalar and parse it as an integer
    pub fn query_int(&self, path: &str) -> Result<i64> {
        self.query_scalar(path, "integer")?.to_int()
    }

    /// Query a scalar and parse it as a float
    pub fn query_float(&self, path: &str) -> Result<f64> {
        self.query_scalar(path, "float")?.to_float()
    }

    /// Query a scalar and interpret it as a boolean (see [`Scalar::to_bool`])
    pub fn query_bool(&self, path: &str) -> Result<bool> {
        Ok(self.query_scalar(path, "boolean")?.to_bool())
    }

    /// Select top-level groups whose metadata matches `[key:value,...]`.
    ///
    /// Expressions without `[`, or that fail to parse, select nothing.
    pub fn get_nodes(&self, filter_expr: &str) -> Vec<&Group> {
        if !filter_expr.contains('[') {
            return Vec::new();
        }
        let filter = match MetaFilter::parse(filter_expr) {
            Ok(filter) => filter,
            Err(e) => {
                debug!("ignoring filter: {}", e);
                return Vec::new();
            }
        };

        self.groups.iter().filter(|g| filter.matches(g)).collect()
    }

    /// Assign a scalar field.
    ///
    /// Everything before the last `.` of `path` names a top-level group by
    /// its flat identifier; the last segment names the field. The first
    /// group with that identifier gets the field, or a new group is appended.
    /// Fails with `InvalidMutation` when `path` itself resolves to a group.
    pub fn set_value(&mut self, path: &str, value: impl Into<Scalar>) -> Result<()> {
        if matches!(self.query(path), Ok(Found::Group(_))) {
            return Err(CfgTreeError::invalid_mutation(
                path,
                "cannot assign a scalar over an entire group",
            ));
        }

        let (group_address, field_name) = split_field_path(path)?;
        let value = value.into();

        match select_sibling(&self.groups, group_address, None).map(|(i, _)| i) {
            Some(index) => {
                debug!("updating field '{}' on group '{}'", field_name, group_address);
                self.groups[index].add_field(field_name, value);
            }
            None => {
                debug!("creating group '{}' for field '{}'", group_address, field_name);
                let mut group = Group::new(group_address);
                group.add_field(field_name, value);
                self.groups.push(group);
            }
        }

        self.after_write();
        Ok(())
    }

    /// Drop every cached query result
    pub fn reset_cache(&self) {
        self.cache.clear();
    }

    /// Number of distinct query strings currently cached
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    /// Recompute `is_repeated` over the whole tree.
    ///
    /// The flag is otherwise fixed when the tree is built; groups added
    /// later by `set_value` or `add_group` are not reflected until this runs.
    pub fn mark_repeated_siblings(&mut self) {
        mark_repeated(&mut self.groups);
        self.after_write();
    }

    fn after_write(&self) {
        if self.options.cache_policy == CachePolicy::InvalidateOnWrite {
            self.cache.clear();
        }
    }

    fn query_scalar(&self, path: &str, to: &str) -> Result<Scalar> {
        match self.query(path) {
            Ok(Found::Scalar(s)) => Ok(s),
            Ok(other) => Err(CfgTreeError::type_conversion(other.kind(), to)),
            Err(miss) => Err(miss.into_error(path)),
        }
    }

    fn resolve(&self, path: &str) -> CachedLookup {
        let address = match AddressPath::parse(path) {
            Ok(address) => address,
            Err(e) => {
                debug!("unresolvable query: {}", e);
                return Err(Miss::NotFound);
            }
        };
        if address.len() > self.options.max_depth {
            debug!(
                "query '{}' exceeds max depth {}",
                path, self.options.max_depth
            );
            return Err(Miss::NotFound);
        }

        let (first, rest) = address
            .segments()
            .split_first()
            .ok_or(Miss::NotFound)?;
        let (index, root) =
            select_sibling(&self.groups, first.name(), first.offset()).ok_or(Miss::NotFound)?;

        match root.resolve(rest)? {
            Target::Group(trail) => {
                let mut absolute = Vec::with_capacity(trail.len() + 1);
                absolute.push(index);
                absolute.extend(trail);
                Ok(Target::Group(absolute))
            }
            other => Ok(other),
        }
    }

    fn materialize(&self, resolved: CachedLookup) -> Lookup<'_> {
        match resolved? {
            Target::Scalar(s) => Ok(Found::Scalar(s)),
            Target::Array(values) => Ok(Found::Array(values)),
            Target::Group(address) => address
                .split_first()
                .and_then(|(&top, trail)| self.groups.get(top)?.descend(trail))
                .map(Found::Group)
                .ok_or(Miss::NotFound),
        }
    }
}

impl Extend<Group> for Document {
    fn extend<T: IntoIterator<Item = Group>>(&mut self, iter: T) {
        self.groups.extend(iter);
    }
}

impl FromIterator<Group> for Document {
    fn from_iter<T: IntoIterator<Item = Group>>(iter: T) -> Self {
        let mut document = Self::new();
        document.extend(iter);
        document
    }
}
