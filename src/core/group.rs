//! Named tree nodes holding fields, metadata and child groups

use crate::core::{
    field::Field,
    lookup::{Found, Lookup, Miss},
    path::{AddressPath, Segment},
    value::Scalar,
};
use indexmap::IndexMap;
use log::trace;
use std::collections::{HashMap, HashSet};

/// A named, possibly repeated node of the configuration tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    identifier: String,
    repeated: bool,
    fields: IndexMap<String, Field>,
    children: Vec<Group>,
    metadata: HashMap<String, String>,
}

/// Where a resolved address points, relative to the group it started from
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Target {
    Scalar(Scalar),
    Array(Vec<Scalar>),
    /// Child indices walked from the starting group; empty means the group itself
    Group(Vec<usize>),
}

impl Group {
    /// Create an empty, non-repeated group without metadata
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    /// Create a group carrying metadata. Metadata cannot change afterwards.
    pub fn with_metadata<I, K, V>(identifier: impl Into<String>, metadata: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            metadata: metadata
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
    }

    /// Whether this group had same-named siblings when the tree was built
    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    pub fn set_repeated(&mut self, repeated: bool) {
        self.repeated = repeated;
    }

    /// Insert or replace a field value. A replaced field keeps its position
    /// and its mode: an array field is replaced by the list `[value]`.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        let name = name.into();
        let field = match self.fields.get(&name) {
            Some(existing) if existing.is_array() => Field::array(name.clone(), [value.into()]),
            _ => Field::scalar(name.clone(), value),
        };
        self.fields.insert(name, field);
    }

    /// Insert or replace a prebuilt field, keeping the position of a replaced one
    pub fn insert_field(&mut self, field: Field) {
        self.fields.insert(field.name().to_string(), field);
    }

    /// Append to an array field, creating it in array mode if absent
    pub fn add_to_array_field(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        let name = name.into();
        self.fields
            .entry(name.clone())
            .or_insert_with(|| Field::array(name, Vec::<Scalar>::new()))
            .add_to_array(value);
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn add_child(&mut self, child: Group) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Group] {
        &self.children
    }

    pub fn count_children(&self) -> usize {
        self.children.len()
    }

    pub fn child_at(&self, index: usize) -> Option<&Group> {
        self.children.get(index)
    }

    /// Find a direct child by name and optional sibling offset
    pub fn get_child(&self, name: &str, offset: Option<usize>) -> Option<&Group> {
        select_sibling(&self.children, name, offset).map(|(_, g)| g)
    }

    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Resolve a dot path below this group.
    ///
    /// Each segment is matched against child groups first. When no child
    /// matches and the segment is the last one, a field of that name is
    /// tried, with the segment's offset indexing into an array field.
    pub fn query(&self, path: &str) -> Lookup<'_> {
        let Ok(address) = AddressPath::parse(path) else {
            return Err(Miss::NotFound);
        };
        match self.resolve(address.segments())? {
            Target::Scalar(s) => Ok(Found::Scalar(s)),
            Target::Array(values) => Ok(Found::Array(values)),
            Target::Group(trail) => self
                .descend(&trail)
                .map(Found::Group)
                .ok_or(Miss::NotFound),
        }
    }

    /// Iterative descent over `segments`, recording child indices on the way
    pub(crate) fn resolve(&self, segments: &[Segment]) -> Result<Target, Miss> {
        let mut current = self;
        let mut trail = Vec::with_capacity(segments.len());

        for (i, segment) in segments.iter().enumerate() {
            if let Some((index, child)) =
                select_sibling(&current.children, segment.name(), segment.offset())
            {
                trail.push(index);
                current = child;
                continue;
            }

            let is_last = i + 1 == segments.len();
            if is_last {
                if let Some(field) = current.fields.get(segment.name()) {
                    trace!(
                        "resolved field '{}' on group '{}'",
                        segment,
                        current.identifier
                    );
                    return match field.get_value(segment.offset())? {
                        Found::Scalar(s) => Ok(Target::Scalar(s)),
                        Found::Array(values) => Ok(Target::Array(values)),
                        Found::Group(_) => Err(Miss::NotFound),
                    };
                }
            }
            return Err(Miss::NotFound);
        }

        Ok(Target::Group(trail))
    }

    /// Follow a trail of child indices
    pub(crate) fn descend(&self, trail: &[usize]) -> Option<&Group> {
        trail
            .iter()
            .try_fold(self, |group, &index| group.children.get(index))
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Group> {
        &mut self.children
    }
}

/// Pick a group among siblings by name.
///
/// Without an offset the first same-named sibling wins regardless of
/// repetition. With an offset, only the `offset`-th same-named sibling in
/// order qualifies, and it must be flagged as repeated.
pub(crate) fn select_sibling<'a>(
    siblings: &'a [Group],
    name: &str,
    offset: Option<usize>,
) -> Option<(usize, &'a Group)> {
    let mut same_named = siblings
        .iter()
        .enumerate()
        .filter(|(_, g)| g.identifier == name);

    match offset {
        None => same_named.next(),
        Some(n) => same_named.nth(n).filter(|(_, g)| g.repeated),
    }
}

/// Recompute `is_repeated` for every group in `siblings` and below
pub(crate) fn mark_repeated(siblings: &mut [Group]) {
    let repeated: HashSet<String> = {
        let mut seen = HashSet::new();
        siblings
            .iter()
            .filter(|g| !seen.insert(g.identifier.as_str()))
            .map(|g| g.identifier.clone())
            .collect()
    };

    for group in siblings.iter_mut() {
        group.repeated = repeated.contains(&group.identifier);
        mark_repeated(&mut group.children);
    }
}
