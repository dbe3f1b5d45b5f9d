//! The two path grammars understood by documents
//!
//! Address form, used by `query` and `set_value`:
//!
//! ```text
//! path    = segment ("." segment)*
//! segment = identifier ["[" integer "]"]
//! ```
//!
//! Filter form, used only by `get_nodes`:
//!
//! ```text
//! filter = "[" pair ("," pair)* "]"
//! pair   = key ":" value
//! ```

use crate::core::group::Group;
use crate::error::{CfgTreeError, Result};
use std::fmt;

/// One step of an address path: a name plus an optional zero-based offset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    name: String,
    offset: Option<usize>,
}

impl Segment {
    pub fn new(name: impl Into<String>, offset: Option<usize>) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    /// Parse `name` or `name[n]`
    pub fn parse(raw: &str) -> Result<Self> {
        let Some(open) = raw.find('[') else {
            if raw.contains(']') {
                return Err(CfgTreeError::invalid_path(raw, "unmatched ']'"));
            }
            if raw.is_empty() {
                return Err(CfgTreeError::invalid_path(raw, "empty segment"));
            }
            return Ok(Self::new(raw, None));
        };

        let name = &raw[..open];
        let inner = raw[open + 1..]
            .strip_suffix(']')
            .ok_or_else(|| CfgTreeError::invalid_path(raw, "unterminated offset"))?;

        if name.is_empty() {
            return Err(CfgTreeError::invalid_path(raw, "empty segment name"));
        }
        if inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CfgTreeError::invalid_path(
                raw,
                format!("offset '{}' is not a non-negative integer", inner),
            ));
        }
        let offset = inner
            .parse::<usize>()
            .map_err(|e| CfgTreeError::invalid_path(raw, e.to_string()))?;

        Ok(Self::new(name, Some(offset)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(n) => write!(f, "{}[{}]", self.name, n),
            None => f.write_str(&self.name),
        }
    }
}

/// A parsed dot-separated address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AddressPath {
    segments: Vec<Segment>,
}

impl AddressPath {
    /// Parse a full address. An empty string or any malformed segment is an
    /// `InvalidPath` error.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(CfgTreeError::invalid_path(raw, "empty path"));
        }
        let segments = raw
            .split('.')
            .map(Segment::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }
}

impl fmt::Display for AddressPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        f.write_str(&parts.join("."))
    }
}

/// Split a mutation path into its flat group address and field name.
///
/// Everything before the last `.` is the group address, taken verbatim.
pub fn split_field_path(path: &str) -> Result<(&str, &str)> {
    match path.rsplit_once('.') {
        Some((group, field)) if !group.is_empty() && !field.is_empty() => Ok((group, field)),
        _ => Err(CfgTreeError::invalid_path(
            path,
            "expected <group>.<field>",
        )),
    }
}

/// A conjunction of metadata `key:value` constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaFilter {
    pairs: Vec<(String, String)>,
}

impl MetaFilter {
    /// Parse `[key:value,...]`.
    ///
    /// Keys are trimmed and lowercased, values trimmed. Values are split from
    /// keys at the first `:` so they may contain further colons.
    pub fn parse(expr: &str) -> Result<Self> {
        let open = expr
            .find('[')
            .ok_or_else(|| CfgTreeError::malformed_filter(expr, "missing '['"))?;
        let body = &expr[open + 1..];
        let body = match body.rfind(']') {
            Some(close) => &body[..close],
            None => body,
        };

        if body.trim().is_empty() {
            return Err(CfgTreeError::malformed_filter(expr, "no key:value pairs"));
        }

        let mut pairs = Vec::new();
        for pair in body.split(',') {
            let (key, value) = pair.split_once(':').ok_or_else(|| {
                CfgTreeError::malformed_filter(expr, format!("'{}' has no ':'", pair.trim()))
            })?;
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                return Err(CfgTreeError::malformed_filter(expr, "empty key"));
            }
            pairs.push((key, value.trim().to_string()));
        }

        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// True when the group carries every pair with an exact value match
    pub fn matches(&self, group: &Group) -> bool {
        self.pairs
            .iter()
            .all(|(key, value)| group.get_meta(key) == Some(value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_segment_parsing() {
        assert_eq!(Segment::parse("server").unwrap(), Segment::new("server", None));
        assert_eq!(
            Segment::parse("server[2]").unwrap(),
            Segment::new("server", Some(2))
        );
        assert_eq!(Segment::parse("hosts[0]").unwrap().to_string(), "hosts[0]");
    }

    #[test]
    fn test_invalid_segments() {
        for raw in ["", "a[", "a[x]", "a[-1]", "[1]", "a]", "a[1]b", "a[]"] {
            assert!(Segment::parse(raw).is_err(), "{} should not parse", raw);
        }
    }

    #[test]
    fn test_address_path() {
        let path = AddressPath::parse("db[1].replica.hosts[0]").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.first().unwrap().offset(), Some(1));
        assert_eq!(path.to_string(), "db[1].replica.hosts[0]");

        assert!(AddressPath::parse("").is_err());
        assert!(AddressPath::parse("a..b").is_err());
    }

    #[test]
    fn test_split_field_path() {
        assert_eq!(split_field_path("server.port").unwrap(), ("server", "port"));
        assert_eq!(split_field_path("a.b.c").unwrap(), ("a.b", "c"));
        assert!(split_field_path("port").is_err());
        assert!(split_field_path("server.").is_err());
    }

    #[test]
    fn test_filter_parsing() {
        let filter = MetaFilter::parse("[ Role : primary , region:eu ]").unwrap();
        assert_eq!(
            filter.pairs(),
            &[
                ("role".to_string(), "primary".to_string()),
                ("region".to_string(), "eu".to_string())
            ]
        );

        let filter = MetaFilter::parse("[url:http://x:80]").unwrap();
        assert_eq!(filter.pairs()[0].1, "http://x:80");
    }

    #[test]
    fn test_malformed_filters() {
        for expr in ["role:primary", "[]", "[role]", "[:x]", "[role:a,]"] {
            let err = MetaFilter::parse(expr).unwrap_err();
            assert!(
                matches!(err, CfgTreeError::MalformedFilter { .. }),
                "{} should be malformed",
                expr
            );
        }
    }
}
