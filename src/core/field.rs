//! Leaf value holders attached to groups by name

use crate::core::{
    lookup::{Found, Lookup, Miss},
    value::Scalar,
};

/// A field is either one scalar or an ordered list of scalars
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Scalar),
    Array(Vec<Scalar>),
}

/// A named leaf value. Once a field holds an array it stays an array.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    value: FieldValue,
}

impl Field {
    /// Create a scalar-mode field
    pub fn scalar(name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Scalar(value.into()),
        }
    }

    /// Create an array-mode field
    pub fn array<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        Self {
            name: name.into(),
            value: FieldValue::Array(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_array(&self) -> bool {
        matches!(self.value, FieldValue::Array(_))
    }

    /// Read the field.
    ///
    /// Scalar fields ignore `offset`. Array fields return the whole list for
    /// `None` and the element at the offset otherwise.
    pub fn get_value<'a>(&self, offset: Option<usize>) -> Lookup<'a> {
        match (&self.value, offset) {
            (FieldValue::Scalar(s), _) => Ok(Found::Scalar(s.clone())),
            (FieldValue::Array(values), None) => Ok(Found::Array(values.clone())),
            (FieldValue::Array(values), Some(index)) => values
                .get(index)
                .cloned()
                .map(Found::Scalar)
                .ok_or(Miss::IndexOutOfRange {
                    index,
                    len: values.len(),
                }),
        }
    }

    /// Append to the array. The first call on a scalar field switches it to
    /// array mode, seeding the list with `value`.
    pub fn add_to_array(&mut self, value: impl Into<Scalar>) {
        let value = value.into();
        match &mut self.value {
            FieldValue::Array(values) => values.push(value),
            FieldValue::Scalar(_) => self.value = FieldValue::Array(vec![value]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_field_ignores_offset() {
        let field = Field::scalar("port", "8080");
        assert_eq!(field.get_value(None), Ok(Found::Scalar("8080".into())));
        assert_eq!(field.get_value(Some(5)), Ok(Found::Scalar("8080".into())));
        assert!(!field.is_array());
    }

    #[test]
    fn test_array_field_access() {
        let field = Field::array("hosts", ["a", "b"]);
        assert_eq!(
            field.get_value(None),
            Ok(Found::Array(vec!["a".into(), "b".into()]))
        );
        assert_eq!(field.get_value(Some(1)), Ok(Found::Scalar("b".into())));
        assert_eq!(
            field.get_value(Some(2)),
            Err(Miss::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_add_to_array_switches_mode_once() {
        let mut field = Field::scalar("tags", "old");
        field.add_to_array("rust");
        assert!(field.is_array());
        field.add_to_array("cli");
        assert_eq!(
            field.value(),
            &FieldValue::Array(vec!["rust".into(), "cli".into()])
        );
    }
}
