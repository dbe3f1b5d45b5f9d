//! Results of address resolution

use crate::core::{group::Group, value::Scalar};
use crate::error::CfgTreeError;
use std::fmt;

/// Something an address path resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum Found<'a> {
    Scalar(Scalar),
    Array(Vec<Scalar>),
    Group(&'a Group),
}

impl<'a> Found<'a> {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Scalar]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&'a Group> {
        match self {
            Self::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Short name of the variant, used in conversion errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Array(_) => "array",
            Self::Group(_) => "group",
        }
    }
}

/// Why an address resolved to nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    NotFound,
    /// An array field offset past the end of the array
    IndexOutOfRange { index: usize, len: usize },
}

impl Miss {
    /// Attach the queried path, turning the miss into a crate error
    pub fn into_error(self, path: &str) -> CfgTreeError {
        match self {
            Self::NotFound => CfgTreeError::not_found(path),
            Self::IndexOutOfRange { index, len } => {
                CfgTreeError::index_out_of_range(path, index, len)
            }
        }
    }
}

impl fmt::Display for Miss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range (length {})", index, len)
            }
        }
    }
}

/// Outcome of resolving an address; a miss is a value, never a raised error
pub type Lookup<'a> = std::result::Result<Found<'a>, Miss>;
