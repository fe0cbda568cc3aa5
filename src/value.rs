//! Cell-level value model.
//!
//! A parsed table is made of [`Node`]s, one per cell. A node either carries
//! a [`Scalar`] — string, boolean, 64-bit integer or 64-bit float, the four
//! leaf kinds the format knows — or a pointer to a data row of another
//! table. Pointers are what keep the format flat: a record whose field is a
//! map stores `$common-map_3` in the field's cell instead of inlining the
//! entries.

use std::fmt;

/// One of the four scalar kinds a cell can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Scalar {
    /// Name of the scalar's kind, used in type-mismatch reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Str(_) => "string",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int64",
            Scalar::Float(_) => "float64",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{v}"),
        }
    }
}

/// One parsed cell: a scalar literal or a reference to a table row.
///
/// ```rust
/// use serde_csvt::{Node, Scalar};
///
/// let cell = Node::Scalar(Scalar::Int(42));
/// assert!(cell.is_scalar());
///
/// let reference = Node::Pointer { key: "common-array".to_string(), index: 1 };
/// assert!(!reference.is_scalar());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    /// Reference to data row `index` of the table named `key`.
    Pointer { key: String, index: usize },
}

impl Node {
    /// The node an empty cell parses to.
    #[must_use]
    pub fn empty() -> Self {
        Node::Scalar(Scalar::Str(String::new()))
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    /// Stringified form of the node, used when nodes become map keys.
    ///
    /// Scalars render their value; pointers render their table key.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Node::Scalar(scalar) => scalar.to_string(),
            Node::Pointer { key, .. } => key.clone(),
        }
    }

    /// Name of the node's kind, used in type-mismatch reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(scalar) => scalar.kind(),
            Node::Pointer { .. } => "reference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_display_matches_wire_literals() {
        assert_eq!(Scalar::Str("oop".to_string()).to_string(), "oop");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Int(-3).to_string(), "-3");
        assert_eq!(Scalar::Float(1.25).to_string(), "1.25");
    }

    #[test]
    fn node_key_stringifies_scalars_and_pointers() {
        assert_eq!(Node::Scalar(Scalar::Int(7)).key(), "7");
        let pointer = Node::Pointer {
            key: "common-map".to_string(),
            index: 0,
        };
        assert_eq!(pointer.key(), "common-map");
    }
}
