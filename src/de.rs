//! CSVT deserialization.
//!
//! The decoder materializes a typed value out of a parsed [`TableSet`]. The
//! target type drives the walk: a struct target reads its declared fields
//! out of the row's columns, a map target reads the row's entries, a
//! sequence target reads the row's cells in order, and a scalar target reads
//! the sole cell of a scalar row. Pointer cells are resolved through the
//! table set and recursed into with a fresh sub-target.
//!
//! When the target is a `Vec` (or any sequence), every data row of the root
//! table becomes one element; any other target materializes from the root
//! table's first row.
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_csvt::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Release { version: String, stable: bool }
//!
//! let input = "/** Release&0\nH-> version;stable\n0-> \"1.25.3\";true:\n";
//! let release: Release = from_str(input).unwrap();
//! assert_eq!(release.version, "1.25.3");
//! assert!(release.stable);
//! ```

use serde::de::{self, Deserializer as _, IntoDeserializer, Visitor};

use crate::error::{Error, Result};
use crate::options::DecodeOptions;
use crate::parser;
use crate::table::{Group, TableSet};
use crate::value::{Node, Scalar};

/// The CSVT deserializer: a parsed table set plus decode options.
pub struct Deserializer {
    tables: TableSet,
    options: DecodeOptions,
}

impl Deserializer {
    /// Parses the input with default options.
    ///
    /// # Errors
    ///
    /// Returns any parse error of the underlying document.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self> {
        Self::from_str_with_options(input, DecodeOptions::default())
    }

    /// Parses the input with the given options.
    ///
    /// # Errors
    ///
    /// Returns any parse error of the underlying document.
    pub fn from_str_with_options(input: &str, options: DecodeOptions) -> Result<Self> {
        Ok(Self::from_tables(parser::read(input)?, options))
    }

    /// Wraps an already parsed table set.
    #[must_use]
    pub fn from_tables(tables: TableSet, options: DecodeOptions) -> Self {
        Deserializer { tables, options }
    }

    /// Materializes the root table's data row at `index`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoRoot`] when no table is flagged as root and
    /// with [`Error::DanglingPointer`] when the row does not exist.
    pub fn value_at<'de, T>(&self, index: usize) -> Result<T>
    where
        T: de::Deserialize<'de>,
    {
        T::deserialize(self.group_at(index)?)
    }

    fn group_at(&self, index: usize) -> Result<GroupDeserializer<'_>> {
        let root = self.tables.root().ok_or(Error::NoRoot)?;
        let group = root
            .get(index)
            .ok_or_else(|| Error::dangling_pointer(root.key(), index, "root table"))?;
        Ok(GroupDeserializer { de: self, group })
    }
}

macro_rules! forward_to_root_group {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                self.group_at(0)?.$method(visitor)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for &'a Deserializer {
    type Error = Error;

    forward_to_root_group! {
        deserialize_any deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_f32 deserialize_f64 deserialize_char
        deserialize_str deserialize_string
        deserialize_bytes deserialize_byte_buf
        deserialize_option deserialize_unit deserialize_map
        deserialize_identifier deserialize_ignored_any
    }

    /// Sequence targets iterate every data row of the root table.
    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let root = self.tables.root().ok_or(Error::NoRoot)?;
        visitor.visit_seq(RootRows {
            de: self,
            iter: root.groups().iter(),
        })
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.group_at(0)?.deserialize_unit_struct(name, visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.group_at(0)?.deserialize_struct(name, fields, visitor)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.group_at(0)?.deserialize_enum(name, variants, visitor)
    }
}

/// Iterates the root table's rows for a top-level sequence target.
struct RootRows<'a> {
    de: &'a Deserializer,
    iter: std::slice::Iter<'a, Group>,
}

impl<'de> de::SeqAccess<'de> for RootRows<'_> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(group) => seed
                .deserialize(GroupDeserializer { de: self.de, group })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Materializes one row against the target type.
#[derive(Clone, Copy)]
struct GroupDeserializer<'a> {
    de: &'a Deserializer,
    group: &'a Group,
}

impl<'a> GroupDeserializer<'a> {
    /// The sole cell of a scalar row, for scalar targets.
    fn value_node(&self) -> Result<&'a Node> {
        self.group.find_value().ok_or_else(|| {
            Error::custom(format!(
                "cannot read a scalar from a {} row",
                self.group.category()
            ))
        })
    }

    fn node(&self, node: &'a Node, location: String) -> NodeDeserializer<'a> {
        NodeDeserializer {
            de: self.de,
            node,
            location,
        }
    }
}

macro_rules! forward_to_value_node {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                let node = self.value_node()?;
                self.node(node, "value".to_string()).$method(visitor)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for GroupDeserializer<'a> {
    type Error = Error;

    forward_to_value_node! {
        deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_f32 deserialize_f64 deserialize_char
        deserialize_str deserialize_string deserialize_identifier
    }

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        use crate::table::GroupBody;
        match self.group.body() {
            GroupBody::Object(node) => self.node(node, "value".to_string()).deserialize_any(visitor),
            GroupBody::Array(_) => self.deserialize_seq(visitor),
            GroupBody::Map(_) => self.deserialize_map(visitor),
            GroupBody::Structure(_) => {
                // no target shape to follow, expose the row as a map of its
                // columns
                let pairs: Vec<(String, &Node)> = self
                    .group
                    .headers()
                    .iter()
                    .cloned()
                    .zip(self.group.nodes())
                    .collect();
                visitor.visit_map(PairsAccess {
                    de: self.de,
                    iter: pairs.into_iter(),
                    pending: None,
                })
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if let Some(node) = self.group.find_value() {
            return self.node(node, "value".to_string()).deserialize_option(visitor);
        }
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(NodesAccess {
            de: self.de,
            iter: self.group.nodes().into_iter().enumerate(),
        })
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(PairsAccess {
            de: self.de,
            iter: self.group.find_fields().into_iter(),
            pending: None,
        })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(StructAccess {
            de: self.de,
            group: self.group,
            fields: fields.iter(),
            pending: None,
        })
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let node = self.value_node()?;
        self.node(node, "value".to_string())
            .deserialize_enum(name, variants, visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }
}

/// Serves a struct target's declared fields: present columns yield their
/// cell, absent ones either fail (strict) or yield a zero value.
struct StructAccess<'a> {
    de: &'a Deserializer,
    group: &'a Group,
    fields: std::slice::Iter<'static, &'static str>,
    pending: Option<(&'static str, Option<&'a Node>)>,
}

impl<'de, 'a> de::MapAccess<'de> for StructAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some(&name) = self.fields.next() else {
            return Ok(None);
        };

        let node = self.group.find_field(name);
        if node.is_none() && self.de.options.strict {
            return Err(Error::missing_field(name));
        }
        self.pending = Some((name, node));

        seed.deserialize(de::value::BorrowedStrDeserializer::new(name))
            .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let Some((name, node)) = self.pending.take() else {
            return Err(Error::custom("field value requested before its key"));
        };

        match node {
            Some(node) => seed.deserialize(NodeDeserializer {
                de: self.de,
                node,
                location: format!("field \"{name}\""),
            }),
            None => seed.deserialize(ZeroDeserializer),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Serves `(key, node)` pairs for a map target.
struct PairsAccess<'a> {
    de: &'a Deserializer,
    iter: std::vec::IntoIter<(String, &'a Node)>,
    pending: Option<(String, &'a Node)>,
}

impl<'de, 'a> de::MapAccess<'de> for PairsAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, node)) => {
                let deserializer = MapKeyDeserializer { key: key.clone() };
                self.pending = Some((key, node));
                seed.deserialize(deserializer).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let Some((key, node)) = self.pending.take() else {
            return Err(Error::custom("entry value requested before its key"));
        };
        seed.deserialize(NodeDeserializer {
            de: self.de,
            node,
            location: format!("entry \"{key}\""),
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Serves a row's cells in order for a sequence target.
struct NodesAccess<'a> {
    de: &'a Deserializer,
    iter: std::iter::Enumerate<std::vec::IntoIter<&'a Node>>,
}

impl<'de, 'a> de::SeqAccess<'de> for NodesAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((i, node)) => seed
                .deserialize(NodeDeserializer {
                    de: self.de,
                    node,
                    location: format!("array position \"{i}\""),
                })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Materializes one cell: scalars convert to the target kind, pointers
/// resolve and recurse into the referenced row.
struct NodeDeserializer<'a> {
    de: &'a Deserializer,
    node: &'a Node,
    location: String,
}

impl<'a> NodeDeserializer<'a> {
    /// Resolves a pointer cell to the row it references.
    fn resolve(&self) -> Result<GroupDeserializer<'a>> {
        match self.node {
            Node::Pointer { key, index } => self
                .de
                .tables
                .find(key, *index)
                .map(|group| GroupDeserializer { de: self.de, group })
                .ok_or_else(|| Error::dangling_pointer(key.as_str(), *index, self.location.as_str())),
            Node::Scalar(scalar) => Err(Error::type_mismatch(
                "reference",
                scalar.kind(),
                self.location.as_str(),
            )),
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(expected, self.node.kind(), self.location.as_str())
    }
}

macro_rules! deserialize_integer {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                match self.node {
                    Node::Scalar(Scalar::Int(i)) => visitor.visit_i64(*i),
                    Node::Scalar(Scalar::Float(f)) => visitor.visit_i64(*f as i64),
                    Node::Scalar(_) => Err(self.mismatch("int64")),
                    Node::Pointer { .. } => self.resolve()?.$method(visitor),
                }
            }
        )*
    };
}

macro_rules! deserialize_float {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                match self.node {
                    Node::Scalar(Scalar::Float(f)) => visitor.visit_f64(*f),
                    Node::Scalar(Scalar::Int(i)) => visitor.visit_f64(*i as f64),
                    Node::Scalar(_) => Err(self.mismatch("float64")),
                    Node::Pointer { .. } => self.resolve()?.$method(visitor),
                }
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for NodeDeserializer<'a> {
    type Error = Error;

    deserialize_integer! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
    }

    deserialize_float! {
        deserialize_f32 deserialize_f64
    }

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Scalar(Scalar::Str(s)) => visitor.visit_str(s),
            Node::Scalar(Scalar::Bool(b)) => visitor.visit_bool(*b),
            Node::Scalar(Scalar::Int(i)) => visitor.visit_i64(*i),
            Node::Scalar(Scalar::Float(f)) => visitor.visit_f64(*f),
            Node::Pointer { .. } => self.resolve()?.deserialize_any(visitor),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Scalar(Scalar::Bool(b)) => visitor.visit_bool(*b),
            Node::Scalar(_) => Err(self.mismatch("bool")),
            Node::Pointer { .. } => self.resolve()?.deserialize_bool(visitor),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Scalar(Scalar::Str(s)) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(Error::custom(format!(
                        "{} must hold a single character",
                        self.location
                    ))),
                }
            }
            Node::Scalar(_) => Err(self.mismatch("string")),
            Node::Pointer { .. } => self.resolve()?.deserialize_char(visitor),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Scalar(Scalar::Str(s)) => visitor.visit_str(s),
            Node::Scalar(_) => Err(self.mismatch("string")),
            Node::Pointer { .. } => self.resolve()?.deserialize_str(visitor),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Scalar(Scalar::Str(s)) if s.is_empty() => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.resolve()?.deserialize_seq(visitor)
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.resolve()?.deserialize_tuple(len, visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.resolve()?.deserialize_tuple_struct(name, len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.resolve()?.deserialize_map(visitor)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.resolve()?.deserialize_struct(name, fields, visitor)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Scalar(Scalar::Str(s)) => visitor.visit_enum(s.clone().into_deserializer()),
            Node::Scalar(_) => Err(self.mismatch("string")),
            Node::Pointer { .. } => self.resolve()?.deserialize_enum(name, variants, visitor),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }
}

/// Re-parses a map key string into the key type the target asks for.
struct MapKeyDeserializer {
    key: String,
}

impl MapKeyDeserializer {
    fn parse<T: std::str::FromStr>(&self, expected: &str) -> Result<T> {
        self.key
            .parse()
            .map_err(|_| Error::type_mismatch(expected, "string", format!("map key \"{}\"", self.key)))
    }
}

macro_rules! deserialize_parsed_key {
    ($($method:ident => $visit:ident : $ty:ty, $expected:literal;)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                let parsed: $ty = self.parse($expected)?;
                visitor.$visit(parsed)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for MapKeyDeserializer {
    type Error = Error;

    deserialize_parsed_key! {
        deserialize_bool => visit_bool: bool, "bool";
        deserialize_i8 => visit_i64: i64, "int64";
        deserialize_i16 => visit_i64: i64, "int64";
        deserialize_i32 => visit_i64: i64, "int64";
        deserialize_i64 => visit_i64: i64, "int64";
        deserialize_u8 => visit_u64: u64, "int64";
        deserialize_u16 => visit_u64: u64, "int64";
        deserialize_u32 => visit_u64: u64, "int64";
        deserialize_u64 => visit_u64: u64, "int64";
        deserialize_f32 => visit_f64: f64, "float64";
        deserialize_f64 => visit_f64: f64, "float64";
    }

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.key)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::custom("map key must hold a single character")),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(self.key.into_deserializer())
    }

    serde::forward_to_deserialize_any! {
        str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// Produces the zero value of whatever type is asked for; used for fields
/// the row has no column for when strict mode is off.
struct ZeroDeserializer;

impl<'de> de::Deserializer<'de> for ZeroDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_bool(false)
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i64(0)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i64(0)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i64(0)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_i64(0)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u64(0)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u64(0)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u64(0)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_u64(0)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(0.0)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(0.0)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_char('\0')
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str("")
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str("")
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(ZeroElements { remaining: 0 })
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(ZeroElements { remaining: 0 })
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_none()
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(ZeroDeserializer)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(ZeroElements { remaining: 0 })
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(ZeroElements { remaining: len })
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(ZeroElements { remaining: len })
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        const NO_FIELDS: &[&str] = &[];
        visitor.visit_map(ZeroFields {
            fields: NO_FIELDS.iter(),
        })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(ZeroFields {
            fields: fields.iter(),
        })
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::custom(
            "enum fields have no zero value; enable strict mode or provide the column",
        ))
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str("")
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Seq access serving `remaining` zero elements; tuples get their full
/// arity, sequences get none.
struct ZeroElements {
    remaining: usize,
}

impl<'de> de::SeqAccess<'de> for ZeroElements {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(ZeroDeserializer).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Map access zero-filling every declared field of a nested record.
struct ZeroFields {
    fields: std::slice::Iter<'static, &'static str>,
}

impl<'de> de::MapAccess<'de> for ZeroFields {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(&name) => seed
                .deserialize(de::value::BorrowedStrDeserializer::new(name))
                .map(Some),
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ZeroDeserializer)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}
