//! CSVT serialization.
//!
//! The encoder walks a `Serialize` value and normalizes it into per-type
//! tables of row strings. Scalars become inline cell literals; every record,
//! map and sequence becomes one row of its table and contributes a pointer
//! cell (`$<table-key>_<row-index>`) to its parent. With compact mode on,
//! a row identical to one already written anywhere in the session is not
//! appended again — the existing pointer is reused, which is what
//! deduplicates repeated substructures across the whole document.
//!
//! Most users should go through [`to_string`](crate::to_string) /
//! [`to_string_with_options`](crate::to_string_with_options). The
//! [`Serializer`] type is useful when several top-level values are appended
//! one by one, the way a row store accumulates entries:
//!
//! ```rust
//! use serde::Serialize;
//! use serde_csvt::{EncodeOptions, Serializer};
//!
//! #[derive(Serialize)]
//! struct Release { version: String, stable: bool }
//!
//! let mut serializer = Serializer::new(EncodeOptions::default());
//! serializer.serialize(&Release { version: "1.25.3".into(), stable: true }).unwrap();
//! serializer.serialize(&Release { version: "0.16.0".into(), stable: false }).unwrap();
//!
//! let document = serializer.into_string();
//! assert!(document.contains("/** Release&"));
//! ```

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::ser::{self, Impossible, Serialize};
use sha1::{Digest, Sha1};

use crate::error::{Error, Result};
use crate::options::EncodeOptions;
use crate::spec::{
    ARR_CLOSING, ARR_SEPARATOR, COMMON_ARRAY, COMMON_MAP, HEADER_REGULAR, HEADER_ROOT,
    HEADER_SEPARATOR, MAP_CLOSING, MAP_LINKER, MAP_SEPARATOR, PTR_HEADER, PTR_SEPARATOR,
    ROW_ARROW, STR_CLOSING, STR_SEPARATOR, TBL_INDEX_HEAD,
};

/// Nesting cap for the encoder. A value graph deeper than this is treated
/// as cyclic.
const MAX_DEPTH: usize = 128;

/// Offset from a table's row count to the data-row index of the row that
/// was just appended (the header row occupies slot zero).
const POINTER_INDEX_FIX: usize = 2;

/// The CSVT serializer.
///
/// Accumulates top-level values into a table set and renders the final
/// document with [`into_string`](Serializer::into_string).
pub struct Serializer {
    session: Session,
}

impl Serializer {
    #[must_use]
    pub fn new(options: EncodeOptions) -> Self {
        Serializer {
            session: Session::new(options),
        }
    }

    /// Appends one top-level value to the document.
    ///
    /// The first value appended decides the root table. Maps and sequences
    /// cannot be top-level values themselves; a slice or `Vec` passed here
    /// is unrolled into its elements.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidRoot`] for map or nested-sequence roots
    /// and with [`Error::UnsupportedKind`] for values the format cannot
    /// carry.
    pub fn serialize<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(RootSerializer {
            session: &mut self.session,
            nested: false,
        })
    }

    /// Renders the accumulated tables, root table first.
    #[must_use]
    pub fn into_string(self) -> String {
        self.session.render()
    }
}

/// Per-call encoder state: the tables under construction, the row-dedup
/// cache, the canonical-empty-row pointers and the chosen root key.
struct Session {
    options: EncodeOptions,
    digest: String,
    tables: IndexMap<String, Vec<String>>,
    cache: HashMap<String, String>,
    nil_pointers: HashMap<String, String>,
    root_key: Option<String>,
    depth: usize,
}

impl Session {
    fn new(options: EncodeOptions) -> Self {
        let digest = hex::encode(Sha1::digest(options.namespace.as_bytes()));
        Session {
            options,
            digest,
            tables: IndexMap::new(),
            cache: HashMap::new(),
            nil_pointers: HashMap::new(),
            root_key: None,
            depth: 0,
        }
    }

    fn record_key(&self, name: &str) -> String {
        format!("{name}&{}", self.digest)
    }

    fn set_root(&mut self, key: &str) {
        if self.root_key.is_none() {
            self.root_key = Some(key.to_string());
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::CyclicGraph);
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Creates the table on first encounter: header row, plus the canonical
    /// empty row (and its nil pointer) for kinds that can be empty.
    fn ensure_table(&mut self, key: &str, headers: &str, empty_row: Option<&str>) {
        if self.tables.contains_key(key) {
            return;
        }
        let mut rows = vec![headers.to_string()];
        if let Some(empty) = empty_row {
            rows.push(empty.to_string());
            self.nil_pointers
                .insert(key.to_string(), format_pointer(key, rows.len()));
        }
        self.tables.insert(key.to_string(), rows);
    }

    fn nil_pointer(&self, key: &str) -> Option<&String> {
        self.nil_pointers.get(key)
    }

    /// Appends a row and returns its pointer, or the pointer of an
    /// identical row written earlier when compact mode is on.
    fn commit_row(&mut self, key: &str, row: String) -> String {
        if self.options.compact {
            if let Some(pointer) = self.cache.get(&row) {
                return pointer.clone();
            }
        }

        let rows = self.tables.entry(key.to_string()).or_default();
        rows.push(row.clone());
        let pointer = format_pointer(key, rows.len());

        if self.options.compact {
            self.cache.insert(row, pointer.clone());
        }

        pointer
    }

    fn render(&self) -> String {
        let Some(root_key) = &self.root_key else {
            return String::new();
        };

        let mut out = String::new();
        if let Some(rows) = self.tables.get(root_key) {
            render_table(&mut out, HEADER_ROOT, root_key, rows);
        }
        for (key, rows) in &self.tables {
            if key != root_key {
                render_table(&mut out, HEADER_REGULAR, key, rows);
            }
        }
        out
    }
}

fn render_table(out: &mut String, prefix: &str, key: &str, rows: &[String]) {
    out.push('\n');
    out.push_str(prefix);
    out.push(' ');
    out.push_str(key);
    out.push('\n');

    for (i, row) in rows.iter().enumerate() {
        if i == 0 {
            out.push(TBL_INDEX_HEAD);
        } else {
            out.push_str(&(i - 1).to_string());
        }
        out.push_str(ROW_ARROW);
        out.push_str(row);
        out.push('\n');
    }
}

fn format_pointer(key: &str, row_count: usize) -> String {
    format!(
        "{PTR_HEADER}{key}{PTR_SEPARATOR}{}",
        row_count - POINTER_INDEX_FIX
    )
}

/// Quotes and escapes a string cell. String cells are always quoted so the
/// parser can never mistake their content for separators or pointers.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Formats a float so the cell always re-parses as a float. Values that
/// print without a fractional part get `.0` appended, keeping them distinct
/// from integer cells.
fn format_float(v: f64) -> String {
    let mut s = v.to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

fn check_finite(v: f64) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(Error::unsupported_kind("non-finite float values"))
    }
}

fn check_u64(v: u64) -> Result<u64> {
    if v <= i64::MAX as u64 {
        Ok(v)
    } else {
        Err(Error::unsupported_kind(
            "integer values beyond the 64-bit signed range",
        ))
    }
}

/// Serializes one value into its cell token: scalars become inline
/// literals, composites commit a row to their table and yield its pointer.
struct CellSerializer<'a> {
    session: &'a mut Session,
}

impl<'a> ser::Serializer for CellSerializer<'a> {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = SeqCells<'a>;
    type SerializeTuple = SeqCells<'a>;
    type SerializeTupleStruct = SeqCells<'a>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = MapCells<'a>;
    type SerializeStruct = StructCells<'a>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(if v { "true" } else { "false" }.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(check_u64(v)?.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<String> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        Ok(format_float(check_finite(v)?))
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(quote(&v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(quote(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<String> {
        use serde::ser::SerializeSeq;
        let mut seq = self.serialize_seq(Some(v.len()))?;
        for byte in v {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    fn serialize_none(self) -> Result<String> {
        Ok(quote(""))
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Ok(quote(""))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_kind("newtype enum variants"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCells<'a>> {
        self.session.enter()?;
        Ok(SeqCells {
            session: self.session,
            cells: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCells<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqCells<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_kind("tuple enum variants"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapCells<'a>> {
        self.session.enter()?;
        Ok(MapCells {
            session: self.session,
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<StructCells<'a>> {
        self.session.enter()?;
        let key = self.session.record_key(name);
        Ok(StructCells {
            session: self.session,
            key,
            fields: Vec::with_capacity(len),
            cells: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_kind("struct enum variants"))
    }
}

/// Collects element tokens for one `common-array` row.
struct SeqCells<'a> {
    session: &'a mut Session,
    cells: Vec<String>,
}

impl SeqCells<'_> {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let token = value.serialize(CellSerializer {
            session: &mut *self.session,
        })?;
        self.cells.push(token);
        Ok(())
    }

    fn finish(self) -> Result<String> {
        self.session.leave();
        let canonical_empty = ARR_CLOSING.to_string();
        self.session
            .ensure_table(COMMON_ARRAY, "", Some(canonical_empty.as_str()));

        if self.session.options.compact && self.cells.is_empty() {
            if let Some(pointer) = self.session.nil_pointer(COMMON_ARRAY) {
                return Ok(pointer.clone());
            }
        }

        let mut row = self.cells.join(&ARR_SEPARATOR.to_string());
        row.push(ARR_CLOSING);
        Ok(self.session.commit_row(COMMON_ARRAY, row))
    }
}

impl ser::SerializeSeq for SeqCells<'_> {
    type Ok = String;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<String> {
        self.finish()
    }
}

impl ser::SerializeTuple for SeqCells<'_> {
    type Ok = String;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<String> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SeqCells<'_> {
    type Ok = String;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<String> {
        self.finish()
    }
}

/// Collects `key=value` entry strings for one `common-map` row.
struct MapCells<'a> {
    session: &'a mut Session,
    entries: Vec<String>,
    pending_key: Option<String>,
}

impl ser::SerializeMap for MapCells<'_> {
    type Ok = String;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let token = key.serialize(CellSerializer {
            session: &mut *self.session,
        })?;
        self.pending_key = Some(token);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        let token = value.serialize(CellSerializer {
            session: &mut *self.session,
        })?;
        self.entries.push(format!("{key}{MAP_LINKER}{token}"));
        Ok(())
    }

    fn end(self) -> Result<String> {
        self.session.leave();
        let canonical_empty = MAP_CLOSING.to_string();
        self.session
            .ensure_table(COMMON_MAP, "", Some(canonical_empty.as_str()));

        if self.session.options.compact && self.entries.is_empty() {
            if let Some(pointer) = self.session.nil_pointer(COMMON_MAP) {
                return Ok(pointer.clone());
            }
        }

        let mut row = self.entries.join(&MAP_SEPARATOR.to_string());
        row.push(MAP_CLOSING);
        Ok(self.session.commit_row(COMMON_MAP, row))
    }
}

/// Collects field tokens for one record row.
struct StructCells<'a> {
    session: &'a mut Session,
    key: String,
    fields: Vec<&'static str>,
    cells: Vec<String>,
}

impl ser::SerializeStruct for StructCells<'_> {
    type Ok = String;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let token = value.serialize(CellSerializer {
            session: &mut *self.session,
        })?;
        self.fields.push(key);
        self.cells.push(token);
        Ok(())
    }

    fn end(self) -> Result<String> {
        self.session.leave();
        let headers = self.fields.join(&HEADER_SEPARATOR.to_string());
        self.session.ensure_table(&self.key, &headers, None);

        let mut row = self.cells.join(&STR_SEPARATOR.to_string());
        row.push(STR_CLOSING);
        Ok(self.session.commit_row(&self.key, row))
    }
}

/// Handles the top of the value graph: records the root table key, unrolls
/// top-level sequences into individual values and rejects kinds that cannot
/// be root.
pub(crate) struct RootSerializer<'a> {
    session: &'a mut Session,
    nested: bool,
}

impl<'a> RootSerializer<'a> {
    /// Commits one top-level scalar into its object table.
    fn scalar_root(
        self,
        name: &str,
        empty_row: Option<&str>,
        cell: String,
        is_empty: bool,
    ) -> Result<()> {
        let key = self.session.record_key(name);
        self.session.set_root(&key);
        self.session.ensure_table(&key, "", empty_row);

        if is_empty && self.session.options.compact && self.session.nil_pointer(&key).is_some() {
            return Ok(());
        }

        self.session.commit_row(&key, cell);
        Ok(())
    }
}

impl<'a> ser::Serializer for RootSerializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = RootSeq<'a>;
    type SerializeTuple = RootSeq<'a>;
    type SerializeTupleStruct = RootSeq<'a>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = RootStruct<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        let cell = if v { "true" } else { "false" }.to_string();
        self.scalar_root("bool", None, cell, false)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.scalar_root("int64", None, v.to_string(), false)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.scalar_root("int64", None, check_u64(v)?.to_string(), false)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.scalar_root("float64", None, format_float(check_finite(v)?), false)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let cell = quote(&v.to_string());
        self.scalar_root("string", Some("\"\""), cell, false)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.scalar_root("string", Some("\"\""), quote(v), v.is_empty())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        use serde::ser::SerializeSeq;
        let mut seq = self.serialize_seq(Some(v.len()))?;
        for byte in v {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    fn serialize_none(self) -> Result<()> {
        Err(Error::unsupported_kind("empty optional top-level values"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Err(Error::unsupported_kind("unit top-level values"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<()> {
        let key = self.session.record_key(name);
        self.session.set_root(&key);
        self.session.ensure_table(&key, "", None);
        self.session.commit_row(&key, STR_CLOSING.to_string());
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_kind("newtype enum variants"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<RootSeq<'a>> {
        if self.nested {
            return Err(Error::InvalidRoot);
        }
        Ok(RootSeq {
            session: self.session,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<RootSeq<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<RootSeq<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_kind("tuple enum variants"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::InvalidRoot)
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<RootStruct<'a>> {
        let key = self.session.record_key(name);
        self.session.set_root(&key);
        self.session.enter()?;
        Ok(RootStruct {
            inner: StructCells {
                session: self.session,
                key,
                fields: Vec::with_capacity(len),
                cells: Vec::with_capacity(len),
            },
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_kind("struct enum variants"))
    }
}

/// Unrolls a top-level sequence: every element is itself a top-level value.
pub(crate) struct RootSeq<'a> {
    session: &'a mut Session,
}

impl RootSeq<'_> {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(RootSerializer {
            session: &mut *self.session,
            nested: true,
        })
    }
}

impl ser::SerializeSeq for RootSeq<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTuple for RootSeq<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for RootSeq<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// A top-level record row; delegates to the regular record flow and
/// discards the resulting pointer.
pub(crate) struct RootStruct<'a> {
    inner: StructCells<'a>,
}

impl ser::SerializeStruct for RootStruct<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<()> {
        ser::SerializeStruct::end(self.inner).map(|_pointer| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_string;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Release {
        version: String,
        stable: bool,
    }

    #[derive(Serialize)]
    struct Lang {
        name: String,
        release: Release,
        tags: Vec<String>,
    }

    fn lang(name: &str, version: &str, stable: bool, tags: &[&str]) -> Lang {
        Lang {
            name: name.to_string(),
            release: Release {
                version: version.to_string(),
                stable,
            },
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn emits_the_expected_document() {
        let value = lang("Go", "1.25.3", true, &["go", "golang"]);
        let output = to_string(&value).unwrap();

        // sha1 of the default empty namespace
        let digest = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
        let expected = format!(
            "\n/** Lang&{digest}\n\
             H-> name;release;tags\n\
             0-> \"Go\";$Release&{digest}_0;$common-array_1:\n\
             \n/// Release&{digest}\n\
             H-> version;stable\n\
             0-> \"1.25.3\";true:\n\
             \n/// common-array\n\
             H-> \n\
             0-> |\n\
             1-> \"go\",\"golang\"|\n"
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn data_rows_are_indexed_from_zero() {
        let values = vec![
            lang("Go", "1.25.3", true, &["go"]),
            lang("Zig", "0.16.0", false, &["zig"]),
            lang("Rust", "1.88.0", true, &["rust"]),
        ];
        let output = to_string(&values).unwrap();

        assert!(output.contains("\n0-> \"Go\";"));
        assert!(output.contains("\n1-> \"Zig\";"));
        assert!(output.contains("\n2-> \"Rust\";"));
    }

    #[test]
    fn identical_rows_share_one_pointer() {
        let values = vec![
            lang("Go", "1.0.0", true, &["fast"]),
            lang("Zig", "1.0.0", true, &["fast"]),
        ];
        let output = to_string(&values).unwrap();

        assert_eq!(output.matches("\"1.0.0\";true:").count(), 1);
        assert_eq!(output.matches("\"fast\"|").count(), 1);
        assert_eq!(output.matches("$Release&").count(), 2);
    }

    #[test]
    fn compact_off_repeats_identical_rows() {
        let values = vec![lang("Go", "1.0.0", true, &[]), lang("Zig", "1.0.0", true, &[])];
        let output =
            crate::to_string_with_options(&values, EncodeOptions::new().with_compact(false))
                .unwrap();

        assert_eq!(output.matches("\"1.0.0\";true:").count(), 2);
        assert!(output.contains("$Release&da39a3ee5e6b4b0d3255bfef95601890afd80709_0"));
        assert!(output.contains("$Release&da39a3ee5e6b4b0d3255bfef95601890afd80709_1"));
    }

    #[test]
    fn empty_sequences_reuse_the_canonical_row() {
        let values = vec![lang("A", "1", true, &[]), lang("B", "2", true, &[])];
        let output = to_string(&values).unwrap();

        assert!(output.contains("/// common-array\nH-> \n0-> |\n"));
        assert_eq!(output.matches("$common-array_0").count(), 2);
        assert!(!output.contains("$common-array_1"));
    }

    #[test]
    fn namespace_changes_the_table_digest() {
        let value = lang("Go", "1", true, &[]);
        let output =
            crate::to_string_with_options(&value, EncodeOptions::new().with_namespace("models"))
                .unwrap();

        assert!(!output.contains("da39a3ee5e6b4b0d3255bfef95601890afd80709"));
        assert!(output.contains("/** Lang&"));
    }

    #[test]
    fn maps_cannot_be_root() {
        let mut map = std::collections::HashMap::new();
        map.insert("a".to_string(), 1);
        assert!(matches!(to_string(&map), Err(Error::InvalidRoot)));
    }

    #[test]
    fn nested_sequences_cannot_be_root() {
        let values = vec![vec![1, 2], vec![3]];
        assert!(matches!(to_string(&values), Err(Error::InvalidRoot)));
    }

    #[test]
    fn empty_input_renders_nothing() {
        let values: Vec<Lang> = Vec::new();
        assert_eq!(to_string(&values).unwrap(), "");
    }

    #[test]
    fn quoting_escapes_every_separator() {
        assert_eq!(quote("a;b,c=d|e^f:g"), "\"a;b,c=d|e^f:g\"");
        assert_eq!(quote("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(quote("back\\slash"), "\"back\\\\slash\"");
    }

    #[test]
    fn floats_always_carry_a_fraction() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(1.25), "1.25");
        assert_eq!(format_float(-0.5), "-0.5");
    }
}
