//! # serde_csvt
//!
//! A Serde-compatible serialization library for CSVT, a tabular multi-table
//! text format in which repeated substructures are written once and shared
//! by reference.
//!
//! ## What is CSVT?
//!
//! CSVT normalizes a value graph into per-type tables. Every record type
//! gets its own table; all maps share one `common-map` table and all
//! sequences one `common-array` table. Composite cells hold pointers
//! (`$<table-key>_<row>`) instead of inline data, so two records with the
//! same tags, the same attributes or the same nested record reference the
//! same row instead of repeating it.
//!
//! ## Key features
//!
//! - **Row deduplication**: identical rows are stored once per document
//!   (compact mode, on by default)
//! - **Serde compatible**: works with `#[derive(Serialize, Deserialize)]`;
//!   `#[serde(rename = "...")]` renames columns
//! - **Strict or lenient decoding**: missing columns either fail fast or
//!   leave fields zero-valued
//! - **No unsafe code**
//!
//! ## Quick start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_csvt::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Release {
//!     version: String,
//!     stable: bool,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Lang {
//!     name: String,
//!     release: Release,
//!     tags: Vec<String>,
//! }
//!
//! let lang = Lang {
//!     name: "Go".to_string(),
//!     release: Release { version: "1.25.3".to_string(), stable: true },
//!     tags: vec!["go".to_string(), "golang".to_string()],
//! };
//!
//! let document = to_string(&lang).unwrap();
//! assert!(document.starts_with("\n/** Lang&"));
//!
//! let back: Lang = from_str(&document).unwrap();
//! assert_eq!(back, lang);
//! ```
//!
//! ## Several top-level values
//!
//! A `Vec` of records becomes one data row per element in the root table,
//! and decodes back into a `Vec`:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_csvt::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point { x: i64, y: i64 }
//!
//! let points = vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }];
//! let document = to_string(&points).unwrap();
//! let back: Vec<Point> = from_str(&document).unwrap();
//! assert_eq!(back, points);
//! ```
//!
//! ## Options
//!
//! ```rust
//! use serde::Serialize;
//! use serde_csvt::{to_string_with_options, EncodeOptions};
//!
//! #[derive(Serialize)]
//! struct Entry { id: u32 }
//!
//! // keep every row, even duplicates
//! let options = EncodeOptions::new().with_compact(false);
//! let document = to_string_with_options(&Entry { id: 1 }, options).unwrap();
//! assert!(document.contains("/** Entry&"));
//! ```
//!
//! The wire format itself is documented in the [`spec`] module.

pub mod de;
pub mod error;
pub mod options;
pub mod parser;
pub mod ser;
pub mod spec;
pub mod table;
pub mod value;

pub use de::Deserializer;
pub use error::{Error, Result};
pub use options::{DecodeOptions, EncodeOptions};
pub use parser::read;
pub use ser::Serializer;
pub use table::{Category, Group, GroupBody, Table, TableSet};
pub use value::{Node, Scalar};

use serde::{Deserialize, Serialize};
use std::io;

/// Serializes any `T: Serialize` to a CSVT string.
///
/// The value must be a record or a sequence of records (each element of a
/// top-level sequence becomes one root-table row). Scalars are accepted and
/// land in a single-column table; maps and nested sequences cannot be the
/// top-level value.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_csvt::to_string;
///
/// #[derive(Serialize)]
/// struct Point { x: i64, y: i64 }
///
/// let document = to_string(&Point { x: 1, y: 2 }).unwrap();
/// assert!(document.contains("H-> x;y"));
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidRoot`] for a map or nested-sequence root, and
/// [`Error::UnsupportedKind`] for values the format cannot represent.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, EncodeOptions::default())
}

/// Serializes any `T: Serialize` to a CSVT string with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: EncodeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new(options);
    serializer.serialize(value)?;
    Ok(serializer.into_string())
}

/// Serializes any `T: Serialize` to CSVT bytes.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_string(value).map(String::into_bytes)
}

/// Serializes any `T: Serialize` to a writer in CSVT format.
///
/// # Errors
///
/// Returns an error if serialization fails or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, EncodeOptions::default())
}

/// Serializes any `T: Serialize` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: EncodeOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let document = to_string_with_options(value, options)?;
    writer
        .write_all(document.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserializes an instance of `T` from a CSVT string.
///
/// A sequence target collects one element per root-table data row; any
/// other target materializes from the root table's first row.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_csvt::from_str;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i64, y: i64 }
///
/// let document = "/** Point&0\nH-> x;y\n0-> 1;2:\n";
/// let point: Point = from_str(document).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid CSVT or cannot be
/// deserialized to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<'a, T>(input: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    from_str_with_options(input, DecodeOptions::default())
}

/// Deserializes an instance of `T` from a CSVT string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_csvt::{from_str_with_options, DecodeOptions, Error};
///
/// #[derive(Deserialize, Debug)]
/// struct Release { version: String, stable: bool }
///
/// let document = "/** Release&0\nH-> version\n0-> \"1.0\":\n";
/// let strict = DecodeOptions::new().with_strict(true);
/// let result: Result<Release, Error> = from_str_with_options(document, strict);
/// assert!(matches!(result, Err(Error::MissingField { .. })));
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid CSVT, a declared field is
/// missing under strict mode, or a cell cannot be converted to its target.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<'a, T>(input: &'a str, options: DecodeOptions) -> Result<T>
where
    T: Deserialize<'a>,
{
    let deserializer = Deserializer::from_str_with_options(input, options)?;
    T::deserialize(&deserializer)
}

/// Deserializes an instance of `T` from CSVT bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not valid CSVT.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(bytes: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    from_slice_with_options(bytes, DecodeOptions::default())
}

/// Deserializes an instance of `T` from CSVT bytes with custom options.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not valid CSVT.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<'a, T>(bytes: &'a [u8], options: DecodeOptions) -> Result<T>
where
    T: Deserialize<'a>,
{
    let input = std::str::from_utf8(bytes).map_err(|e| Error::custom(e.to_string()))?;
    from_str_with_options(input, options)
}

/// Deserializes an instance of `T` from an I/O stream of CSVT.
///
/// # Errors
///
/// Returns an error if reading fails or the content is not valid CSVT.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: for<'de> Deserialize<'de>,
{
    from_reader_with_options(reader, DecodeOptions::default())
}

/// Deserializes an instance of `T` from an I/O stream with custom options.
///
/// # Errors
///
/// Returns an error if reading fails or the content is not valid CSVT.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R, T>(mut reader: R, options: DecodeOptions) -> Result<T>
where
    R: io::Read,
    T: for<'de> Deserialize<'de>,
{
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str_with_options(&input, options)
}
