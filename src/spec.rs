//! CSVT wire format reference.
//!
//! CSVT (comma-separated-value tables) is a plain-text, multi-table format
//! for directed acyclic graphs of records, maps, arrays and scalars. Instead
//! of nesting composite values inline, every composite is stored as one row
//! of a per-type table and referenced from its parent through a pointer
//! token, which lets identical substructures share a single row.
//!
//! # Document layout
//!
//! A document is a sequence of tables separated by blank lines. Each table
//! starts with a header line, followed by a column-header row and zero or
//! more data rows:
//!
//! ```text
//! /** Lang&da39a3ee5e6b4b0d3255bfef95601890afd80709
//! H-> name;release;tags
//! 0-> "Go";$Release&da39a3ee5e6b4b0d3255bfef95601890afd80709_0;$common-array_1:
//!
//! /// Release&da39a3ee5e6b4b0d3255bfef95601890afd80709
//! H-> version;stable
//! 0-> "1.25.3";true:
//!
//! /// common-array
//! H->
//! 0-> |
//! 1-> "go","golang"|
//! ```
//!
//! The table introduced with `/**` is the *root* table and holds the
//! top-level values; every other table uses `///`. The `H-> ` row carries
//! the record field names joined by `;` and is empty for the shared
//! `common-array` and `common-map` tables. Data rows are labelled with their
//! zero-based index.
//!
//! # Rows
//!
//! The closing character of a row decides what it encodes:
//!
//! | Row kind | Separator | Closing | Example |
//! |---|---|---|---|
//! | record    | `;` | `:` | `"Go";$Release&…_0:` |
//! | map       | `,` (entries are `key=value`) | `^` | `"oop"="some","functional"="false"^` |
//! | array     | `,` | `\|` | `"go","golang"\|` |
//! | scalar    | none | none | `"hello"` |
//!
//! A row with no closing character in a table without column headers holds a
//! single scalar value.
//!
//! # Cells
//!
//! A cell is either a scalar literal or a pointer:
//!
//! * `"…"` — string, always quoted. `\\`, `\"`, `\n`, `\r`, `\t`, `\b` and
//!   `\f` are recognized escapes; `\'` is accepted as a legacy spelling of
//!   the escaped quote.
//! * `true` / `false` — boolean (case-insensitive on read).
//! * digits with a `.` — 64-bit float; without — 64-bit signed integer.
//! * `$<table-key>_<index>` — pointer to data row `<index>` of table
//!   `<table-key>`. Indices count data rows only; the column-header row is
//!   excluded.
//! * the empty cell — the empty string.
//!
//! # Table keys
//!
//! Record tables are keyed `Name&<sha1-hex(namespace)>`. All maps share the
//! single `common-map` table and all sequences the single `common-array`
//! table, regardless of their element types. Canonical empty rows (`^`, `|`
//! and `""`) are placed right after the header of tables whose kind can be
//! empty, so every empty map, sequence or string resolves to one shared row.

/// Separator between field names in a record header row.
pub const HEADER_SEPARATOR: char = ';';
/// Separator between map entries.
pub const MAP_SEPARATOR: char = ',';
/// Links a map key to its value.
pub const MAP_LINKER: char = '=';
/// Closing marker of a map row.
pub const MAP_CLOSING: char = '^';
/// Separator between array elements.
pub const ARR_SEPARATOR: char = ',';
/// Closing marker of an array row.
pub const ARR_CLOSING: char = '|';
/// Separator between record fields.
pub const STR_SEPARATOR: char = ';';
/// Closing marker of a record row.
pub const STR_CLOSING: char = ':';
/// First character of a pointer cell.
pub const PTR_HEADER: char = '$';
/// Separates a pointer's table key from its row index.
pub const PTR_SEPARATOR: char = '_';
/// Row label of the column-header row.
pub const TBL_INDEX_HEAD: char = 'H';

/// Header-line prefix of the root table.
pub const HEADER_ROOT: &str = "/**";
/// Header-line prefix of every non-root table.
pub const HEADER_REGULAR: &str = "///";
/// Arrow between a row label and the row body.
pub const ROW_ARROW: &str = "-> ";

/// Table key shared by all encoded sequences.
pub const COMMON_ARRAY: &str = "common-array";
/// Table key shared by all encoded maps.
pub const COMMON_MAP: &str = "common-map";
