//! Text to table-set parsing.
//!
//! [`read`] splits the input into tables, each table into rows, and each row
//! into cells, producing the [`TableSet`] the decoder materializes values
//! from. The splitter is a line state machine: a `/**` or `///` header line
//! opens a table (closing any table still open, even without a blank line in
//! between), a blank line closes it, and anything before the first header is
//! ignored.
//!
//! Cell tokenization is quote-aware. A cell starting with `"` runs to its
//! closing quote — `\"` and `\\` are skipped over, so separator characters
//! inside string literals never split a cell — and must be followed by a
//! separator or the end of the row body.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::spec::{
    ARR_CLOSING, ARR_SEPARATOR, HEADER_REGULAR, HEADER_ROOT, HEADER_SEPARATOR, MAP_CLOSING,
    MAP_LINKER, MAP_SEPARATOR, PTR_HEADER, PTR_SEPARATOR, ROW_ARROW, STR_CLOSING, STR_SEPARATOR,
};
use crate::table::{Category, Group, GroupBody, Table, TableSet};
use crate::value::{Node, Scalar};

/// Parses a CSVT document into its table set.
///
/// ```rust
/// use serde_csvt::read;
///
/// let input = "/** Release&0\nH-> version;stable\n0-> \"1.25.3\";true:\n";
/// let set = read(input).unwrap();
///
/// assert_eq!(set.root().unwrap().key(), "Release&0");
/// ```
///
/// # Errors
///
/// Returns an error when a table is missing its header row, a row is
/// structurally broken, or a cell cannot be classified.
pub fn read(input: &str) -> Result<TableSet> {
    let normalized = input.replace("\r\n", "\n");

    let mut set = TableSet::new();
    let mut current: Option<Vec<&str>> = None;

    for line in normalized.split('\n') {
        if line.starts_with(HEADER_ROOT) || line.starts_with(HEADER_REGULAR) {
            if let Some(lines) = current.take() {
                set.insert(parse_table(&lines)?);
            }
            current = Some(vec![line]);
        } else if line.trim().is_empty() {
            if let Some(lines) = current.take() {
                set.insert(parse_table(&lines)?);
            }
        } else if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
    }
    if let Some(lines) = current.take() {
        set.insert(parse_table(&lines)?);
    }

    Ok(set)
}

fn parse_table(lines: &[&str]) -> Result<Table> {
    let first = lines[0];
    let root = first.starts_with(HEADER_ROOT);
    let key = first[HEADER_ROOT.len()..]
        .strip_prefix(' ')
        .unwrap_or(&first[HEADER_ROOT.len()..])
        .to_string();

    let Some(header_line) = lines.get(1) else {
        return Err(Error::malformed_row(format!(
            "table \"{key}\" is missing its header row"
        )));
    };
    let headers = parse_headers(header_line);

    let mut groups = Vec::new();
    for line in &lines[2..] {
        groups.push(parse_row(line, &headers)?);
    }

    Ok(Table::new(key, root, groups))
}

fn parse_headers(line: &str) -> Vec<String> {
    let row = strip_label(line);
    if row.is_empty() {
        return Vec::new();
    }
    row.split(HEADER_SEPARATOR).map(str::to_string).collect()
}

/// Removes a leading `<alphanumeric>-> ` row label, if present.
fn strip_label(line: &str) -> &str {
    if let Some((label, rest)) = line.split_once(ROW_ARROW) {
        if !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric()) {
            return rest;
        }
    }
    line
}

fn parse_row(line: &str, headers: &[String]) -> Result<Group> {
    let row = strip_label(line);
    let category = category_of(row, !headers.is_empty());

    let body = match category {
        Category::Map => GroupBody::Map(parse_map(row)?),
        Category::Arr => GroupBody::Array(parse_list(row, ARR_SEPARATOR, ARR_CLOSING)?),
        Category::Str => GroupBody::Structure(parse_list(row, STR_SEPARATOR, STR_CLOSING)?),
        Category::Obj => GroupBody::Object(parse_scalar(row)?),
    };

    Ok(Group::new(category, headers.to_vec(), body))
}

fn category_of(row: &str, has_headers: bool) -> Category {
    match row.chars().last() {
        Some(c) if c == ARR_CLOSING => Category::Arr,
        Some(c) if c == MAP_CLOSING => Category::Map,
        Some(c) if c == STR_CLOSING => Category::Str,
        _ if has_headers => Category::Str,
        _ => Category::Obj,
    }
}

fn parse_map(row: &str) -> Result<IndexMap<String, Node>> {
    let Some(body) = row.strip_suffix(MAP_CLOSING) else {
        return Err(Error::malformed_row("invalid map closing character"));
    };

    let mut entries = IndexMap::new();
    let mut rest = body;
    while !rest.is_empty() {
        let (key_cell, after_key) = next_cell(rest, MAP_LINKER)?;
        let Some(after_key) = after_key else {
            return Err(Error::malformed_row(format!(
                "map entry \"{key_cell}\" has no value"
            )));
        };
        let key = parse_scalar(key_cell)?.key();

        let (value_cell, after_value) = next_cell(after_key, MAP_SEPARATOR)?;
        entries.insert(key, parse_scalar(value_cell)?);
        rest = after_value.unwrap_or("");
    }

    Ok(entries)
}

fn parse_list(row: &str, separator: char, closing: char) -> Result<Vec<Node>> {
    if row.is_empty() {
        return Ok(Vec::new());
    }
    let Some(body) = row.strip_suffix(closing) else {
        return Err(Error::malformed_row(format!(
            "invalid list closing character, expected '{closing}'"
        )));
    };

    let mut nodes = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        let (cell, remainder) = next_cell(rest, separator)?;
        nodes.push(parse_scalar(cell)?);
        rest = remainder.unwrap_or("");
    }

    Ok(nodes)
}

/// Splits the next cell off `buffer`.
///
/// Returns the cell text and the remainder after the separator, or `None`
/// when the buffer is exhausted.
fn next_cell(buffer: &str, separator: char) -> Result<(&str, Option<&str>)> {
    if buffer.starts_with('"') {
        let close = closing_quote(buffer)?;
        let end = close + 1;
        match buffer[end..].chars().next() {
            None => Ok((buffer, None)),
            Some(c) if c == separator => Ok((&buffer[..end], Some(&buffer[end + c.len_utf8()..]))),
            Some(c) => Err(Error::malformed_row(format!(
                "expected '{separator}' after quoted cell, found '{c}'"
            ))),
        }
    } else {
        match buffer.find(separator) {
            Some(i) => Ok((&buffer[..i], Some(&buffer[i + separator.len_utf8()..]))),
            None => Ok((buffer, None)),
        }
    }
}

/// Byte offset of the quote closing a cell that starts with `"`.
fn closing_quote(buffer: &str) -> Result<usize> {
    let bytes = buffer.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Ok(i),
            _ => i += 1,
        }
    }
    Err(Error::malformed_row("unterminated quoted string"))
}

/// Classifies a single cell.
pub(crate) fn parse_scalar(cell: &str) -> Result<Node> {
    if cell.is_empty() {
        return Ok(Node::empty());
    }

    if let Some(body) = cell.strip_prefix(PTR_HEADER) {
        let Some((key, index)) = body.rsplit_once(PTR_SEPARATOR) else {
            return Err(Error::malformed_row(format!(
                "pointer \"{cell}\" is missing its index"
            )));
        };
        let index: usize = index.parse().map_err(|_| {
            Error::malformed_row(format!("pointer index \"{index}\" is not a number"))
        })?;
        return Ok(Node::Pointer {
            key: key.to_string(),
            index,
        });
    }

    if cell.len() >= 2 && cell.starts_with('"') && cell.ends_with('"') {
        return Ok(Node::Scalar(Scalar::Str(unescape(
            &cell[1..cell.len() - 1],
        ))));
    }

    if cell.eq_ignore_ascii_case("true") {
        return Ok(Node::Scalar(Scalar::Bool(true)));
    }
    if cell.eq_ignore_ascii_case("false") {
        return Ok(Node::Scalar(Scalar::Bool(false)));
    }

    if cell.contains('.') {
        if let Ok(v) = cell.parse::<f64>() {
            return Ok(Node::Scalar(Scalar::Float(v)));
        }
    }
    if let Ok(v) = cell.parse::<i64>() {
        return Ok(Node::Scalar(Scalar::Int(v)));
    }

    Err(Error::unrecognized_scalar(cell))
}

/// Decodes the escapes of a quoted string body.
///
/// `\'` is the legacy spelling of the escaped quote and decodes to `"`.
/// Unknown escapes are kept literally.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
