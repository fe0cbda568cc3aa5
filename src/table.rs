//! Row and table model shared by the parser, encoder and decoder.
//!
//! A decoded document is a [`TableSet`]: tables keyed by their table key,
//! exactly one of them flagged as root. Each [`Table`] owns its data rows as
//! [`Group`]s; each group knows which row kind it came from, the column
//! headers of its table, and its cells.

use std::fmt;

use indexmap::IndexMap;

use crate::value::Node;

/// Row kind, derived from a row's closing character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Record row, one cell per column header.
    Str,
    /// Map row of `key=value` entries.
    Map,
    /// Array row of ordered cells.
    Arr,
    /// Single-scalar row.
    Obj,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Str => "STR",
            Category::Map => "MAP",
            Category::Arr => "ARR",
            Category::Obj => "OBJ",
        };
        f.write_str(name)
    }
}

/// Cells of one row, shaped by its [`Category`].
#[derive(Debug, Clone, PartialEq)]
pub enum GroupBody {
    Structure(Vec<Node>),
    Array(Vec<Node>),
    /// Entries in wire order; keys are the stringified key cells.
    Map(IndexMap<String, Node>),
    Object(Node),
}

/// One parsed data row.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    category: Category,
    headers: Vec<String>,
    body: GroupBody,
}

impl Group {
    pub(crate) fn new(category: Category, headers: Vec<String>, body: GroupBody) -> Self {
        Group {
            category,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Column headers of the owning table.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &GroupBody {
        &self.body
    }

    /// Looks up the cell under the given column header.
    ///
    /// Only rows with positional cells have columns; map and scalar rows
    /// always answer `None`. If two columns share a name the first wins.
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<&Node> {
        let nodes = match &self.body {
            GroupBody::Structure(nodes) | GroupBody::Array(nodes) => nodes,
            _ => return None,
        };
        let index = self.headers.iter().position(|header| header == name)?;
        nodes.get(index)
    }

    /// All cells as `(key, node)` pairs.
    ///
    /// Map rows yield their entries in wire order; positional rows yield
    /// their cells keyed by stringified index; scalar rows yield nothing.
    #[must_use]
    pub fn find_fields(&self) -> Vec<(String, &Node)> {
        match &self.body {
            GroupBody::Map(entries) => entries.iter().map(|(k, v)| (k.clone(), v)).collect(),
            GroupBody::Structure(nodes) | GroupBody::Array(nodes) => nodes
                .iter()
                .enumerate()
                .map(|(i, node)| (i.to_string(), node))
                .collect(),
            GroupBody::Object(_) => Vec::new(),
        }
    }

    /// The sole cell of a scalar row.
    #[must_use]
    pub fn find_value(&self) -> Option<&Node> {
        match &self.body {
            GroupBody::Object(node) => Some(node),
            _ => None,
        }
    }

    /// Cells in row order, without keys. Map rows yield their values.
    pub(crate) fn nodes(&self) -> Vec<&Node> {
        match &self.body {
            GroupBody::Structure(nodes) | GroupBody::Array(nodes) => nodes.iter().collect(),
            GroupBody::Map(entries) => entries.values().collect(),
            GroupBody::Object(_) => Vec::new(),
        }
    }
}

/// One table: a key, a root flag and its data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    key: String,
    root: bool,
    groups: Vec<Group>,
}

impl Table {
    pub(crate) fn new(key: String, root: bool, groups: Vec<Group>) -> Self {
        Table { key, root, groups }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Fetches the data row at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub(crate) fn groups(&self) -> &[Group] {
        &self.groups
    }
}

/// All tables of one document, keyed by table key.
///
/// ```rust
/// use serde_csvt::read;
///
/// let set = read("/** Point&0\nH-> x;y\n0-> 1;2:\n").unwrap();
/// let root = set.root().unwrap();
/// assert_eq!(root.key(), "Point&0");
/// assert_eq!(root.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSet {
    tables: IndexMap<String, Table>,
}

impl TableSet {
    #[must_use]
    pub fn new() -> Self {
        TableSet::default()
    }

    pub(crate) fn insert(&mut self, table: Table) {
        self.tables.insert(table.key.clone(), table);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Table> {
        self.tables.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// The table flagged as root, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Table> {
        self.tables.values().find(|table| table.root)
    }

    /// Resolves a pointer to the row it references.
    #[must_use]
    pub fn find(&self, key: &str, index: usize) -> Option<&Group> {
        self.tables.get(key)?.groups.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    fn record(headers: &[&str], nodes: Vec<Node>) -> Group {
        Group::new(
            Category::Str,
            headers.iter().map(|h| h.to_string()).collect(),
            GroupBody::Structure(nodes),
        )
    }

    #[test]
    fn find_field_follows_header_position() {
        let group = record(
            &["name", "stable"],
            vec![
                Node::Scalar(Scalar::Str("Go".to_string())),
                Node::Scalar(Scalar::Bool(true)),
            ],
        );

        assert_eq!(
            group.find_field("stable"),
            Some(&Node::Scalar(Scalar::Bool(true)))
        );
        assert_eq!(group.find_field("release"), None);
    }

    #[test]
    fn find_field_prefers_the_first_duplicate_header() {
        let group = record(
            &["name", "name"],
            vec![
                Node::Scalar(Scalar::Str("first".to_string())),
                Node::Scalar(Scalar::Str("second".to_string())),
            ],
        );

        assert_eq!(
            group.find_field("name"),
            Some(&Node::Scalar(Scalar::Str("first".to_string())))
        );
    }

    #[test]
    fn find_fields_keys_positional_rows_by_index() {
        let group = Group::new(
            Category::Arr,
            Vec::new(),
            GroupBody::Array(vec![
                Node::Scalar(Scalar::Int(10)),
                Node::Scalar(Scalar::Int(20)),
            ]),
        );

        let fields = group.find_fields();
        assert_eq!(fields[0].0, "0");
        assert_eq!(fields[1].0, "1");
    }

    #[test]
    fn pointer_resolution_requires_table_and_row() {
        let mut set = TableSet::new();
        set.insert(Table::new("common-array".to_string(), false, vec![
            Group::new(Category::Arr, Vec::new(), GroupBody::Array(Vec::new())),
        ]));

        assert!(set.find("common-array", 0).is_some());
        assert!(set.find("common-array", 1).is_none());
        assert!(set.find("common-map", 0).is_none());
    }
}
