//! Database Table schema: the `FieldNode` tree built from dotted header paths.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::names::{field_name, type_name};
use crate::tokenizer::unescape;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type name used when a type cell is blank or missing.
pub const DEFAULT_TYPE: &str = "string";

static ARRAY_DECL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+?)\[(.*)\]$").unwrap());

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrayKind {
    /// Scalar field.
    #[default]
    None,
    /// All values in one cell, split by a delimiter.
    OneCell,
    /// One value per row.
    Multicell,
}

impl ArrayKind {
    pub fn is_array(&self) -> bool {
        !matches!(self, ArrayKind::None)
    }
}

/// A parsed type cell such as `int`, `string[|]` or `Reward:Items[]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub base: String,
    pub custom_type: Option<String>,
    pub array: ArrayKind,
    pub delimiter: Option<String>,
}

impl TypeDecl {
    /// Parse a type cell. A blank cell reads as `string`.
    ///
    /// With `allow_custom`, `Custom:type` / `Custom.type` attach a record type
    /// name to the enclosing nested record.
    pub fn parse(raw: &str, allow_custom: bool) -> Self {
        let mut text = raw.trim();
        let mut custom_type = None;

        if allow_custom {
            // separators inside `[...]` belong to the delimiter
            let head = text.split('[').next().unwrap_or("");
            if let Some(idx) = head.find(['.', ':']) {
                custom_type = Some(type_name(&text[..idx]));
                text = text[idx + 1..].trim();
            }
        }

        if text.is_empty() {
            text = DEFAULT_TYPE;
        }

        let (base, array, delimiter) = match ARRAY_DECL.captures(text) {
            Some(caps) => {
                let base = caps.get(1).map_or("", |m| m.as_str());
                let inner = caps.get(2).map_or("", |m| m.as_str());
                if inner.is_empty() {
                    (base, ArrayKind::Multicell, None)
                } else {
                    (base, ArrayKind::OneCell, Some(parse_delimiter(inner)))
                }
            }
            None => (text, ArrayKind::None, None),
        };

        Self {
            base: type_name(base),
            custom_type,
            array,
            delimiter,
        }
    }

    pub fn tokenizer(&self) -> crate::Tokenizer {
        cell_tokenizer(self.array, self.delimiter.as_deref())
    }
}

/// Only one-cell arrays with a delimiter split their cell.
fn cell_tokenizer(array: ArrayKind, delimiter: Option<&str>) -> crate::Tokenizer {
    match (array, delimiter) {
        (ArrayKind::OneCell, Some(d)) => crate::Tokenizer::new(d),
        _ => crate::Tokenizer::whole(),
    }
}

/// `|` stays `|`; `"\n"` becomes a newline.
fn parse_delimiter(inner: &str) -> String {
    let unquoted = if inner.len() >= 2 && inner.starts_with('"') && inner.ends_with('"') {
        &inner[1..inner.len() - 1]
    } else {
        inner
    };
    unescape(unquoted)
}

/// One node of a Database Table schema. Leaves are columns; inner nodes are
/// nested record arrays built from dotted paths (`Rewards.Item`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldNode {
    pub name: String,
    pub base_type: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub custom_type: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub array: ArrayKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub delimiter: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub comment: Option<String>,
    pub column: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<FieldNode>,
}

impl FieldNode {
    pub fn root(table: &str, column: u32) -> Self {
        Self {
            name: "Root".to_string(),
            base_type: table.to_string(),
            column,
            ..Default::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&FieldNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &FieldNode> {
        self.children.iter().filter(|c| c.is_leaf())
    }

    pub fn containers(&self) -> impl Iterator<Item = &FieldNode> {
        self.children.iter().filter(|c| !c.is_leaf())
    }

    /// Type as written in the grid after normalization, e.g. `Int[]`.
    pub fn type_spec(&self) -> String {
        if self.array.is_array() {
            format!("{}[]", self.base_type)
        } else {
            self.base_type.clone()
        }
    }

    pub fn tokenizer(&self) -> crate::Tokenizer {
        cell_tokenizer(self.array, self.delimiter.as_deref())
    }

    /// Fold one header column into the tree.
    ///
    /// Intermediate segments descend into an existing same-named container
    /// (or create one); the final segment always becomes a new leaf, so a
    /// repeated column name shows up as a duplicate sibling.
    pub fn insert_path(&mut self, path: &[String], decl: &TypeDecl, column: u32, comment: Option<String>) {
        let Some((head, rest)) = path.split_first() else {
            return;
        };

        if rest.is_empty() {
            self.children.push(FieldNode {
                name: head.clone(),
                base_type: decl.base.clone(),
                custom_type: decl.custom_type.clone(),
                array: decl.array,
                delimiter: decl.delimiter.clone(),
                comment,
                column,
                children: Vec::new(),
            });
            return;
        }

        let idx = match self
            .children
            .iter()
            .position(|c| c.name == *head && !c.is_leaf())
        {
            Some(idx) => idx,
            None => {
                self.children.push(FieldNode {
                    name: head.clone(),
                    column,
                    ..Default::default()
                });
                self.children.len() - 1
            }
        };
        self.children[idx].insert_path(rest, decl, column, comment);
    }

    /// Stable reorder: leaves before containers, recursively.
    pub fn sort_leaves_first(&mut self) {
        self.children.sort_by_key(|c| !c.is_leaf());
        for child in &mut self.children {
            child.sort_leaves_first();
        }
    }

    /// Back-fill empty container types bottom-up: the first child's custom
    /// type, else the container's own field name.
    pub fn fill_base_types(&mut self) {
        let mut child_custom = None;
        for child in &mut self.children {
            child.fill_base_types();
            if child_custom.is_none() {
                child_custom = child.custom_type.clone();
            }
        }
        if self.base_type.trim().is_empty() {
            self.base_type = child_custom.unwrap_or_else(|| self.name.clone());
        }
    }
}

/// Split a header cell on `.` and normalize every segment.
pub fn header_path(raw: &str) -> Vec<String> {
    raw.split('.').map(field_name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_decls() {
        let d = TypeDecl::parse("int", false);
        assert_eq!((d.base.as_str(), d.array), ("Int", ArrayKind::None));

        let d = TypeDecl::parse("", false);
        assert_eq!(d.base, "String");

        let d = TypeDecl::parse("float[]", false);
        assert_eq!(d.array, ArrayKind::Multicell);
        assert_eq!(d.delimiter, None);

        let d = TypeDecl::parse("int[,]", false);
        assert_eq!(d.array, ArrayKind::OneCell);
        assert_eq!(d.delimiter.as_deref(), Some(","));

        let d = TypeDecl::parse(r#"string["|"]"#, false);
        assert_eq!(d.delimiter.as_deref(), Some("|"));

        let d = TypeDecl::parse(r#"string["\n"]"#, false);
        assert_eq!(d.delimiter.as_deref(), Some("\n"));
    }

    #[test]
    fn custom_type_prefix() {
        let d = TypeDecl::parse("Reward:int", true);
        assert_eq!(d.custom_type.as_deref(), Some("Reward"));
        assert_eq!(d.base, "Int");

        let d = TypeDecl::parse("loot drop.string[]", true);
        assert_eq!(d.custom_type.as_deref(), Some("LootDrop"));
        assert_eq!(d.array, ArrayKind::Multicell);

        let d = TypeDecl::parse("Reward:int", false);
        assert_eq!(d.custom_type, None);
    }

    #[test]
    fn tree_folding_and_ordering() {
        let mut root = FieldNode::root("Bots", 0);
        let int = TypeDecl::parse("int", true);
        let reward = TypeDecl::parse("Reward:string", true);
        root.insert_path(&header_path("id"), &int, 0, None);
        root.insert_path(&header_path("rewards.name"), &reward, 1, None);
        root.insert_path(&header_path("hp"), &int, 2, Some("health".into()));
        root.insert_path(&header_path("rewards.count"), &int, 3, None);
        root.sort_leaves_first();
        root.fill_base_types();

        let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Hp", "Rewards"]);
        let rewards = root.child("Rewards").unwrap();
        assert_eq!(rewards.children.len(), 2);
        assert_eq!(rewards.base_type, "Reward");
        assert_eq!(rewards.column, 1);
        assert_eq!(root.base_type, "Bots");
    }

    #[test]
    fn container_without_custom_type_uses_field_name() {
        let mut root = FieldNode::root("Bots", 0);
        let int = TypeDecl::parse("int", true);
        root.insert_path(&header_path("stats.attack"), &int, 1, None);
        root.fill_base_types();
        assert_eq!(root.child("Stats").unwrap().base_type, "Stats");
    }

    #[test]
    fn repeated_leaf_is_kept_as_duplicate() {
        let mut root = FieldNode::root("T", 0);
        let s = TypeDecl::parse("", true);
        root.insert_path(&header_path("name"), &s, 1, None);
        root.insert_path(&header_path("name"), &s, 2, None);
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn leaf_tokenizer_matches_declaration() {
        let mut root = FieldNode::root("T", 0);
        let one_cell = TypeDecl::parse("int[,]", true);
        let multicell = TypeDecl::parse("int[]", true);
        root.insert_path(&header_path("xs"), &one_cell, 1, None);
        root.insert_path(&header_path("ys"), &multicell, 2, None);

        let xs = root.child("Xs").unwrap().tokenizer();
        assert_eq!(xs.tokenize("1, 2,3"), one_cell.tokenizer().tokenize("1, 2,3"));
        assert_eq!(xs.tokenize("1, 2,3"), vec!["1", "2", "3"]);

        let ys = root.child("Ys").unwrap().tokenizer();
        assert_eq!(ys.tokenize("1, 2"), vec!["1, 2"]);
    }
}
