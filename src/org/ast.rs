//! Node tree for parsed org outline documents
//!
//! The org surface syntax is deliberately small: titled sections
//! (headlines, optionally tagged), plain and descriptive lists, raw
//! blocks and paragraphs of text. All structure in a document comes
//! from nesting those few shapes.
//!
//! Node sequences are produced by the parser and consumed read-only by
//! the decoder; nothing in this crate mutates a tree after parsing.
//!
//! Examples:
//!    A tagged headline with a descriptive list underneath:
//!        * General :general:
//!        - FirstName :: Ada
//!    A plain list:
//!        - Bread
//!        - Milk

use crate::org::render;
use serde::Serialize;
use std::fmt;

/// One element of a parsed document tree.
///
/// List items appear only inside [`List::items`], but they are ordinary
/// `Node`s so that mixed lists survive parsing; the decoder rejects the
/// mixes it cannot use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    Headline(Headline),
    List(List),
    ListItem(ListItem),
    DescriptiveListItem(DescriptiveListItem),
    Paragraph(Paragraph),
    Text(Text),
    Block(Block),
}

/// A titled section: `** Title :tag1:tag2:` followed by nested content.
///
/// `level` is the number of leading stars. Everything up to the next
/// headline of the same or a shallower level belongs to `children`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub level: usize,
    pub title: Vec<Node>,
    pub tags: Vec<String>,
    pub children: Vec<Node>,
}

/// Ordering/shape of a list, taken from its first item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListKind {
    Ordered,
    Unordered,
    Descriptive,
}

/// A list of items sharing one indentation level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<Node>,
}

/// A plain list item: `- item text` plus any indented continuation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub children: Vec<Node>,
}

/// A term/details item of a descriptive list: `- term :: details`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveListItem {
    pub term: Vec<Node>,
    pub details: Vec<Node>,
}

/// Consecutive lines of plain text. A blank source line parses into an
/// empty paragraph, which is what the decoder's blank filter drops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub children: Vec<Node>,
}

/// A single line (or inline run) of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub content: String,
}

/// A raw `#+BEGIN_X` / `#+END_X` block; contents are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub name: String,
    pub lines: Vec<String>,
}

impl Node {
    /// Human-readable node kind, used in error messages.
    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Headline(_) => "headline",
            Node::List(_) => "list",
            Node::ListItem(_) => "list item",
            Node::DescriptiveListItem(_) => "descriptive list item",
            Node::Paragraph(_) => "paragraph",
            Node::Text(_) => "text",
            Node::Block(_) => "block",
        }
    }
}

/// Displays as the node's org-source rendering; error messages rely on
/// this to name offending nodes.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::to_org(std::slice::from_ref(self)))
    }
}
