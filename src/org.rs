//! Org outline document model, parser and renderers
//!
//! ## Modules
//!
//! - `ast` - node tree definitions for parsed documents
//! - `parser` - line-based parser from org source to the node tree
//! - `render` - renderers from node subtrees back to org source / HTML

pub mod ast;
pub mod parser;
pub mod render;

pub use ast::{
    Block, DescriptiveListItem, Headline, List, ListItem, ListKind, Node, Paragraph, Text,
};
pub use parser::{parse, Document, ParseError};
pub use render::{to_html, to_org};
