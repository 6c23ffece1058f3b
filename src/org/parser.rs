//! Line-based parser for org outline documents
//!
//! Classifies each source line with a regex pattern and assembles the
//! node tree with a cursor over the line list:
//! - `^*+ title :tags:` starts a headline; deeper stars nest under it
//! - an indented bullet (`-`, `+`, `1.`, `1)`) starts a list item; a
//!   ` :: ` separator in the item text makes it a descriptive item
//! - `#+BEGIN_X` .. `#+END_X` delimit a raw block
//! - blank lines become empty paragraphs (the decoder filters them)
//! - everything else accumulates into paragraphs
//!
//! Lines indented past a list item's bullet continue that item and are
//! re-parsed as a nested fragment, so items can hold multi-line text
//! and nested lists.

use crate::org::ast::{
    Block, DescriptiveListItem, Headline, List, ListItem, ListKind, Node, Paragraph, Text,
};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static HEADLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\*+)\s+(.*?)(?:\s+(:(?:[\w@#%]+:)+))?\s*$").unwrap());
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)([-+]|\d+[.)])\s+(.*)$").unwrap());
static DESCRIPTIVE_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s+::(?:\s+(.*))?$").unwrap());
static BLOCK_BEGIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*#\+BEGIN_(\w+)\s*$").unwrap());

/// A parsed document: the root node sequence plus the source identifier
/// used in error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: String,
    pub nodes: Vec<Node>,
}

/// Error raised while parsing, located by source path and line number.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub path: String,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path, self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse org source into a document tree.
pub fn parse(source: &str, path: &str) -> Result<Document, ParseError> {
    let mut parser = Parser {
        path,
        lines: source.lines().collect(),
        pos: 0,
        line_offset: 0,
    };
    let nodes = parser.parse_section_body(0)?;
    debug!("parsed {}: {} top-level nodes", path, nodes.len());
    Ok(Document {
        path: path.to_string(),
        nodes,
    })
}

/// Parse a dedented slice of a document (list item continuations).
fn parse_fragment(source: &str, path: &str, line_offset: usize) -> Result<Vec<Node>, ParseError> {
    let mut parser = Parser {
        path,
        lines: source.lines().collect(),
        pos: 0,
        line_offset,
    };
    parser.parse_section_body(0)
}

struct Parser<'a> {
    path: &'a str,
    lines: Vec<&'a str>,
    pos: usize,
    line_offset: usize,
}

impl<'a> Parser<'a> {
    /// Parse blocks until a headline of `level` or shallower.
    fn parse_section_body(&mut self, level: usize) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            if let Some(caps) = HEADLINE.captures(line) {
                let depth = caps[1].len();
                if depth <= level {
                    break;
                }
                let title = caps[2].trim().to_string();
                let tags = caps
                    .get(3)
                    .map(|m| {
                        m.as_str()
                            .trim_matches(':')
                            .split(':')
                            .map(str::to_string)
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                self.pos += 1;
                let children = self.parse_section_body(depth)?;
                nodes.push(Node::Headline(Headline {
                    level: depth,
                    title: vec![Node::Text(Text { content: title })],
                    tags,
                    children,
                }));
            } else if line.trim().is_empty() {
                while self.pos < self.lines.len() && self.lines[self.pos].trim().is_empty() {
                    self.pos += 1;
                }
                nodes.push(Node::Paragraph(Paragraph { children: vec![] }));
            } else if let Some(caps) = BLOCK_BEGIN.captures(line) {
                let name = caps[1].to_string();
                nodes.push(self.parse_block(&name)?);
            } else if let Some(caps) = LIST_ITEM.captures(line) {
                let indent = caps[1].len();
                nodes.push(self.parse_list(indent)?);
            } else {
                nodes.push(self.parse_paragraph());
            }
        }
        Ok(nodes)
    }

    fn parse_block(&mut self, name: &str) -> Result<Node, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let end_marker = format!("#+END_{}", name.to_uppercase());
        let mut lines = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            if line.trim().to_uppercase() == end_marker {
                self.pos += 1;
                return Ok(Node::Block(Block {
                    name: name.to_uppercase(),
                    lines,
                }));
            }
            lines.push(line.to_string());
            self.pos += 1;
        }
        Err(self.error(start, format!("unterminated #+BEGIN_{} block", name)))
    }

    /// Parse consecutive bullet lines at `indent` into one list.
    fn parse_list(&mut self, indent: usize) -> Result<Node, ParseError> {
        let mut items = Vec::new();
        let mut kind = None;
        while self.pos < self.lines.len() {
            let caps = match LIST_ITEM.captures(self.lines[self.pos]) {
                Some(caps) if caps[1].len() == indent => caps,
                _ => break,
            };
            let marker = caps[2].to_string();
            let text = caps[3].to_string();
            let item_line = self.pos;
            self.pos += 1;
            let continuation = self.take_item_continuation(indent, indent + marker.len() + 1);

            let item = match DESCRIPTIVE_ITEM.captures(&text) {
                Some(dcaps) => {
                    kind.get_or_insert(ListKind::Descriptive);
                    let term = dcaps[1].trim().to_string();
                    let mut fragment = Vec::new();
                    if let Some(details) = dcaps.get(2) {
                        if !details.as_str().trim().is_empty() {
                            fragment.push(details.as_str().to_string());
                        }
                    }
                    fragment.extend(continuation);
                    let details =
                        parse_fragment(&fragment.join("\n"), self.path, self.line_offset + item_line)?;
                    Node::DescriptiveListItem(DescriptiveListItem {
                        term: vec![Node::Text(Text { content: term })],
                        details,
                    })
                }
                None => {
                    kind.get_or_insert(if marker.starts_with(|c: char| c.is_ascii_digit()) {
                        ListKind::Ordered
                    } else {
                        ListKind::Unordered
                    });
                    let mut fragment = vec![text];
                    fragment.extend(continuation);
                    let children =
                        parse_fragment(&fragment.join("\n"), self.path, self.line_offset + item_line)?;
                    Node::ListItem(ListItem { children })
                }
            };
            items.push(item);
        }
        Ok(Node::List(List {
            kind: kind.unwrap_or(ListKind::Unordered),
            items,
        }))
    }

    /// Collect lines belonging to the item that started at `indent`,
    /// dedented by the item's content column. A blank line stays inside
    /// the item only when deeper-indented content follows it.
    fn take_item_continuation(&mut self, indent: usize, content_indent: usize) -> Vec<String> {
        let mut continuation = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            if line.trim().is_empty() {
                let next = self.lines[self.pos..]
                    .iter()
                    .find(|l| !l.trim().is_empty());
                match next {
                    Some(next) if leading_whitespace(next) > indent => {
                        continuation.push(String::new());
                        self.pos += 1;
                    }
                    _ => break,
                }
            } else if leading_whitespace(line) > indent {
                continuation.push(dedent(line, content_indent));
                self.pos += 1;
            } else {
                break;
            }
        }
        continuation
    }

    fn parse_paragraph(&mut self) -> Node {
        let mut children = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            if line.trim().is_empty()
                || HEADLINE.is_match(line)
                || LIST_ITEM.is_match(line)
                || BLOCK_BEGIN.is_match(line)
            {
                break;
            }
            children.push(Node::Text(Text {
                content: line.trim().to_string(),
            }));
            self.pos += 1;
        }
        Node::Paragraph(Paragraph { children })
    }

    fn error(&self, line_index: usize, message: String) -> ParseError {
        ParseError {
            path: self.path.to_string(),
            line: self.line_offset + line_index + 1,
            message,
        }
    }
}

fn leading_whitespace(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Strip up to `width` leading whitespace characters.
fn dedent(line: &str, width: usize) -> String {
    let mut rest = line;
    let mut stripped = 0;
    while stripped < width {
        match rest.strip_prefix(' ').or_else(|| rest.strip_prefix('\t')) {
            Some(r) => {
                rest = r;
                stripped += 1;
            }
            None => break,
        }
    }
    rest.to_string()
}
