//! Decode session and type-directed dispatch
//!
//! [`Decoder`] is the root entry point: it holds the session's only
//! configuration (the [`Stringifier`] used for leaf values) and drives
//! classification. Dispatch is directed by the target's declared shape,
//! except for dynamic targets, where it is directed by the input's
//! first significant node — that inversion is what lets one outline
//! syntax serve as object, array and string at the same time.
//!
//! The key/value pair extractor and the blank-node filter live here as
//! free functions; both are pure over the node tree and feed the
//! mapping-, record- and sequence-shaped branches of the dispatcher.

use crate::decode::error::DecodeError;
use crate::decode::target::{DecodeOrg, Mapping, Record, Sequence, Slot, Target};
use crate::decode::value::Value;
use crate::org::ast::{ListKind, Node, Text};
use crate::org::parser;
use crate::org::render;
use log::debug;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Rendering used for scalar leaves, chosen once per decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stringifier {
    /// HTML rendering; a single wrapping paragraph is stripped so that
    /// one-line fields don't carry `<p>` tags.
    Html,
    /// Literal org-source rendering.
    Org,
}

impl Stringifier {
    /// Render a node subtree to a leaf string. Pure, never fails; an
    /// empty subtree renders to an empty string.
    pub fn apply(&self, nodes: &[Node]) -> String {
        match self {
            Stringifier::Html => {
                let html = render::to_html(nodes);
                let mut text = html.as_str();
                if html.find("<p>") == html.rfind("<p>") {
                    text = text.strip_prefix("<p>").unwrap_or(text);
                    text = text.strip_suffix("</p>\n").unwrap_or(text);
                }
                text.trim().to_string()
            }
            Stringifier::Org => render::to_org(nodes).trim().to_string(),
        }
    }
}

/// An extracted (key nodes, value nodes) tuple; lives only for the
/// duration of one decode call.
#[derive(Debug)]
pub struct KvPair<'a> {
    pub key: Cow<'a, [Node]>,
    pub value: &'a [Node],
}

/// Keep only the nodes whose rendered text is not purely whitespace,
/// preserving order. Blank separator lines in the source never produce
/// spurious list elements or key/value pairs.
pub fn without_blank_nodes(nodes: &[Node]) -> Vec<&Node> {
    nodes
        .iter()
        .filter(|node| !node.to_string().trim().is_empty())
        .collect()
}

/// Derive ordered key/value pairs from a node sequence.
///
/// A headline with exactly one tag contributes one pair (tag text as
/// key, children as value); a descriptive list contributes one pair per
/// item (term, details). Anything else cannot serve as a key source.
/// Duplicate keys are preserved; the mapping/record layer resolves them
/// last-write-wins.
pub fn kv_pairs(nodes: &[Node]) -> Result<Vec<KvPair<'_>>, DecodeError> {
    let mut pairs = Vec::new();
    for node in without_blank_nodes(nodes) {
        match node {
            Node::Headline(headline) => {
                if headline.tags.len() != 1 {
                    return Err(DecodeError::unresolvable_key(
                        "a headline without exactly one tag",
                        node,
                    ));
                }
                let key = vec![Node::Text(Text {
                    content: headline.tags[0].clone(),
                })];
                pairs.push(KvPair {
                    key: Cow::Owned(key),
                    value: &headline.children,
                });
            }
            Node::List(list) if list.kind == ListKind::Descriptive => {
                for item in &list.items {
                    match item {
                        Node::DescriptiveListItem(item) => pairs.push(KvPair {
                            key: Cow::Borrowed(&item.term),
                            value: &item.details,
                        }),
                        other => {
                            return Err(DecodeError::unresolvable_key(
                                "a plain item in a descriptive list",
                                other,
                            ))
                        }
                    }
                }
            }
            Node::List(_) => {
                return Err(DecodeError::unresolvable_key("a plain list", node));
            }
            other => {
                return Err(DecodeError::unresolvable_key(other.node_type(), other));
            }
        }
    }
    Ok(pairs)
}

/// One decode session: immutable configuration plus the dispatch entry
/// point. Decoding mutates the caller-owned target in place and returns
/// nothing on success.
#[derive(Debug, Clone)]
pub struct Decoder {
    stringifier: Stringifier,
}

impl Decoder {
    /// Session with the HTML stringifier.
    pub fn new() -> Self {
        Decoder {
            stringifier: Stringifier::Html,
        }
    }

    pub fn with_stringifier(stringifier: Stringifier) -> Self {
        Decoder { stringifier }
    }

    pub fn stringifier(&self) -> Stringifier {
        self.stringifier
    }

    /// Parse org source and decode the root node sequence into
    /// `target`. Parse failures abort before decoding starts.
    pub fn decode_str<T: Target>(
        &self,
        source: &str,
        path: &str,
        target: &mut T,
    ) -> Result<(), DecodeError> {
        let document = parser::parse(source, path)?;
        self.decode(&document.nodes, target)
    }

    /// Decode a node sequence into `target`, classified by the
    /// target's own shape. The custom-decode capability is the only
    /// override point and is checked first.
    pub fn decode<T: Target>(&self, nodes: &[Node], target: &mut T) -> Result<(), DecodeError> {
        match target.slot() {
            Slot::Custom(custom) => custom.decode_org(self, nodes),
            Slot::Scalar(scalar) => {
                *scalar = self.stringifier.apply(nodes);
                Ok(())
            }
            Slot::Sequence(sequence) => self.decode_sequence(nodes, sequence),
            Slot::Mapping(mapping) => self.decode_mapping(nodes, mapping),
            Slot::Record(record) => self.decode_record(nodes, record),
            Slot::Dynamic(value) => self.decode_any(nodes, value),
        }
    }

    /// Sequence targets accept untagged headlines (children become one
    /// element each) and non-descriptive lists (each item's children
    /// become one element).
    fn decode_sequence(
        &self,
        nodes: &[Node],
        sequence: &mut dyn Sequence,
    ) -> Result<(), DecodeError> {
        for node in without_blank_nodes(nodes) {
            match node {
                Node::Headline(headline) => {
                    if !headline.tags.is_empty() {
                        return Err(DecodeError::shape_mismatch("a sequence", node));
                    }
                    sequence.decode_element(self, &headline.children)?;
                }
                Node::List(list) => {
                    if list.kind == ListKind::Descriptive {
                        return Err(DecodeError::shape_mismatch("a sequence", node));
                    }
                    for item in &list.items {
                        match item {
                            Node::ListItem(item) => {
                                sequence.decode_element(self, &item.children)?
                            }
                            other => {
                                return Err(DecodeError::shape_mismatch(
                                    "a sequence element",
                                    other,
                                ))
                            }
                        }
                    }
                }
                other => return Err(DecodeError::shape_mismatch("a sequence", other)),
            }
        }
        Ok(())
    }

    fn decode_mapping(&self, nodes: &[Node], mapping: &mut dyn Mapping) -> Result<(), DecodeError> {
        for pair in kv_pairs(nodes)? {
            let key = render::to_org(&pair.key).trim().to_string();
            mapping
                .decode_entry(self, &pair.key, pair.value)
                .map_err(|err| DecodeError::field(&key, err))?;
        }
        Ok(())
    }

    /// Unmatched keys are skipped so extra document content never
    /// breaks a record decode.
    fn decode_record(&self, nodes: &[Node], record: &mut dyn Record) -> Result<(), DecodeError> {
        for pair in kv_pairs(nodes)? {
            let key = render::to_org(&pair.key).trim().to_string();
            let matched = record
                .decode_field(self, &key, pair.value)
                .map_err(|err| DecodeError::field(&key, err))?;
            if !matched {
                debug!("no record field matches key {:?}, skipping", key);
            }
        }
        Ok(())
    }

    /// Infer the shape of a dynamic target from the first significant
    /// input node: descriptive lists and singly-tagged headlines read
    /// as mappings, other headlines and plain lists as sequences,
    /// anything else as text.
    fn decode_any(&self, nodes: &[Node], value: &mut Value) -> Result<(), DecodeError> {
        let filtered = without_blank_nodes(nodes);
        let first = match filtered.first() {
            Some(first) => first,
            None => return Ok(()),
        };
        match first {
            Node::List(list) if list.kind == ListKind::Descriptive => {
                *value = Value::Map(self.decode_any_map(nodes)?);
            }
            Node::Headline(headline) if headline.tags.len() == 1 => {
                *value = Value::Map(self.decode_any_map(nodes)?);
            }
            Node::List(_) | Node::Headline(_) => {
                let mut items = Vec::new();
                self.decode(nodes, &mut items)?;
                *value = Value::Seq(items);
            }
            _ => {
                let mut text = String::new();
                self.decode(nodes, &mut text)?;
                *value = Value::Text(text);
            }
        }
        Ok(())
    }

    fn decode_any_map(&self, nodes: &[Node]) -> Result<BTreeMap<String, Value>, DecodeError> {
        let mut entries = BTreeMap::new();
        self.decode(nodes, &mut entries)?;
        Ok(entries)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}
