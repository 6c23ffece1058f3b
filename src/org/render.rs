//! Renderers from node subtrees back to text
//!
//! Two backends, matching the two stringifier modes of the decoder:
//! - [`to_org`] renders a subtree back to org source. The parser's own
//!   output round-trips through it, and the decoder uses it both to
//!   detect blank nodes and to name nodes in error messages.
//! - [`to_html`] renders a subtree to HTML, with inline emphasis
//!   (`*bold*`, `/italic/`, `=verbatim=`, `~code~`) and `[[url][desc]]`
//!   links expanded via regex.
//!
//! Both are pure functions over the tree and never fail; an empty
//! subtree renders to an empty string.

use crate::org::ast::{List, ListKind, Node};
use once_cell::sync::Lazy;
use regex::Regex;

static LINK_WITH_DESC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]\[]+)\]\[([^\]\[]+)\]\]").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[([^\]\[]+)\]\]").unwrap());
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[\s(])\*([^\s*][^*]*?)\*($|[\s).,;:!?])").unwrap());
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[\s(])/([^\s/][^/]*?)/($|[\s).,;:!?])").unwrap());
static VERBATIM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[\s(])=([^\s=][^=]*?)=($|[\s).,;:!?])").unwrap());
static CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[\s(])~([^\s~][^~]*?)~($|[\s).,;:!?])").unwrap());

/// Render a node sequence back to org source.
pub fn to_org(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_org(&mut out, node);
    }
    out
}

fn write_org(out: &mut String, node: &Node) {
    match node {
        Node::Headline(h) => {
            out.push_str(&"*".repeat(h.level));
            out.push(' ');
            out.push_str(to_org(&h.title).trim_end());
            if !h.tags.is_empty() {
                out.push_str(&format!(" :{}:", h.tags.join(":")));
            }
            out.push('\n');
            out.push_str(&to_org(&h.children));
        }
        Node::List(list) => {
            let mut counter = 0;
            for item in &list.items {
                counter += 1;
                let marker = match list.kind {
                    ListKind::Ordered => format!("{}.", counter),
                    _ => "-".to_string(),
                };
                write_org_item(out, &marker, item);
            }
        }
        Node::ListItem(_) | Node::DescriptiveListItem(_) => write_org_item(out, "-", node),
        Node::Paragraph(p) => {
            if p.children.is_empty() {
                out.push('\n');
            } else {
                for child in &p.children {
                    out.push_str(to_org(std::slice::from_ref(child)).trim_end());
                    out.push('\n');
                }
            }
        }
        Node::Text(t) => out.push_str(&t.content),
        Node::Block(b) => {
            out.push_str(&format!("#+BEGIN_{}\n", b.name));
            for line in &b.lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&format!("#+END_{}\n", b.name));
        }
    }
}

fn write_org_item(out: &mut String, marker: &str, item: &Node) {
    let body = match item {
        Node::ListItem(item) => to_org(&item.children),
        Node::DescriptiveListItem(item) => {
            let term = to_org(&item.term).trim().to_string();
            let details = to_org(&item.details);
            let details = details.trim_end();
            if details.is_empty() {
                format!("{} ::", term)
            } else if starts_with_paragraph(&item.details) {
                format!("{} :: {}", term, details)
            } else {
                format!("{} ::\n{}", term, details)
            }
        }
        other => to_org(std::slice::from_ref(other)),
    };
    let indent = " ".repeat(marker.len() + 1);
    let mut lines = body.trim_end().lines();
    out.push_str(marker);
    out.push(' ');
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    out.push('\n');
    for line in lines {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&indent);
            out.push_str(line);
            out.push('\n');
        }
    }
}

fn starts_with_paragraph(nodes: &[Node]) -> bool {
    matches!(nodes.first(), Some(Node::Paragraph(p)) if !p.children.is_empty())
}

/// Render a node sequence to HTML.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_html(&mut out, node);
    }
    out
}

fn write_html(out: &mut String, node: &Node) {
    match node {
        Node::Headline(h) => {
            let level = h.level.min(6);
            out.push_str(&format!("<h{}>{}</h{}>\n", level, inline(&h.title), level));
            out.push_str(&to_html(&h.children));
        }
        Node::List(list) => write_html_list(out, list),
        Node::ListItem(item) => {
            out.push_str("<li>\n");
            out.push_str(&to_html(&item.children));
            out.push_str("</li>\n");
        }
        Node::DescriptiveListItem(item) => {
            out.push_str(&format!("<dt>{}</dt>\n<dd>\n", inline(&item.term)));
            out.push_str(&to_html(&item.details));
            out.push_str("</dd>\n");
        }
        Node::Paragraph(p) => {
            if !p.children.is_empty() {
                out.push_str(&format!("<p>{}</p>\n", inline(&p.children)));
            }
        }
        Node::Text(t) => out.push_str(&inline_text(&t.content)),
        Node::Block(b) => {
            out.push_str("<pre><code>");
            out.push_str(&escape_html(&b.lines.join("\n")));
            out.push_str("</code></pre>\n");
        }
    }
}

fn write_html_list(out: &mut String, list: &List) {
    let (open, close) = match list.kind {
        ListKind::Ordered => ("<ol>\n", "</ol>\n"),
        ListKind::Unordered => ("<ul>\n", "</ul>\n"),
        ListKind::Descriptive => ("<dl>\n", "</dl>\n"),
    };
    out.push_str(open);
    for item in &list.items {
        match (list.kind, item) {
            (ListKind::Descriptive, Node::ListItem(plain)) => {
                // plain item inside a descriptive list: details without a term
                out.push_str("<dd>\n");
                out.push_str(&to_html(&plain.children));
                out.push_str("</dd>\n");
            }
            _ => write_html(out, item),
        }
    }
    out.push_str(close);
}

/// Render the inline content of a paragraph, title or term: text nodes
/// joined line by line, anything structural rendered in place.
fn inline(nodes: &[Node]) -> String {
    let mut parts = Vec::new();
    for node in nodes {
        match node {
            Node::Text(t) => parts.push(inline_text(&t.content)),
            other => parts.push(to_html(std::slice::from_ref(other))),
        }
    }
    parts.join("\n")
}

fn inline_text(text: &str) -> String {
    let text = escape_html(text);
    let text = LINK_WITH_DESC.replace_all(&text, r#"<a href="$1">$2</a>"#);
    let text = LINK.replace_all(&text, r#"<a href="$1">$1</a>"#);
    let text = BOLD.replace_all(&text, "$1<strong>$2</strong>$3");
    let text = ITALIC.replace_all(&text, "$1<em>$2</em>$3");
    let text = VERBATIM.replace_all(&text, "$1<code>$2</code>$3");
    let text = CODE.replace_all(&text, "$1<code>$2</code>$3");
    text.into_owned()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::parser::parse;

    fn nodes(source: &str) -> Vec<Node> {
        parse(source, "test.org").expect("parse failed").nodes
    }

    #[test]
    fn org_rendering_round_trips_through_the_parser() {
        let source = "* General :general:\n- FirstName :: Ada\n- LastName :: Lovelace\n\n* Skills :skills:\n- Mathematics\n- Programming\n";
        let first = nodes(source);
        let rendered = to_org(&first);
        assert_eq!(nodes(&rendered), first);
    }

    #[test]
    fn ordered_lists_are_renumbered() {
        let rendered = to_org(&nodes("3. a\n7. b\n"));
        assert_eq!(rendered, "1. a\n2. b\n");
    }

    #[test]
    fn nested_item_content_is_indented_under_the_bullet() {
        let rendered = to_org(&nodes("- outer\n  - inner\n"));
        assert_eq!(rendered, "- outer\n  - inner\n");
    }

    #[test]
    fn paragraph_html_is_wrapped_once() {
        assert_eq!(to_html(&nodes("hello world\n")), "<p>hello world</p>\n");
    }

    #[test]
    fn headline_html_nests_children_after_the_heading() {
        let html = to_html(&nodes("** Title\nbody\n"));
        assert_eq!(html, "<h2>Title</h2>\n<p>body</p>\n");
    }

    #[test]
    fn descriptive_list_html_uses_definition_tags() {
        let html = to_html(&nodes("- Name :: Alice\n"));
        assert_eq!(
            html,
            "<dl>\n<dt>Name</dt>\n<dd>\n<p>Alice</p>\n</dd>\n</dl>\n"
        );
    }

    #[test]
    fn inline_markup_is_expanded() {
        assert_eq!(
            to_html(&nodes("this is *important* stuff\n")),
            "<p>this is <strong>important</strong> stuff</p>\n"
        );
        assert_eq!(
            to_html(&nodes("prefer ~map~ here\n")),
            "<p>prefer <code>map</code> here</p>\n"
        );
    }

    #[test]
    fn links_are_expanded_with_and_without_description() {
        assert_eq!(
            to_html(&nodes("see [[https://example.com][the site]]\n")),
            "<p>see <a href=\"https://example.com\">the site</a></p>\n"
        );
        assert_eq!(
            to_html(&nodes("see [[https://example.com]]\n")),
            "<p>see <a href=\"https://example.com\">https://example.com</a></p>\n"
        );
    }

    #[test]
    fn html_special_characters_are_escaped() {
        assert_eq!(
            to_html(&nodes("a <b> & \"c\"\n")),
            "<p>a &lt;b&gt; &amp; &quot;c&quot;</p>\n"
        );
    }

    #[test]
    fn raw_blocks_render_as_preformatted_text() {
        let html = to_html(&nodes("#+BEGIN_EXAMPLE\n1 < 2\n#+END_EXAMPLE\n"));
        assert_eq!(html, "<pre><code>1 &lt; 2</code></pre>\n");
    }

    #[test]
    fn empty_sequences_render_to_nothing() {
        assert_eq!(to_org(&[]), "");
        assert_eq!(to_html(&[]), "");
    }
}
