//! Markup serializer.
//!
//! Renders a subtree back to markup. Text and attribute values are escaped
//! here and only here; the tree itself always stores raw strings. Attributes
//! are emitted in sorted order so output is deterministic.

use crate::arena::Document;
use crate::error::Result;
use crate::types::{is_void_tag, NodeId, NodeType};

/// Serialize the node itself, including its tag.
pub fn outer_markup(doc: &Document, node_id: NodeId) -> Result<String> {
    let mut out = String::with_capacity(256);
    serialize_node(doc, node_id, false, &mut out)?;
    Ok(out)
}

/// Serialize only the node's content, the way a markup read-back would.
pub fn inner_markup(doc: &Document, node_id: NodeId) -> Result<String> {
    let node = doc.get(node_id)?;
    let raw = is_raw_text(doc, node_id);
    let mut out = String::with_capacity(256);
    for &child_id in &node.children_ids {
        serialize_node(doc, child_id, raw, &mut out)?;
    }
    Ok(out)
}

fn serialize_node(doc: &Document, node_id: NodeId, raw_text: bool, out: &mut String) -> Result<()> {
    let node = doc.get(node_id)?;
    match node.node_type {
        NodeType::Element => {
            out.push('<');
            out.push_str(&node.node_name);

            let mut names: Vec<&String> = node.attributes.keys().collect();
            names.sort();
            for name in names {
                if let Some(value) = node.attr(name) {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
            }
            out.push('>');

            if is_void_tag(&node.node_name) {
                return Ok(());
            }
            let raw = is_raw_text(doc, node_id);
            for &child_id in &node.children_ids {
                serialize_node(doc, child_id, raw, out)?;
            }
            out.push_str("</");
            out.push_str(&node.node_name);
            out.push('>');
        }
        NodeType::Text => {
            if raw_text {
                out.push_str(&node.node_value);
            } else {
                out.push_str(&escape_text(&node.node_value));
            }
        }
        NodeType::Comment => {
            out.push_str("<!--");
            out.push_str(&node.node_value);
            out.push_str("-->");
        }
        NodeType::Document => {
            for &child_id in &node.children_ids {
                serialize_node(doc, child_id, false, out)?;
            }
        }
    }
    Ok(())
}

/// Script and style bodies are written back verbatim.
fn is_raw_text(doc: &Document, node_id: NodeId) -> bool {
    doc.get(node_id)
        .ok()
        .and_then(|n| n.tag_name().map(|t| t == "script" || t == "style"))
        .unwrap_or(false)
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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
    use crate::arena::Position;

    #[test]
    fn test_serialize_element_tree() {
        let doc = Document::parse("<div id=\"a\"><span>hi</span><br></div>").unwrap();
        let div = doc.find_by_id("a").unwrap();
        assert_eq!(
            outer_markup(&doc, div).unwrap(),
            "<div id=\"a\"><span>hi</span><br></div>"
        );
        assert_eq!(inner_markup(&doc, div).unwrap(), "<span>hi</span><br>");
    }

    #[test]
    fn test_text_is_escaped_on_write() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_text(div, "<b>X & Y</b>").unwrap();
        assert_eq!(
            outer_markup(&doc, div).unwrap(),
            "<div>&lt;b&gt;X &amp; Y&lt;/b&gt;</div>"
        );
        // the tree itself keeps the raw string
        assert_eq!(doc.text_content(div).unwrap(), "<b>X & Y</b>");
    }

    #[test]
    fn test_attribute_escaping_and_order() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        doc.get_mut(a).unwrap().set_attr("title", "x \"y\" & z");
        doc.get_mut(a).unwrap().set_attr("href", "/p?a=1&b=2");
        assert_eq!(
            outer_markup(&doc, a).unwrap(),
            "<a href=\"/p?a=1&amp;b=2\" title=\"x &quot;y&quot; &amp; z\"></a>"
        );
    }

    #[test]
    fn test_script_body_round_trips_raw() {
        let mut doc = Document::new();
        let script = doc.create_element("script");
        let body = doc.create_text("if (a < b) { go(); }");
        doc.insert(body, script, Position::BeforeEnd).unwrap();
        assert_eq!(
            outer_markup(&doc, script).unwrap(),
            "<script>if (a < b) { go(); }</script>"
        );
    }

    #[test]
    fn test_comment_serialization() {
        let mut doc = Document::new();
        let c = doc.create_comment(" note ");
        assert_eq!(outer_markup(&doc, c).unwrap(), "<!-- note -->");
    }
}
