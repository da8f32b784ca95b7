//! Core node types for the document tree.
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for child lists (most nodes have few children)
//! 3. Keep nodes plain data; listeners and focus live on the document

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Node identifier (index into the document arena).
/// u32 allows 4 billion nodes, enough for any page.
pub type NodeId = u32;

/// Node type, carrying the DOM specification numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
}

/// Tags that can never have children and are serialized without a close tag.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tags whose focus acquisition requests are honored.
const FOCUSABLE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea"];

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// One node in the document tree.
///
/// Navigation uses indices instead of pointers; the attribute map doubles
/// as storage for the class set (`class`) and style declarations (`style`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,

    /// Lowercase tag name for elements, `#document`/`#text`/`#comment` otherwise.
    pub node_name: String,
    /// Text for text and comment nodes; empty for the rest.
    pub node_value: String,
    pub attributes: HashMap<String, String>,
}

impl DomNode {
    pub fn new(node_id: NodeId, node_type: NodeType, node_name: String) -> Self {
        Self {
            node_id,
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name,
            node_value: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// Get tag name for element nodes.
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get attribute value. Attribute names are stored lowercase.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Whitespace-token membership test on the `class` attribute.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|v| v.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let next = match self.attributes.get("class") {
            Some(cur) if !cur.trim().is_empty() => format!("{} {}", cur.trim(), class),
            _ => class.to_string(),
        };
        self.attributes.insert("class".to_string(), next);
    }

    pub fn remove_class(&mut self, class: &str) {
        let Some(cur) = self.attributes.get("class").cloned() else {
            return;
        };
        let next = cur
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        if next.is_empty() {
            self.attributes.remove("class");
        } else {
            self.attributes.insert("class".to_string(), next);
        }
    }

    /// Three-way class toggle: `Some(true)` forces addition, `Some(false)`
    /// forces removal, `None` flips membership. Returns the new membership.
    pub fn toggle_class(&mut self, class: &str, force: Option<bool>) -> bool {
        let on = force.unwrap_or(!self.has_class(class));
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
        on
    }

    /// Read one property from the `style` attribute declarations.
    pub fn style(&self, prop: &str) -> Option<String> {
        self.attr("style").and_then(|decls| {
            decls.split(';').find_map(|d| {
                let (k, v) = d.split_once(':')?;
                k.trim()
                    .eq_ignore_ascii_case(prop)
                    .then(|| v.trim().to_string())
            })
        })
    }

    /// Set one property in the `style` attribute, preserving the others.
    pub fn set_style(&mut self, prop: &str, value: &str) {
        let mut decls = self
            .attributes
            .get("style")
            .map(|s| parse_style_decls(s))
            .unwrap_or_default();
        match decls.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(prop)) {
            Some(entry) => entry.1 = value.to_string(),
            None => decls.push((prop.to_string(), value.to_string())),
        }
        let rendered = decls
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("; ");
        self.attributes.insert("style".to_string(), rendered);
    }

    /// Value-bearing form control: content assigned to it is a value, never markup.
    pub fn is_form_input(&self) -> bool {
        matches!(self.tag_name(), Some("input") | Some("textarea"))
    }

    pub fn is_select(&self) -> bool {
        self.tag_name() == Some("select")
    }

    pub fn is_checkbox_like(&self) -> bool {
        self.tag_name() == Some("input")
            && matches!(self.attr("type"), Some("checkbox") | Some("radio"))
    }

    /// Bare `checked` attributes parse as `"true"`; anything but an explicit
    /// `"false"` counts as checked.
    pub fn is_checked(&self) -> bool {
        self.attr("checked").is_some_and(|v| v != "false")
    }

    pub fn is_focusable(&self) -> bool {
        self.tag_name().is_some_and(|t| FOCUSABLE_TAGS.contains(&t))
            || self.attr("tabindex").is_some()
    }
}

fn parse_style_decls(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|d| {
            let (k, v) = d.split_once(':')?;
            let k = k.trim();
            if k.is_empty() {
                return None;
            }
            Some((k.to_string(), v.trim().to_string()))
        })
        .collect()
}
