//! Attribute, style, enablement, and focus operations.
//!
//! Reads and writes are separate functions; the old arity-dispatched
//! getter/setter pair is deliberately gone.

use crate::error::Result;
use crate::target::{resolve, resolve_all, Target, TargetList};
use dom::{Document, NodeId};

/// Read an attribute. `Ok(None)` means the attribute is unset on the
/// resolved node; an unresolvable target is an error.
pub fn attr<'a>(
    doc: &Document,
    target: impl Into<Target<'a>>,
    name: &str,
) -> Result<Option<String>> {
    let id = resolve(doc, target, None)?;
    Ok(doc.get(id)?.attr(name).map(str::to_string))
}

/// Set an attribute. Returns the resolved node.
pub fn set_attr<'a>(
    doc: &mut Document,
    target: impl Into<Target<'a>>,
    name: &str,
    value: &str,
) -> Result<NodeId> {
    let id = resolve(doc, target, None)?;
    doc.get_mut(id)?.set_attr(name, value);
    Ok(id)
}

/// Set a single style property, preserving the other declarations.
pub fn set_style<'a>(
    doc: &mut Document,
    target: impl Into<Target<'a>>,
    prop: &str,
    value: &str,
) -> Result<NodeId> {
    let id = resolve(doc, target, None)?;
    doc.get_mut(id)?.set_style(prop, value);
    Ok(id)
}

/// Apply every entry of a style map onto the node.
pub fn set_styles<'a>(
    doc: &mut Document,
    target: impl Into<Target<'a>>,
    styles: &[(&str, &str)],
) -> Result<NodeId> {
    let id = resolve(doc, target, None)?;
    let node = doc.get_mut(id)?;
    for (prop, value) in styles {
        node.set_style(prop, value);
    }
    Ok(id)
}

/// Set the disabled marker attribute.
pub fn disable<'a>(doc: &mut Document, target: impl Into<Target<'a>>) -> Result<NodeId> {
    let id = resolve(doc, target, None)?;
    doc.get_mut(id)?.set_attr("disabled", "true");
    Ok(id)
}

/// Clear the disabled marker attribute.
pub fn enable<'a>(doc: &mut Document, target: impl Into<Target<'a>>) -> Result<NodeId> {
    let id = resolve(doc, target, None)?;
    doc.get_mut(id)?.remove_attr("disabled");
    Ok(id)
}

/// Request focus. Nodes that do not support focus acquisition are left
/// alone; the call still succeeds with the resolved node.
pub fn focus<'a>(doc: &mut Document, target: impl Into<Target<'a>>) -> Result<NodeId> {
    let id = resolve(doc, target, None)?;
    if doc.get(id)?.is_focusable() {
        doc.set_focused(Some(id));
    }
    Ok(id)
}

/// Ordered `value` attributes of the checked members of a checkbox-like
/// collection, preserving collection order.
pub fn checked<'a>(doc: &Document, targets: impl Into<TargetList<'a>>) -> Result<Vec<String>> {
    let ids = resolve_all(doc, targets, None)?;
    let mut values = Vec::new();
    for id in ids {
        let node = doc.get(id)?;
        if node.is_checkbox_like() && node.is_checked() {
            if let Some(value) = node.attr("value") {
                values.push(value.to_string());
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_get_set_split() {
        let mut doc = Document::parse("<a id=\"link\" href=\"/old\">go</a>").unwrap();
        assert_eq!(attr(&doc, "#link", "href").unwrap().as_deref(), Some("/old"));
        assert_eq!(attr(&doc, "#link", "rel").unwrap(), None);

        let link = set_attr(&mut doc, "#link", "href", "/new").unwrap();
        assert_eq!(doc.get(link).unwrap().attr("href"), Some("/new"));
    }

    #[test]
    fn test_style_single_and_map() {
        let mut doc = Document::parse("<div id=\"box\"></div>").unwrap();
        set_style(&mut doc, "#box", "color", "red").unwrap();
        let box_id = set_styles(
            &mut doc,
            "#box",
            &[("width", "10px"), ("color", "blue")],
        )
        .unwrap();

        let node = doc.get(box_id).unwrap();
        assert_eq!(node.style("width").as_deref(), Some("10px"));
        assert_eq!(node.style("color").as_deref(), Some("blue"));
    }

    #[test]
    fn test_disable_enable() {
        let mut doc = Document::parse("<button id=\"b\">ok</button>").unwrap();
        let b = disable(&mut doc, "#b").unwrap();
        assert_eq!(doc.get(b).unwrap().attr("disabled"), Some("true"));

        enable(&mut doc, b).unwrap();
        assert_eq!(doc.get(b).unwrap().attr("disabled"), None);
    }

    #[test]
    fn test_focus_only_lands_on_focusable_nodes() {
        let mut doc = Document::parse("<div id=\"d\"></div><input id=\"i\">").unwrap();

        let d = focus(&mut doc, "#d").unwrap();
        assert_eq!(doc.focused(), None);
        assert!(doc.get(d).is_ok());

        let i = focus(&mut doc, "#i").unwrap();
        assert_eq!(doc.focused(), Some(i));
    }

    #[test]
    fn test_checked_preserves_collection_order() {
        let doc = Document::parse(concat!(
            "<input type=\"checkbox\" value=\"1\" checked>",
            "<input type=\"checkbox\" value=\"2\">",
            "<input type=\"checkbox\" value=\"3\" checked>",
        ))
        .unwrap();

        assert_eq!(checked(&doc, "input").unwrap(), vec!["1", "3"]);
    }

    #[test]
    fn test_checked_ignores_non_checkbox_members() {
        let doc = Document::parse(
            "<input type=\"text\" value=\"t\"><input type=\"radio\" value=\"r\" checked>",
        )
        .unwrap();
        assert_eq!(checked(&doc, "input").unwrap(), vec!["r"]);
    }
}
