//! Structural mutation: create, append, remove.

use crate::error::Result;
use crate::target::{resolve, Target};
use dom::{Document, Event, EventTarget, NodeId, Position};

/// One creation property. The observed attribute-map conventions map onto
/// typed entries: literal attributes, `text`/`html` content, an already
/// constructed child, and event listeners.
enum Prop {
    Attr(String, String),
    Text(String),
    Html(String),
    Child(NodeId),
    Listener(String, dom::Handler),
}

/// Ordered property list for `create`. Entries apply in insertion order,
/// so a later `text` overrides an earlier `html` just as it would in an
/// ordered attribute map.
#[derive(Default)]
pub struct Props(Vec<Prop>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Literal attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push(Prop::Attr(name.into(), value.into()));
        self
    }

    /// Plain text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.0.push(Prop::Text(text.into()));
        self
    }

    /// Markup content.
    pub fn html(mut self, markup: impl Into<String>) -> Self {
        self.0.push(Prop::Html(markup.into()));
        self
    }

    /// Append an already-constructed node as a child.
    pub fn child(mut self, node: NodeId) -> Self {
        self.0.push(Prop::Child(node));
        self
    }

    /// Event listener. The conventional `on` key prefix is tolerated and
    /// stripped, so `on("onclick", ..)` and `on("click", ..)` are the same.
    pub fn on(mut self, event: impl Into<String>, handler: impl FnMut(&Event) + 'static) -> Self {
        let event = event.into();
        let name = event.strip_prefix("on").unwrap_or(event.as_str()).to_string();
        self.0.push(Prop::Listener(name, Box::new(handler)));
        self
    }

    /// The `id` a creation would carry, for idempotency checks.
    pub(crate) fn id(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|p| match p {
            Prop::Attr(name, value) if name == "id" => Some(value.as_str()),
            _ => None,
        })
    }
}

/// Construct a new element, apply `props` in order, and insert it under
/// `parent` at `position` when a parent is given (detached otherwise).
/// Returns the new node.
pub fn create(
    doc: &mut Document,
    tag: &str,
    props: Props,
    parent: Option<Target<'_>>,
    position: Position,
) -> Result<NodeId> {
    let id = doc.create_element(tag);
    for prop in props.0 {
        match prop {
            Prop::Attr(name, value) => doc.get_mut(id)?.set_attr(&name, &value),
            Prop::Text(text) => doc.set_text(id, &text)?,
            Prop::Html(markup) => doc.set_markup(id, &markup)?,
            Prop::Child(child) => doc.insert(child, id, Position::BeforeEnd)?,
            Prop::Listener(event, handler) => {
                doc.add_listener(EventTarget::Node(id), &event, handler)
            }
        }
    }

    if let Some(parent) = parent {
        let parent_id = resolve(doc, parent, None)?;
        doc.insert(id, parent_id, position)?;
    }
    Ok(id)
}

/// What `append` inserts: a markup string parsed as a fragment, or an
/// existing node moved into place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert<'a> {
    Markup(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for Insert<'a> {
    fn from(markup: &'a str) -> Self {
        Insert::Markup(markup)
    }
}

impl From<NodeId> for Insert<'_> {
    fn from(node: NodeId) -> Self {
        Insert::Node(node)
    }
}

/// Insert content at a structural position relative to the resolved
/// target. Returns the resolved target, not the inserted content.
pub fn append<'a, 'b>(
    doc: &mut Document,
    target: impl Into<Target<'a>>,
    code: impl Into<Insert<'b>>,
    position: Position,
) -> Result<NodeId> {
    let id = resolve(doc, target, None)?;
    match code.into() {
        Insert::Node(node) => doc.insert(node, id, position)?,
        Insert::Markup(markup) => {
            let roots = dom::parser::parse_fragment(doc, markup)?;
            match position {
                // these positions prepend, so source order needs a reversal
                Position::AfterBegin | Position::AfterEnd => {
                    for root in roots.into_iter().rev() {
                        doc.insert(root, id, position)?;
                    }
                }
                Position::BeforeBegin | Position::BeforeEnd => {
                    for root in roots {
                        doc.insert(root, id, position)?;
                    }
                }
            }
        }
    }
    Ok(id)
}

/// Detach the resolved node from its parent. Detaching an already-detached
/// node is a no-op; an unresolvable target reports through the diagnostic
/// path as an error.
pub fn remove<'a>(doc: &mut Document, target: impl Into<Target<'a>>) -> Result<NodeId> {
    let id = resolve(doc, target, None)?;
    doc.detach(id)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::exists;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_create_detached_with_id_and_text() {
        let mut doc = Document::new();
        let node = create(
            &mut doc,
            "div",
            Props::new().attr("id", "a").text("hi"),
            None,
            Position::default(),
        )
        .unwrap();

        let created = doc.get(node).unwrap();
        assert_eq!(created.attr("id"), Some("a"));
        assert_eq!(created.parent_id, None);
        assert_eq!(doc.text_content(node).unwrap(), "hi");
    }

    #[test]
    fn test_create_with_parent_child_and_listener() {
        let mut doc = Document::parse("<div id=\"host\"></div>").unwrap();
        let badge = create(&mut doc, "span", Props::new().text("!"), None, Position::default())
            .unwrap();

        let clicks = Rc::new(RefCell::new(0u32));
        let count = Rc::clone(&clicks);
        let button = create(
            &mut doc,
            "button",
            Props::new()
                .attr("type", "button")
                .html("<em>go</em>")
                .child(badge)
                .on("onclick", move |_| *count.borrow_mut() += 1),
            Some(Target::Selector("#host")),
            Position::BeforeEnd,
        )
        .unwrap();

        assert!(exists(&doc, "#host > button > em", None));
        assert!(exists(&doc, "#host > button > span", None));

        doc.dispatch_event(EventTarget::Node(button), "click");
        assert_eq!(*clicks.borrow(), 1);
    }

    #[test]
    fn test_append_markup_positions() {
        let mut doc = Document::parse("<ul id=\"l\"><li>c</li></ul>").unwrap();
        append(&mut doc, "#l", "<li>a</li><li>b</li>", Position::AfterBegin).unwrap();
        append(&mut doc, "#l", "<li>d</li>", Position::BeforeEnd).unwrap();

        let list = doc.find_by_id("l").unwrap();
        let texts: Vec<String> = doc
            .query_all(list, "li")
            .unwrap()
            .iter()
            .map(|&id| doc.text_content(id).unwrap())
            .collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_append_existing_node_moves_it() {
        let mut doc = Document::parse("<div id=\"from\"><p id=\"p\">x</p></div><div id=\"to\"></div>")
            .unwrap();
        let p = doc.find_by_id("p").unwrap();

        let to = append(&mut doc, "#to", p, Position::BeforeEnd).unwrap();
        assert_eq!(doc.parent_of(p), Some(to));
        assert!(!exists(&doc, "#from > p", None));
    }

    #[test]
    fn test_append_returns_target_not_content() {
        let mut doc = Document::parse("<div id=\"d\"></div>").unwrap();
        let d = doc.find_by_id("d").unwrap();
        assert_eq!(append(&mut doc, "#d", "<span></span>", Position::BeforeEnd).unwrap(), d);
    }

    #[test]
    fn test_remove_flips_exists() {
        let mut doc = Document::parse("<p id=\"gone\">x</p>").unwrap();
        assert!(exists(&doc, "#gone", None));

        let id = remove(&mut doc, "#gone").unwrap();
        assert!(!exists(&doc, "#gone", None));

        // already detached: no-op, resolution by handle still succeeds
        remove(&mut doc, id).unwrap();
        // but re-resolving the selector is now a reported miss
        assert!(remove(&mut doc, "#gone").is_err());
    }
}
