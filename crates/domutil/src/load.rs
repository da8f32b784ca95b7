//! Idempotent resource injection.

use crate::error::Result;
use crate::structure::{create, Props};
use crate::target::{resolve, Target};
use dom::{Document, NodeId, Position};

/// Inject a stylesheet or script node for `src`, at most once.
///
/// When `props` carry an `id` and a node with that id already exists
/// anywhere in the tree, that node is returned and nothing is injected.
/// Resource kind is inferred from the `src` suffix: `.css` becomes a
/// stylesheet link, anything else a script node. The default parent is the
/// document head, falling back to the root for headless trees.
pub fn load<'a>(
    doc: &mut Document,
    src: &str,
    props: Props,
    parent: Option<Target<'a>>,
) -> Result<NodeId> {
    if let Some(id) = props.id() {
        if let Some(existing) = doc.find_by_id(id) {
            return Ok(existing);
        }
    }

    let parent_id = match parent {
        Some(target) => resolve(doc, target, None)?,
        None => doc.head().unwrap_or_else(|| doc.root_id()),
    };

    let (tag, props) = if src.ends_with(".css") {
        ("link", props.attr("rel", "stylesheet").attr("href", src))
    } else {
        ("script", props.attr("src", src))
    };
    create(
        doc,
        tag,
        props,
        Some(Target::Node(parent_id)),
        Position::BeforeEnd,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_is_idempotent_per_id() {
        let mut doc = Document::parse("<head></head><body></body>").unwrap();

        let first = load(&mut doc, "/app.js", Props::new().attr("id", "app"), None).unwrap();
        let second = load(&mut doc, "/app.js", Props::new().attr("id", "app"), None).unwrap();

        assert_eq!(first, second);
        assert_eq!(doc.query_all(doc.root_id(), "#app").unwrap().len(), 1);
    }

    #[test]
    fn test_load_infers_resource_kind() {
        let mut doc = Document::parse("<head></head>").unwrap();

        let css = load(&mut doc, "/theme.css", Props::new(), None).unwrap();
        let link = doc.get(css).unwrap();
        assert_eq!(link.tag_name(), Some("link"));
        assert_eq!(link.attr("rel"), Some("stylesheet"));
        assert_eq!(link.attr("href"), Some("/theme.css"));

        let js = load(&mut doc, "/app.js", Props::new(), None).unwrap();
        let script = doc.get(js).unwrap();
        assert_eq!(script.tag_name(), Some("script"));
        assert_eq!(script.attr("src"), Some("/app.js"));
    }

    #[test]
    fn test_load_defaults_to_head() {
        let mut doc = Document::parse("<head></head><body></body>").unwrap();
        let head = doc.head().unwrap();

        let js = load(&mut doc, "/app.js", Props::new(), None).unwrap();
        assert_eq!(doc.parent_of(js), Some(head));
    }

    #[test]
    fn test_load_explicit_parent_and_headless_fallback() {
        let mut doc = Document::parse("<body><div id=\"slot\"></div></body>").unwrap();

        let scoped = load(
            &mut doc,
            "/w.js",
            Props::new(),
            Some(Target::Selector("#slot")),
        )
        .unwrap();
        let slot = doc.find_by_id("slot").unwrap();
        assert_eq!(doc.parent_of(scoped), Some(slot));

        let fallback = load(&mut doc, "/x.js", Props::new(), None).unwrap();
        assert_eq!(doc.parent_of(fallback), Some(doc.root_id()));
    }
}
