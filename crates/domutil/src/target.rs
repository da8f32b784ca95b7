//! The resolution primitive every operation goes through.
//!
//! A target is an explicit tagged union instead of the classic
//! "string means selector, anything else means node" guess, and the
//! global scope is its own variant rather than an omitted argument.

use crate::error::{Result, UtilError};
use dom::{Document, NodeId};
use tracing::warn;

/// One addressable thing: a selector to resolve, an already-resolved node,
/// or the document itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Selector(&'a str),
    Node(NodeId),
    Document,
}

impl Target<'_> {
    fn describe(&self) -> String {
        match self {
            Target::Selector(sel) => (*sel).to_string(),
            Target::Node(id) => format!("node #{}", id),
            Target::Document => "document".to_string(),
        }
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(selector: &'a str) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target<'_> {
    fn from(id: NodeId) -> Self {
        Target::Node(id)
    }
}

/// Input form of the collection operations: a selector, or a list the
/// caller already materialized (coerced to itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetList<'a> {
    Selector(&'a str),
    Nodes(Vec<NodeId>),
}

impl<'a> From<&'a str> for TargetList<'a> {
    fn from(selector: &'a str) -> Self {
        TargetList::Selector(selector)
    }
}

impl From<Vec<NodeId>> for TargetList<'_> {
    fn from(nodes: Vec<NodeId>) -> Self {
        TargetList::Nodes(nodes)
    }
}

impl From<&[NodeId]> for TargetList<'_> {
    fn from(nodes: &[NodeId]) -> Self {
        TargetList::Nodes(nodes.to_vec())
    }
}

impl<const N: usize> From<[NodeId; N]> for TargetList<'_> {
    fn from(nodes: [NodeId; N]) -> Self {
        TargetList::Nodes(nodes.to_vec())
    }
}

impl From<NodeId> for TargetList<'_> {
    fn from(node: NodeId) -> Self {
        TargetList::Nodes(vec![node])
    }
}

/// Resolve a target to one node. Selectors resolve to their first match in
/// document order under `scope` (default: document root); node handles are
/// validated and returned as-is; `Target::Document` is the root. A selector
/// miss warns through the diagnostic path and reports `TargetNotFound`.
/// Never mutates the tree; every call re-resolves.
pub fn resolve<'a>(
    doc: &Document,
    target: impl Into<Target<'a>>,
    scope: Option<NodeId>,
) -> Result<NodeId> {
    let target = target.into();
    match target {
        Target::Document => Ok(doc.root_id()),
        Target::Node(id) => {
            doc.get(id)?;
            Ok(id)
        }
        Target::Selector(selector) => {
            let scope = scope.unwrap_or_else(|| doc.root_id());
            match doc.query_first(scope, selector)? {
                Some(id) => Ok(id),
                None => {
                    warn!(unresolved = %target.describe(), "target not found");
                    Err(UtilError::TargetNotFound(target.describe()))
                }
            }
        }
    }
}

/// Resolve to the full ordered match set. An empty match set is a valid
/// result, not an error, and nothing is logged.
pub fn resolve_all<'a>(
    doc: &Document,
    targets: impl Into<TargetList<'a>>,
    scope: Option<NodeId>,
) -> Result<Vec<NodeId>> {
    match targets.into() {
        TargetList::Nodes(nodes) => Ok(nodes),
        TargetList::Selector(selector) => {
            let scope = scope.unwrap_or_else(|| doc.root_id());
            Ok(doc.query_all(scope, selector)?)
        }
    }
}

/// Whether the target resolves within `scope`. Never errors, never logs;
/// even a malformed selector just reads as absent.
pub fn exists<'a>(doc: &Document, target: impl Into<Target<'a>>, scope: Option<NodeId>) -> bool {
    match target.into() {
        Target::Document => true,
        Target::Node(id) => doc.contains(id),
        Target::Selector(selector) => {
            let scope = scope.unwrap_or_else(|| doc.root_id());
            matches!(doc.query_first(scope, selector), Ok(Some(_)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::parse("<div id=\"a\"><p class=\"x\">one</p><p class=\"x\">two</p></div>")
            .unwrap()
    }

    #[test]
    fn test_resolve_selector_and_node_identity() {
        let doc = sample();
        let div = resolve(&doc, "#a", None).unwrap();
        assert_eq!(doc.get(div).unwrap().tag_name(), Some("div"));
        // an already-resolved handle is the identity case
        assert_eq!(resolve(&doc, div, None).unwrap(), div);
    }

    #[test]
    fn test_resolve_miss_reports_target() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let doc = sample();
        let err = resolve(&doc, "#missing", None).unwrap_err();
        assert!(matches!(err, UtilError::TargetNotFound(t) if t == "#missing"));
    }

    #[test]
    fn test_resolve_scoped() {
        let doc = sample();
        let div = resolve(&doc, "#a", None).unwrap();
        assert!(resolve(&doc, "p", Some(div)).is_ok());
        assert!(resolve(&doc, "div", Some(div)).is_err());
    }

    #[test]
    fn test_resolve_all_forms() {
        let doc = sample();
        assert_eq!(resolve_all(&doc, ".x", None).unwrap().len(), 2);
        assert_eq!(resolve_all(&doc, ".nope", None).unwrap().len(), 0);

        let given: Vec<NodeId> = vec![7, 3, 5];
        assert_eq!(resolve_all(&doc, given.clone(), None).unwrap(), given);
    }

    #[test]
    fn test_exists_never_errors() {
        let doc = sample();
        assert!(exists(&doc, "#a", None));
        assert!(!exists(&doc, "#missing", None));
        assert!(!exists(&doc, "li[", None));
        assert!(exists(&doc, Target::Document, None));
        assert!(!exists(&doc, 9999 as NodeId, None));
    }
}
