//! Visibility via marker-class membership.
//!
//! Visibility is exclusively modeled through the marker class; inline
//! display styles are never touched, so a stylesheet rule must bind the
//! marker class to non-rendering.

use crate::error::Result;
use crate::target::{resolve, Target};
use dom::{Document, NodeId};

/// The conventional marker class whose presence signals non-rendering.
pub const HIDDEN_CLASS: &str = "hidden";

/// Remove the hidden marker. A no-op when already visible.
pub fn show<'a>(doc: &mut Document, target: impl Into<Target<'a>>) -> Result<NodeId> {
    set_visible(doc, target, true)
}

/// Add the hidden marker. A no-op when already hidden.
pub fn hide<'a>(doc: &mut Document, target: impl Into<Target<'a>>) -> Result<NodeId> {
    set_visible(doc, target, false)
}

/// The force form `show` and `hide` delegate to.
pub fn set_visible<'a>(
    doc: &mut Document,
    target: impl Into<Target<'a>>,
    visible: bool,
) -> Result<NodeId> {
    toggle(doc, target, HIDDEN_CLASS, Some(!visible))
}

/// Three-way class toggle: `Some(true)` forces addition, `Some(false)`
/// forces removal, `None` flips membership. Returns the resolved node.
pub fn toggle<'a>(
    doc: &mut Document,
    target: impl Into<Target<'a>>,
    class: &str,
    force: Option<bool>,
) -> Result<NodeId> {
    let id = resolve(doc, target, None)?;
    doc.get_mut(id)?.toggle_class(class, force);
    Ok(id)
}
