//! Event binding, dispatch, and collection iteration.
//!
//! The global-scope form is the explicit `Target::Document` variant, not
//! an omitted argument; there is no arity-shifting overload to misread.

use crate::error::Result;
use crate::target::{resolve, resolve_all, Target, TargetList};
use dom::{Document, Event, EventTarget, NodeId};

/// Register `handler` for `event` at the resolved target. Returns the
/// event target it landed on; an unresolvable target registers nothing.
pub fn on<'a>(
    doc: &mut Document,
    target: impl Into<Target<'a>>,
    event: &str,
    handler: impl FnMut(&Event) + 'static,
) -> Result<EventTarget> {
    let et = resolve_event_target(doc, target)?;
    doc.add_listener(et, event, Box::new(handler));
    Ok(et)
}

/// Synthesize a custom event and fire it at the resolved target. Returns
/// how many handlers ran.
pub fn dispatch<'a>(doc: &mut Document, target: impl Into<Target<'a>>, event: &str) -> Result<usize> {
    let et = resolve_event_target(doc, target)?;
    Ok(doc.dispatch_event(et, event))
}

fn resolve_event_target<'a>(doc: &Document, target: impl Into<Target<'a>>) -> Result<EventTarget> {
    match target.into() {
        Target::Document => Ok(EventTarget::Document),
        other => Ok(EventTarget::Node(resolve(doc, other, None)?)),
    }
}

/// Normalize to a node list and invoke `f(doc, node, index)` for every
/// member in order. Returns the normalized list.
pub fn each<'a, F>(doc: &mut Document, targets: impl Into<TargetList<'a>>, mut f: F) -> Result<Vec<NodeId>>
where
    F: FnMut(&mut Document, NodeId, usize),
{
    let ids = resolve_all(doc, targets, None)?;
    for (index, &id) in ids.iter().enumerate() {
        f(doc, id, index);
    }
    Ok(ids)
}
