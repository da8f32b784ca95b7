//! Document-tree utility facade.
//!
//! A flat collection of independent, stateless helper functions over the
//! `dom` document tree: selection, visibility, content/attribute/style
//! mutation, structural mutation, event binding, and idempotent resource
//! injection. Every operation normalizes its target through one resolver
//! and returns the resolved node for chaining.
//!
//! ```
//! use domutil::{append, hide, update, Content, Document, Position};
//!
//! let mut doc = Document::parse("<div id=\"out\">old</div>").unwrap();
//! update(&mut doc, "#out", Content::text("fresh")).unwrap();
//! append(&mut doc, "#out", "<span>!</span>", Position::BeforeEnd).unwrap();
//! hide(&mut doc, "#out").unwrap();
//! ```
//!
//! Failure comes in two tiers: resolution misses warn through `tracing`
//! and surface as descriptive `TargetNotFound` errors before any mutation
//! starts, while `exists` and the focus/detach no-ops stay silent.

pub mod attrs;
pub mod content;
pub mod error;
pub mod events;
pub mod load;
pub mod structure;
pub mod target;
pub mod visibility;

pub use attrs::{attr, checked, disable, enable, focus, set_attr, set_style, set_styles};
pub use content::{update, Content, SelectOption};
pub use error::{Result, UtilError};
pub use events::{dispatch, each, on};
pub use load::load;
pub use structure::{append, create, remove, Insert, Props};
pub use target::{exists, resolve, resolve_all, Target, TargetList};
pub use visibility::{hide, set_visible, show, toggle, HIDDEN_CLASS};

// the tree types callers hold alongside the operations
pub use dom::{Document, Event, EventTarget, NodeId, Position};
