//! Document tree backend.
//!
//! An arena-backed document tree with everything the utility facade needs:
//! markup parsing, structural selectors, four-position insertion, class-set
//! and style helpers, a markup serializer, and a synchronous listener
//! registry with a focused-node slot.
//!
//! ## Core Design
//!
//! ```text
//! markup → parser → Document (Vec<DomNode>) → selector / serializer
//!                        ↓
//!                   NodeId (u32)
//! ```
//!
//! Nodes are addressed by index, never by pointer; detaching a subtree
//! keeps its slots alive, so stale handles read fine but stop being
//! reachable from the root.

pub mod arena;
pub mod error;
pub mod events;
pub mod parser;
pub mod selector;
pub mod serializer;
pub mod types;

pub use arena::{Document, Position};
pub use error::{DomError, Result};
pub use events::{Event, EventTarget, Handler};
pub use types::{DomNode, NodeId, NodeType};
