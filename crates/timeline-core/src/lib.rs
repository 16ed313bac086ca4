//! Layercut Timeline Core
//!
//! The editing engine behind the timeline:
//! - **Geometry:** Interval overlap, free-track search, snapping, split math
//! - **Store:** Authoritative tracks/elements/markers with invariant-keeping commands
//! - **Placement:** Track and time selection for new elements
//! - **Edit:** Split, split-audio, track insert/delete with renumbering, duplicate, nudge
//! - **History:** Bounded snapshot undo/redo
//! - **Interaction:** Live drag/trim/resize gestures with snapping
//! - **Editor:** Facade combining the above with undo capture and autosave
//!
//! This crate is pure computation: no I/O besides the persistence
//! collaborator handed to [`Editor::autosave`].

pub mod edit;
pub mod editor;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod placement;
pub mod store;

pub use edit::{NudgeDirection, SplitScope};
pub use editor::Editor;
pub use geometry::SnapResult;
pub use history::History;
pub use interaction::{CanvasDrag, CanvasHandle, DragMode, DragSettings, TimelineDrag};
pub use placement::{place_new_element, PlacementRequest};
pub use store::{validate_snapshot, Store};
