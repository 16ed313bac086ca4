//! Layercut Project Model
//!
//! Defines the core data contracts for Layercut projects:
//! - **Tracks:** Ordered lanes with dense, renumbered ids
//! - **Elements:** Clips and layers with timing, canvas geometry, and props
//! - **Markers:** Timeline annotations
//! - **Timeline:** The canonical state plus the persisted snapshot triple
//! - **Project:** Versioned project documents and file persistence
//!
//! Canvas geometry is expressed in percent of the canvas; times in seconds.

pub mod element;
pub mod marker;
pub mod project;
pub mod props;
pub mod timeline;
pub mod track;

pub use element::*;
pub use marker::*;
pub use project::*;
pub use props::*;
pub use timeline::*;
pub use track::*;
