//! Layercut Services
//!
//! Asynchronous collaborators the editing core depends on but does not
//! implement:
//! - **Assets:** Blob storage addressed by asset id, and resolution of
//!   asset ids to playable sources
//! - **Generation:** Prompt-driven component and image generation
//!
//! The core never waits on these while playing or editing; elements
//! render as placeholders until their sources resolve.

pub mod assets;
pub mod generation;

pub use assets::*;
pub use generation::*;
