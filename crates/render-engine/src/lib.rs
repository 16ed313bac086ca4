//! Layercut Render Engine
//!
//! Turns timeline state into frames and drives playback and export.
//!
//! # Pipeline Architecture
//!
//! ```text
//! display refresh ──┐
//!                   ├── Transport tick (currentTime += Δwall)
//! TimelineState ────┘         │
//!                             ├── Compositor (active window, z-order)
//!                             │        │
//!                             │        ├── Composed style per layer
//!                             │        └── Audio voices
//!                             │
//!                             ├── Media sync (seek / play / pause players)
//!                             │
//!                             └── Capture surface (real-time export)
//! ```

pub mod compositor;
pub mod export;
pub mod media_sync;
pub mod playback;
pub mod style;

pub use compositor::*;
pub use export::*;
pub use media_sync::{plan_media_sync, sync_media, MediaCommand, MediaPlayer};
pub use playback::*;
pub use style::{ColorTransform, ComposedStyle};
