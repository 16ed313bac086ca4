//! Print the composition of a single frame.

use std::path::PathBuf;

use layercut_render_engine::compose_frame;
use layercut_timeline_core::Store;

use super::load_document;

pub fn run(path: PathBuf, at: f64) -> anyhow::Result<()> {
    let (_, document) = load_document(&path)?;
    let store = Store::from_snapshot(document.snapshot);

    let frame = compose_frame(store.state(), at.max(0.0));
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}
