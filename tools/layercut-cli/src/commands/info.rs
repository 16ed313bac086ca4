//! Show project information.

use std::path::PathBuf;

use layercut_timeline_core::Store;

use super::load_document;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let (_, document) = load_document(&path)?;

    println!("Project: {}", document.name);
    println!("  ID: {}", document.id);
    println!("  Version: {}", document.version);
    println!("  Created: {}", document.created_at);
    println!("  Modified: {}", document.modified_at);
    println!();

    let store = Store::from_snapshot(document.snapshot);
    let state = store.state();

    println!("Timeline:");
    println!("  Duration: {:.2}s", state.total_duration);
    println!("  Elements: {}", state.elements.len());
    println!();

    println!("Tracks:");
    for track in &state.tracks {
        let mut flags = vec![];
        if !track.is_visible {
            flags.push("hidden");
        }
        if track.is_locked {
            flags.push("locked");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        println!(
            "  {} {:?}: {} element(s){}",
            track.name,
            track.kind,
            state.elements_on_track(track.id).count(),
            flags
        );
        for element in state.elements_on_track(track.id) {
            println!(
                "    - {} {} ({:.2}s → {:.2}s) {}",
                element.element_type.label(),
                element.name,
                element.start_time,
                element.end_time(),
                element.id
            );
        }
    }

    let markers = state.markers_by_time();
    if !markers.is_empty() {
        println!();
        println!("Markers:");
        for marker in markers {
            println!("  {:.2}s {} ({:?})", marker.time, marker.name, marker.color);
        }
    }

    Ok(())
}
