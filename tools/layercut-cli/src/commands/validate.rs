//! Validate a Layercut project.

use std::path::PathBuf;

use layercut_project_model::ProjectPersistence;
use layercut_timeline_core::{validate_snapshot, Store};

use super::load_document;

pub fn run(path: PathBuf, repair: bool) -> anyhow::Result<()> {
    println!("Validating project at: {}", path.display());

    let (persistence, document) = load_document(&path)?;

    println!("  Name: {}", document.name);
    println!("  Version: {}", document.version);
    println!("  Tracks: {}", document.snapshot.tracks.len());
    println!("  Elements: {}", document.snapshot.elements.len());
    println!("  Markers: {}", document.snapshot.markers.len());

    let issues = validate_snapshot(&document.snapshot);
    if issues.is_empty() {
        println!("\nProject is valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for issue in &issues {
        println!("  - {issue}");
    }

    if !repair {
        println!(
            "\n{} issue(s) found. Run with --repair to fix structural issues.",
            issues.len()
        );
        return Ok(());
    }

    let repaired = Store::from_snapshot(document.snapshot);
    persistence
        .save(&repaired.project_snapshot())
        .map_err(|e| anyhow::anyhow!("Failed to save repaired project: {e}"))?;

    let remaining = repaired.validate();
    if remaining.is_empty() {
        println!("\nRepaired and saved. Project is valid.");
    } else {
        println!("\nRepaired and saved. Remaining issues:");
        for issue in &remaining {
            println!("  - {issue}");
        }
    }

    Ok(())
}
