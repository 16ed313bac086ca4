//! Editing commands: add, split, delete-track.
//!
//! Each command loads the project, applies one edit through the editor,
//! and saves only if the edit changed something.

use std::path::{Path, PathBuf};

use layercut_common::config::AppConfig;
use layercut_project_model::{ElementProps, ElementType, JsonProjectStore, TrackId};
use layercut_timeline_core::{Editor, PlacementRequest, SplitScope};

use super::load_document;

pub struct AddArgs {
    pub element_type: ElementType,
    pub track: Option<TrackId>,
    pub at: Option<f64>,
    pub duration: Option<f64>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub asset: Option<String>,
}

fn open(path: &Path, config: &AppConfig) -> anyhow::Result<(JsonProjectStore, Editor)> {
    let (store, document) = load_document(path)?;
    let editor = Editor::from_snapshot(document.snapshot, config.editor.clone());
    Ok((store, editor))
}

fn save(editor: &mut Editor, store: &JsonProjectStore) -> anyhow::Result<()> {
    if !editor.autosave(store) {
        anyhow::bail!("Failed to save project at {}", store.root().display());
    }
    Ok(())
}

pub fn add(path: PathBuf, config: &AppConfig, args: AddArgs) -> anyhow::Result<()> {
    let (store, mut editor) = open(&path, config)?;

    let mut request = PlacementRequest::new(args.element_type);
    if let Some(track) = args.track {
        request = request.on_track(track);
    }
    if let Some(at) = args.at {
        request = request.at(at);
    }
    if let Some(duration) = args.duration {
        request = request.with_duration(duration);
    }
    if let Some(name) = args.name {
        request = request.named(name);
    }
    if let Some(asset) = args.asset {
        request = request.with_asset(asset);
    }
    if let Some(text) = args.text {
        request = request.with_props(ElementProps {
            text: Some(text),
            ..Default::default()
        });
    }

    let Some(element) = editor.add_element(request) else {
        anyhow::bail!("Element could not be placed (unknown track?)");
    };
    save(&mut editor, &store)?;

    println!("Added {} '{}'", element.element_type.label(), element.name);
    println!("  ID: {}", element.id);
    println!("  Track: {}", element.track_id);
    println!(
        "  Time: {:.2}s → {:.2}s",
        element.start_time,
        element.end_time()
    );
    Ok(())
}

pub fn split(
    path: PathBuf,
    config: &AppConfig,
    at: f64,
    element: Option<String>,
) -> anyhow::Result<()> {
    let (store, mut editor) = open(&path, config)?;

    let scope = match &element {
        Some(id) => {
            if editor.state().element(id).is_none() {
                anyhow::bail!("No element with id {id}");
            }
            editor.select(Some(id.as_str()));
            SplitScope::Selected
        }
        None => SplitScope::All,
    };

    let created = editor.split_at(at, scope);
    if created.is_empty() {
        println!("Nothing to split at {at:.2}s");
        return Ok(());
    }
    save(&mut editor, &store)?;

    println!("Split {} element(s) at {at:.2}s", created.len());
    for id in &created {
        println!("  + {id}");
    }
    Ok(())
}

pub fn delete_track(path: PathBuf, config: &AppConfig, track: TrackId) -> anyhow::Result<()> {
    let (store, mut editor) = open(&path, config)?;

    let removed = editor.state().elements_on_track(track).count();
    if !editor.delete_track(track) {
        anyhow::bail!("Track {track} cannot be deleted (missing, or the last track)");
    }
    save(&mut editor, &store)?;

    println!("Deleted track {track} and {removed} element(s)");
    println!("  Tracks now: {}", editor.state().tracks.len());
    Ok(())
}
