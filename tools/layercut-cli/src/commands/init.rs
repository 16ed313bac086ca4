//! Initialize a new Layercut project.

use std::path::PathBuf;

use layercut_project_model::JsonProjectStore;

pub fn run(name: String, output: PathBuf) -> anyhow::Result<()> {
    let project_dir = output.join(&name);
    println!("Creating project '{}' at {}", name, project_dir.display());

    if let Ok(Some(_)) = JsonProjectStore::new(&project_dir).load_document() {
        anyhow::bail!("A project already exists at {}", project_dir.display());
    }

    let (store, document) = JsonProjectStore::create(&project_dir, &name)
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    println!("Project created successfully:");
    println!("  Directory: {}", store.root().display());
    println!("  ID: {}", document.id);
    println!("  Tracks: {}", document.snapshot.tracks.len());
    println!();
    println!("Directory structure:");
    println!("  {}/", name);
    println!("  └── meta/        (project.json)");

    Ok(())
}
