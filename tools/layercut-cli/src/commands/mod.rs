pub mod edit;
pub mod export;
pub mod frame;
pub mod info;
pub mod init;
pub mod validate;

use std::path::Path;

use layercut_project_model::{JsonProjectStore, ProjectDocument};

/// Load the project document at `path`, failing if there is none.
pub(crate) fn load_document(path: &Path) -> anyhow::Result<(JsonProjectStore, ProjectDocument)> {
    let store = JsonProjectStore::new(path);
    let document = store
        .load_document()
        .map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))?
        .ok_or_else(|| anyhow::anyhow!("No project found at {}", path.display()))?;
    Ok((store, document))
}
