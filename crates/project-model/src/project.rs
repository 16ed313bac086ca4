//! Project documents and file persistence.
//!
//! A project directory holds `meta/project.json`, a versioned document
//! wrapping the persisted [`ProjectSnapshot`]. Older builds wrote a flat
//! `editor-state.json` at the project root; it is migrated once on load
//! and then deleted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::timeline::ProjectSnapshot;

/// Current on-disk schema version.
pub const PROJECT_VERSION: &str = "1.0";

const META_DIR: &str = "meta";
const PROJECT_FILE: &str = "project.json";
const LEGACY_STATE_FILE: &str = "editor-state.json";

/// Top-level project file (`meta/project.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Unique project identifier (UUID).
    pub id: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// Timeline contents.
    #[serde(flatten)]
    pub snapshot: ProjectSnapshot,
}

impl ProjectDocument {
    /// Create a new document around an empty timeline.
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: PROJECT_VERSION.to_string(),
            name: name.into(),
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now.clone(),
            modified_at: now,
            snapshot: ProjectSnapshot::new(),
        }
    }
}

/// Storage collaborator for the persisted triple.
pub trait ProjectPersistence {
    /// Load the last saved snapshot; `None` on first run.
    fn load(&self) -> Result<Option<ProjectSnapshot>, ProjectError>;

    /// Persist a snapshot.
    fn save(&self, snapshot: &ProjectSnapshot) -> Result<(), ProjectError>;
}

/// JSON-file persistence rooted at a project directory.
#[derive(Debug, Clone)]
pub struct JsonProjectStore {
    root: PathBuf,
}

impl JsonProjectStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_path(&self) -> PathBuf {
        self.root.join(META_DIR).join(PROJECT_FILE)
    }

    fn legacy_path(&self) -> PathBuf {
        self.root.join(LEGACY_STATE_FILE)
    }

    /// Project name derived from the directory name.
    fn default_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// Create a new project directory with an empty timeline.
    pub fn create(
        root: impl AsRef<Path>,
        name: impl Into<String>,
    ) -> Result<(Self, ProjectDocument), ProjectError> {
        let store = Self::new(root);
        let document = ProjectDocument::new(name);
        store.write_document(&document)?;
        Ok((store, document))
    }

    /// Read the full document, migrating the legacy file first if needed.
    pub fn load_document(&self) -> Result<Option<ProjectDocument>, ProjectError> {
        self.migrate_legacy()?;

        let path = self.project_path();
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let document: ProjectDocument =
            serde_json::from_str(&json).map_err(|e| ProjectError::ParseError { path, source: e })?;
        Ok(Some(document))
    }

    fn write_document(&self, document: &ProjectDocument) -> Result<(), ProjectError> {
        let meta_dir = self.root.join(META_DIR);
        std::fs::create_dir_all(&meta_dir).map_err(|e| ProjectError::IoError {
            path: meta_dir.clone(),
            source: e,
        })?;

        let path = self.project_path();
        let json = serde_json::to_string_pretty(document).map_err(|e| ProjectError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| ProjectError::IoError { path, source: e })
    }

    /// Move an unreadable file to `<name>.bak` so it is not parsed again.
    fn set_aside(&self, path: &Path) -> Result<(), ProjectError> {
        let mut backup = path.as_os_str().to_owned();
        backup.push(".bak");
        std::fs::rename(path, &backup).map_err(|e| ProjectError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// One-time import of the legacy flat state file.
    ///
    /// The legacy file is only deleted after the migrated document has been
    /// written, so an interrupted migration is retried on the next load.
    fn migrate_legacy(&self) -> Result<(), ProjectError> {
        let legacy = self.legacy_path();
        if !legacy.exists() {
            return Ok(());
        }

        let json = std::fs::read_to_string(&legacy).map_err(|e| ProjectError::IoError {
            path: legacy.clone(),
            source: e,
        })?;
        let snapshot: ProjectSnapshot =
            serde_json::from_str(&json).map_err(|e| ProjectError::ParseError {
                path: legacy.clone(),
                source: e,
            })?;

        if self.project_path().exists() {
            tracing::warn!(
                path = %legacy.display(),
                "Legacy state found next to a current project file; keeping current"
            );
        } else {
            let mut document = ProjectDocument::new(self.default_name());
            document.snapshot = snapshot.for_persistence();
            self.write_document(&document)?;
            tracing::info!(
                elements = document.snapshot.elements.len(),
                tracks = document.snapshot.tracks.len(),
                "Migrated legacy editor state"
            );
        }

        std::fs::remove_file(&legacy).map_err(|e| ProjectError::IoError {
            path: legacy,
            source: e,
        })
    }
}

impl ProjectPersistence for JsonProjectStore {
    fn load(&self) -> Result<Option<ProjectSnapshot>, ProjectError> {
        Ok(self.load_document()?.map(|doc| doc.snapshot))
    }

    fn save(&self, snapshot: &ProjectSnapshot) -> Result<(), ProjectError> {
        let mut document = match self.load_document() {
            Ok(Some(doc)) => doc,
            Ok(None) => ProjectDocument::new(self.default_name()),
            Err(ProjectError::ParseError { path, source }) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "Unreadable project file; starting a new document"
                );
                self.set_aside(&path)?;
                ProjectDocument::new(self.default_name())
            }
            Err(e) => return Err(e),
        };
        document.snapshot = snapshot.for_persistence();
        document.modified_at = chrono::Utc::now().to_rfc3339();
        self.write_document(&document)
    }
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ClipColor, Element, ElementType};
    use crate::props::ElementProps;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn image_with_asset() -> Element {
        Element {
            id: "img".to_string(),
            element_type: ElementType::Image,
            track_id: 1,
            name: "Photo".to_string(),
            start_time: 0.0,
            duration: 5.0,
            media_offset: 0.0,
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            z_index: 0,
            flip_x: false,
            flip_y: false,
            lock_aspect_ratio: true,
            transition_in: None,
            transition_out: None,
            clip_color: ClipColor::Default,
            asset_id: Some("asset-9".to_string()),
            props: ElementProps {
                src: Some("blob:ephemeral".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_document_serialization() {
        let doc = ProjectDocument::new("Test");
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let parsed: ProjectDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Test");
        assert_eq!(parsed.version, PROJECT_VERSION);
        assert_eq!(parsed.snapshot.tracks.len(), 3);
    }

    #[test]
    fn test_first_run_loads_none() {
        let dir = temp_root("layercut_test_first_run");
        let store = JsonProjectStore::new(&dir);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_strips_ephemeral_source() {
        let dir = temp_root("layercut_test_save_strip");
        let (store, _) = JsonProjectStore::create(&dir, "Strip").unwrap();

        let mut snapshot = ProjectSnapshot::new();
        snapshot.elements.push(image_with_asset());
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.elements.len(), 1);
        assert!(loaded.elements[0].props.src.is_none());
        assert_eq!(loaded.elements[0].asset_id.as_deref(), Some("asset-9"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_legacy_state_is_migrated_then_deleted() {
        let dir = temp_root("layercut_test_legacy");
        std::fs::create_dir_all(&dir).unwrap();

        let mut legacy = ProjectSnapshot::new();
        legacy.elements.push(image_with_asset());
        std::fs::write(
            dir.join(LEGACY_STATE_FILE),
            serde_json::to_string(&legacy).unwrap(),
        )
        .unwrap();

        let store = JsonProjectStore::new(&dir);
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.elements.len(), 1);
        assert!(!dir.join(LEGACY_STATE_FILE).exists());
        assert!(dir.join(META_DIR).join(PROJECT_FILE).exists());

        // Second load reads the migrated document.
        assert_eq!(store.load().unwrap().unwrap().elements.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_document_reports_parse_error() {
        let dir = temp_root("layercut_test_corrupt");
        std::fs::create_dir_all(dir.join(META_DIR)).unwrap();
        std::fs::write(dir.join(META_DIR).join(PROJECT_FILE), "{").unwrap();

        let err = JsonProjectStore::new(&dir).load().unwrap_err();
        assert!(matches!(err, ProjectError::ParseError { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_recovers_from_corrupt_document() {
        let dir = temp_root("layercut_test_save_corrupt");
        std::fs::create_dir_all(dir.join(META_DIR)).unwrap();
        std::fs::write(dir.join(META_DIR).join(PROJECT_FILE), "{").unwrap();

        let store = JsonProjectStore::new(&dir);
        let mut snapshot = ProjectSnapshot::new();
        snapshot.elements.push(image_with_asset());
        store.save(&snapshot).unwrap();

        let backup = std::fs::read_to_string(dir.join(META_DIR).join("project.json.bak")).unwrap();
        assert_eq!(backup, "{");
        assert_eq!(store.load().unwrap().unwrap().elements.len(), 1);

        // Later saves go through the normal path.
        store.save(&ProjectSnapshot::new()).unwrap();
        assert!(store.load().unwrap().unwrap().elements.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_legacy_file_does_not_block_save() {
        let dir = temp_root("layercut_test_save_corrupt_legacy");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(LEGACY_STATE_FILE), "not json").unwrap();

        let store = JsonProjectStore::new(&dir);
        store.save(&ProjectSnapshot::new()).unwrap();

        assert!(!dir.join(LEGACY_STATE_FILE).exists());
        assert!(dir.join("editor-state.json.bak").exists());
        assert!(store.load().unwrap().is_some());

        std::fs::remove_dir_all(&dir).ok();
    }
}
