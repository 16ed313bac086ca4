//! Asset store contract and source resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use layercut_project_model::Element;

/// A stored media blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    /// MIME type, e.g. `video/mp4`.
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Asset store errors.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {id}")]
    NotFound { id: String },

    #[error("Asset store error: {message}")]
    Backend { message: String },
}

/// Storage for media blobs referenced by `Element::asset_id`.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    async fn get_asset_by_id(&self, id: &str) -> Result<Option<Asset>, AssetError>;

    /// All assets, newest first.
    async fn list_assets(&self) -> Result<Vec<Asset>, AssetError>;

    async fn save_asset(
        &self,
        data: Vec<u8>,
        mime_type: &str,
        name: &str,
    ) -> Result<Asset, AssetError>;

    /// Playable source handle for an asset, or `None` if it is gone.
    async fn resolve_source(&self, id: &str) -> Result<Option<String>, AssetError> {
        Ok(self
            .get_asset_by_id(id)
            .await?
            .map(|asset| format!("blob:layercut/{}", asset.id)))
    }
}

/// In-process asset store.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    // Insertion order is creation order.
    assets: RwLock<Vec<Asset>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.assets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.assets.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl AssetStore for MemoryAssetStore {
    async fn get_asset_by_id(&self, id: &str) -> Result<Option<Asset>, AssetError> {
        Ok(self.assets.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, AssetError> {
        Ok(self.assets.read().await.iter().rev().cloned().collect())
    }

    async fn save_asset(
        &self,
        data: Vec<u8>,
        mime_type: &str,
        name: &str,
    ) -> Result<Asset, AssetError> {
        let asset = Asset {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            created_at: Utc::now(),
            data,
        };
        tracing::debug!(asset_id = %asset.id, bytes = asset.data.len(), "Saved asset");
        self.assets.write().await.push(asset.clone());
        Ok(asset)
    }
}

/// Fill `props.src` from `asset_id` for every element that has one.
///
/// Elements whose asset is missing or fails to resolve get no source and
/// render as placeholders. Returns how many sources were resolved.
pub async fn resolve_sources(elements: &mut [Element], assets: &dyn AssetStore) -> usize {
    let mut resolved = 0;
    for element in elements.iter_mut() {
        let Some(asset_id) = element.asset_id.clone() else {
            continue;
        };
        match assets.resolve_source(&asset_id).await {
            Ok(Some(src)) => {
                element.props.src = Some(src);
                resolved += 1;
            }
            Ok(None) => {
                tracing::warn!(element_id = %element.id, asset_id = %asset_id, "Referenced asset is missing");
                element.props.src = None;
            }
            Err(e) => {
                tracing::warn!(element_id = %element.id, asset_id = %asset_id, error = %e, "Failed to resolve asset");
                element.props.src = None;
            }
        }
    }
    resolved
}
