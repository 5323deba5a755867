//! Builds the configured asset store.

use std::sync::Arc;

use tracing::info;

use docusphere_core::config::StorageConfig;
use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_core::traits::asset::AssetStore;

use crate::providers::LocalAssetStore;

/// Create the asset store named by `storage.provider`.
pub async fn build_asset_store(config: &StorageConfig) -> AppResult<Arc<dyn AssetStore>> {
    let store: Arc<dyn AssetStore> = match config.provider.as_str() {
        "local" => {
            info!(root = %config.local.root_path, "Initializing local asset store");
            Arc::new(LocalAssetStore::new(&config.local, &config.asset_folder).await?)
        }
        #[cfg(feature = "s3")]
        "s3" => Arc::new(crate::providers::S3AssetStore::new(&config.s3, &config.asset_folder).await?),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown asset store provider: '{other}'. Supported: {}",
                supported()
            )));
        }
    };
    Ok(store)
}

fn supported() -> &'static str {
    if cfg!(feature = "s3") { "local, s3" } else { "local" }
}
