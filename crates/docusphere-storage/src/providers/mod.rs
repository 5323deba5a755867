//! Asset store adapter implementations.

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

pub use local::LocalAssetStore;
#[cfg(feature = "s3")]
pub use s3::S3AssetStore;

use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_core::traits::asset::AssetUrlOptions;

/// Reject asset ids that could escape the asset root.
pub(crate) fn validate_asset_id(asset_id: &str) -> AppResult<()> {
    let escapes = asset_id.is_empty()
        || asset_id.starts_with('/')
        || asset_id.contains('\\')
        || asset_id.split('/').any(|segment| segment.is_empty() || segment == "..");
    if escapes {
        return Err(AppError::validation(format!("Invalid asset id: '{asset_id}'")));
    }
    Ok(())
}

/// Render delivery options as a query string (empty for the original).
pub(crate) fn delivery_query(options: &AssetUrlOptions) -> String {
    let mut params = Vec::new();
    if let Some(width) = options.width {
        params.push(format!("w={width}"));
    }
    if let Some(height) = options.height {
        params.push(format!("h={height}"));
    }
    if let Some(crop) = &options.crop {
        params.push(format!("c={}", urlencoding::encode(crop)));
    }
    if let Some(page) = options.page {
        params.push(format!("pg={page}"));
    }
    if options.attachment {
        params.push("download=1".to_string());
    }
    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_asset_id() {
        assert!(validate_asset_id("app-files/0191.pdf").is_ok());
        assert!(validate_asset_id("../etc/passwd").is_err());
        assert!(validate_asset_id("/abs/path").is_err());
        assert!(validate_asset_id("a//b").is_err());
        assert!(validate_asset_id("").is_err());
    }

    #[test]
    fn test_delivery_query() {
        assert_eq!(delivery_query(&AssetUrlOptions::original()), "");
        assert_eq!(delivery_query(&AssetUrlOptions::download()), "?download=1");
        assert_eq!(
            delivery_query(&AssetUrlOptions::resized(150, 150, "fill")),
            "?w=150&h=150&c=fill"
        );
        assert_eq!(delivery_query(&AssetUrlOptions::page(1)), "?pg=1");
    }
}
