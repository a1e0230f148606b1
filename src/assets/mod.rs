// src/assets/mod.rs
//! Media referenced by blocks: where files go and how they get there.

mod http_store;
mod resolver;

use crate::error::AppError;
use std::path::{Path, PathBuf};

pub use http_store::HttpAssetStore;
pub use resolver::{AssetResolver, ResolverOptions};

/// Moves the bytes of a remote file onto local disk.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    /// Downloads `url` into `destination_dir/target_name` and returns the
    /// written path. A partially written file must never be left under
    /// `target_name`.
    async fn download(
        &self,
        url: &str,
        destination_dir: &Path,
        target_name: &str,
    ) -> Result<PathBuf, AppError>;
}

/// How a media block refers to its file in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    /// Label shown for the file: the stem when downloaded, else the file name.
    pub display_name: String,
    /// Relative local path, or the original URL when nothing was downloaded.
    pub location: String,
}

impl AssetReference {
    pub fn remote(display_name: impl Into<String>, url: &str) -> Self {
        Self {
            display_name: display_name.into(),
            location: url.to_string(),
        }
    }
}
