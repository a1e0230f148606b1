// src/assets/resolver.rs
//! Maps remote file URLs to local files, downloading each at most once.
//!
//! Target names are `{tag}_{file_name}`, where the tag is derived from the
//! URL path alone. Notion-hosted URLs carry a fresh signature in their query
//! string on every fetch, so hashing the path keeps the name stable across
//! runs and a file already on disk is reused.

use super::{AssetReference, AssetStore};
use crate::constants::ASSET_TAG_LEN;
use crate::error::{AppError, ConversionError};
use crate::error_recovery::with_timeout;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};

/// Where resolved assets land and how the document links to them.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub destination_dir: PathBuf,
    /// Prefix joined to the target name in the document, typically the
    /// destination directory relative to the markdown file. Empty for none.
    pub link_prefix: String,
    /// When false every asset keeps its remote link.
    pub download: bool,
    /// Deadline for one download.
    pub timeout: Duration,
}

pub struct AssetResolver {
    store: Arc<dyn AssetStore>,
    options: ResolverOptions,
    permits: Arc<Semaphore>,
    /// One lock per target name; concurrent resolutions of the same file queue here.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// The parts of a URL path that naming depends on.
#[derive(Debug, PartialEq, Eq)]
struct UrlFile {
    path: String,
    file_name: String,
    stem: String,
    has_extension: bool,
}

impl UrlFile {
    fn parse(url: &str) -> Option<Self> {
        let parsed = url::Url::parse(url).ok()?;
        let path = parsed.path().to_string();
        let file_name = path.rsplit('/').next().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return None;
        }

        let (stem, has_extension) = match Path::new(&file_name).extension() {
            Some(_) => (
                Path::new(&file_name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file_name.clone()),
                true,
            ),
            None => (file_name.clone(), false),
        };

        Some(Self {
            path,
            file_name,
            stem,
            has_extension,
        })
    }
}

/// Short hex tag of a URL path. Same path, same tag, in every run.
pub fn content_tag(path: &str) -> String {
    let digest = blake3::hash(path.as_bytes()).to_hex();
    digest.as_str()[..ASSET_TAG_LEN].to_string()
}

impl AssetResolver {
    pub fn new(store: Arc<dyn AssetStore>, options: ResolverOptions, permits: Arc<Semaphore>) -> Self {
        Self {
            store,
            options,
            permits,
            locks: DashMap::new(),
        }
    }

    pub fn destination_dir(&self) -> &Path {
        &self.options.destination_dir
    }

    /// The on-disk name `url` resolves to, or `None` when it would not be
    /// downloaded at all.
    pub fn target_name(url: &str) -> Option<String> {
        let file = UrlFile::parse(url)?;
        file.has_extension
            .then(|| format!("{}_{}", content_tag(&file.path), file.file_name))
    }

    /// Resolves `url` into the configured destination directory.
    pub async fn resolve(&self, url: &str) -> AssetReference {
        self.resolve_into(url, &self.options.destination_dir).await
    }

    /// Resolves `url` to a display name and a link. Never fails: every
    /// problem degrades to keeping the remote URL.
    pub async fn resolve_into(&self, url: &str, destination_dir: &Path) -> AssetReference {
        let Some(file) = UrlFile::parse(url) else {
            log::warn!("Cannot derive a file name from {}, keeping the link", url);
            return AssetReference::remote(url, url);
        };

        if !self.options.download {
            return AssetReference::remote(file.file_name, url);
        }
        if !file.has_extension {
            log::debug!("{} has no extension, keeping the link", url);
            return AssetReference::remote(file.file_name, url);
        }

        let target_name = format!("{}_{}", content_tag(&file.path), file.file_name);

        match self.fetch_once(url, destination_dir, &target_name).await {
            Ok(()) => AssetReference {
                display_name: file.stem,
                location: self.link_to(&target_name),
            },
            Err(source) => {
                let failure = ConversionError::AssetFetchFailure {
                    url: url.to_string(),
                    source,
                };
                log::warn!("{}; keeping the remote link", failure);
                AssetReference::remote(file.file_name, url)
            }
        }
    }

    async fn fetch_once(
        &self,
        url: &str,
        destination_dir: &Path,
        target_name: &str,
    ) -> Result<(), AppError> {
        let lock = self
            .locks
            .entry(target_name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let target = destination_dir.join(target_name);
        if tokio::fs::try_exists(&target).await? {
            log::info!("{} already present, skipping download", target.display());
            return Ok(());
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AppError::InternalError {
                message: format!("Permit pool closed: {}", e),
            })?;
        with_timeout(
            "asset download",
            self.options.timeout,
            self.store.download(url, destination_dir, target_name),
        )
        .await?;
        Ok(())
    }

    fn link_to(&self, target_name: &str) -> String {
        let prefix = self.options.link_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            target_name.to_string()
        } else {
            format!("{}/{}", prefix, target_name)
        }
    }
}
