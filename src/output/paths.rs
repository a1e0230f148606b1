// src/output/paths.rs
//! Pure functions for path calculations.
//!
//! Nothing here touches the filesystem.

use crate::error::AppError;
use std::path::{Path, PathBuf};

/// Sanitizes a string to be safe for use as a file or directory name.
pub fn sanitize_filename(name: &str) -> String {
    let mut safe_name = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>();

    safe_name = safe_name.trim().trim_matches('.').to_string();

    if safe_name.is_empty() {
        safe_name = "unnamed".to_string();
    }

    safe_name
}

/// Asset directory used when none is given: a sibling of the output file
/// named after its stem (`notes/page.md` keeps assets in `notes/page_assets/`).
pub fn default_asset_dir(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir_name = format!("{}_assets", sanitize_filename(&stem));
    match output.parent() {
        Some(parent) => parent.join(dir_name),
        None => PathBuf::from(dir_name),
    }
}

/// Calculates the path of `to` as seen from the directory containing the
/// file `from`, with forward slashes for Markdown links.
pub fn get_relative_path(from: &Path, to: &Path) -> Result<String, AppError> {
    let from_dir = from.parent().unwrap_or_else(|| Path::new("."));

    let relative = pathdiff::diff_paths(to, from_dir).ok_or_else(|| {
        AppError::PathError(format!(
            "Could not calculate relative path from {} to {}",
            from.display(),
            to.display()
        ))
    })?;

    Ok(relative.to_string_lossy().replace('\\', "/"))
}
