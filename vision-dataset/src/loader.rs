//! Folder-layout dataset loader.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use vision_types::LabeledImage;

use crate::error::{DatasetError, Result};

/// Loads labeled examples from a class-per-directory layout.
///
/// The immediate subdirectories of `root` are class labels; the files
/// inside each subdirectory are the example images for that label. No
/// format validation happens here; undecodable files surface later, at
/// preprocessing time.
///
/// Entries are enumerated in sorted order so repeated runs over the same
/// tree produce the same example list. Callers must still shuffle before
/// splitting: enumeration order groups examples by label and must not
/// leak into train/test membership.
///
/// # Errors
///
/// Returns [`DatasetError::RootNotFound`] or
/// [`DatasetError::NotADirectory`] for an invalid root, and
/// [`DatasetError::Io`] if a directory cannot be read. A label directory
/// with zero files is a warning, not an error; no partial dataset is
/// ever returned alongside an error.
pub fn load_examples(root: &Path) -> Result<Vec<LabeledImage>> {
    if !root.exists() {
        return Err(DatasetError::root_not_found(root.display().to_string()));
    }
    if !root.is_dir() {
        return Err(DatasetError::not_a_directory(root.display().to_string()));
    }

    let mut examples = Vec::new();
    for dir in sorted_entries(root, |p| p.is_dir())? {
        let Some(label) = dir.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            warn!(path = %dir.display(), "skipping label directory with non-UTF8 name");
            continue;
        };

        let files = sorted_entries(&dir, |p| p.is_file())?;
        if files.is_empty() {
            warn!(label = %label, "label directory contains no images");
            continue;
        }

        debug!(label = %label, count = files.len(), "found label directory");
        examples.extend(
            files
                .into_iter()
                .map(|path| LabeledImage::new(path, label.clone())),
        );
    }

    Ok(examples)
}

/// Enumerates entries of `dir` matching `keep`, sorted by path.
fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| keep(path))
        .collect();
    entries.sort();
    Ok(entries)
}
