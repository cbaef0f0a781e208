use crate::data::labels::{LabelError, label_from_path};

use color_eyre::{
    Result,
    eyre::{WrapErr, bail},
};
use std::path::{Path, PathBuf};

/// An image file whose name carries its ground-truth label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledSample {
    pub path: PathBuf,
    pub label: usize,
}

impl LabeledSample {
    pub fn from_path(path: PathBuf) -> Result<Self, LabelError> {
        let label = label_from_path(&path)?;
        Ok(Self { path, label })
    }
}

/// Lists the regular files directly inside `dir`, sorted by name.
///
/// Subdirectories are not descended into.
pub fn list_sample_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Sample directory not found: {dir:?}");
    }
    let mut files = Vec::new();
    for entry in
        std::fs::read_dir(dir).wrap_err_with(|| format!("Failed to list directory {dir:?}"))?
    {
        let entry = entry.wrap_err_with(|| format!("Failed to read entry in {dir:?}"))?;
        let file_type = entry
            .file_type()
            .wrap_err_with(|| format!("Failed to stat {:?}", entry.path()))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Lists and labels every sample in `dir`. A single malformed file name fails the whole listing.
pub fn load_samples(dir: &Path) -> Result<Vec<LabeledSample>> {
    list_sample_files(dir)?
        .into_iter()
        .map(|path| LabeledSample::from_path(path).map_err(Into::into))
        .collect()
}
