//! Source file selection
//!
//! The order produced here is the order of the nested classes in the merged
//! output: every eligible file of the sources directory sorted by name,
//! followed by one file per requested curve in the order requested.

use std::{ffi::OsStr, fs, path::PathBuf};

use log::{debug, trace};

use crate::{curves::Curve, error::MergeError, types::FxIndexSet};

/// Extension of the files that make up the library
pub const SOURCE_EXTENSION: &str = "java";

/// Subdirectory of the sources directory holding the curve definitions
pub const CURVES_DIR: &str = "curves";

#[derive(Debug)]
pub struct SourceSelector {
    sources_dir: PathBuf,
    excluded: FxIndexSet<String>,
}

impl SourceSelector {
    pub fn new(sources_dir: impl Into<PathBuf>, excluded: FxIndexSet<String>) -> Self {
        Self {
            sources_dir: sources_dir.into(),
            excluded,
        }
    }

    /// Resolve the ordered list of files to merge
    pub fn select(&self, curves: &[Curve]) -> Result<Vec<PathBuf>, MergeError> {
        let mut files = self.base_files()?;
        debug!(
            "Selected {} base files from {}",
            files.len(),
            self.sources_dir.display()
        );

        for curve in curves {
            let path = self.curve_file(*curve);
            if !path.is_file() {
                return Err(MergeError::io(
                    &path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "curve source not found"),
                ));
            }
            trace!("Appending curve file {}", path.display());
            files.push(path);
        }
        Ok(files)
    }

    /// Path of the source file defining `curve`
    pub fn curve_file(&self, curve: Curve) -> PathBuf {
        self.sources_dir.join(CURVES_DIR).join(curve.file_name())
    }

    fn base_files(&self) -> Result<Vec<PathBuf>, MergeError> {
        let entries =
            fs::read_dir(&self.sources_dir).map_err(|e| MergeError::io(&self.sources_dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MergeError::io(&self.sources_dir, e))?;
            let path = entry.path();
            if !path.is_file() || path.extension() != Some(OsStr::new(SOURCE_EXTENSION)) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.excluded.contains(&name) {
                trace!("Excluding {name}");
                continue;
            }
            files.push((name, path));
        }

        // read_dir order is platform dependent
        files.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }
}
