//! End-to-end merge run.
//!
//! Every stage runs sequentially and aborts the run on the first error. The
//! merged text is rendered in memory before anything is written, so a failed
//! run never leaves a half-written output file behind.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    config::Config,
    emitter::{AssembledOutput, LibraryHeader},
    error::MergeError,
    imports,
    selector::SourceSelector,
    source::SourceFile,
    transformer,
    version::{self, FALLBACK_VERSION},
};

/// Where the merged file ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
}

/// Summary of a finished merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Files merged, in output order
    pub files: Vec<PathBuf>,
    pub import_count: usize,
    /// Files whose body was empty after filtering
    pub empty_bodies: usize,
    pub target: OutputTarget,
    pub bytes_written: usize,
}

#[derive(Debug)]
pub struct Merger {
    config: Config,
}

impl Merger {
    /// Validate `config` before any file is touched
    pub fn new(config: Config) -> Result<Self, MergeError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The ordered list of files this merge will include
    pub fn selected_files(&self) -> Result<Vec<PathBuf>> {
        let selector =
            SourceSelector::new(self.config.sources_dir(), self.config.excluded_files());
        let files = selector
            .select(&self.config.curves)
            .context("Failed to select library sources")?;
        Ok(files)
    }

    /// Merge the library into an in-memory string
    pub fn render(&self) -> Result<(String, RenderStats)> {
        let paths = self.selected_files()?;
        let files = paths
            .iter()
            .map(|path| SourceFile::read(path))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read library sources")?;

        let imports = imports::collect(&files);
        debug!("Collected {} imports from {} files", imports.len(), files.len());

        let options = self.config.transform_options();
        let bodies: Vec<_> = files
            .iter()
            .map(|file| transformer::transform(file, &options))
            .collect();
        let empty_bodies = bodies.iter().filter(|body| body.is_empty()).count();

        let stats = RenderStats {
            files: paths,
            import_count: imports.len(),
            empty_bodies,
        };
        let output = AssembledOutput {
            package: self.config.package.clone(),
            imports,
            header: Some(self.header()?),
            bodies,
            wrapper_class: self.config.wrapper_class.clone(),
            line_ending: self.config.line_ending,
        };
        Ok((output.render(), stats))
    }

    /// Merge the library and write it to `target`
    pub fn run(&self, target: &OutputTarget) -> Result<MergeOutcome> {
        let (text, stats) = self.render()?;
        match target {
            OutputTarget::File(path) => write_file(path, &text)?,
            OutputTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(text.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|e| MergeError::io("<stdout>", e))?;
            }
        }

        info!(
            "Merged {} files ({} imports) into {}",
            stats.files.len(),
            stats.import_count,
            match target {
                OutputTarget::File(path) => path.display().to_string(),
                OutputTarget::Stdout => "stdout".to_owned(),
            }
        );

        Ok(MergeOutcome {
            files: stats.files,
            import_count: stats.import_count,
            empty_bodies: stats.empty_bodies,
            target: target.clone(),
            bytes_written: text.len(),
        })
    }

    fn header(&self) -> Result<LibraryHeader> {
        let version = match &self.config.version {
            Some(version) => version.clone(),
            None => version::read_version(&self.config.gradle_path())?
                .unwrap_or_else(|| FALLBACK_VERSION.to_owned()),
        };
        Ok(LibraryHeader {
            name: self.config.library_name.clone(),
            version: Some(version),
            url: self.config.library_url.clone(),
        })
    }
}

/// Bookkeeping from [`Merger::render`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStats {
    pub files: Vec<PathBuf>,
    pub import_count: usize,
    pub empty_bodies: usize,
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| MergeError::io(parent, e))?;
    }
    fs::write(path, text).map_err(|e| MergeError::io(path, e))?;
    Ok(())
}
