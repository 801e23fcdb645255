//! Configuration for a merge run.
//!
//! Values are layered, lowest priority first:
//! built-in defaults, the user config file (`~/.config/jcmerge/jcmerge.toml`),
//! the project `jcmerge.toml` inside the library directory, an explicit
//! `--config` file, and finally command-line flags applied by the caller.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;

use crate::{
    curves::Curve,
    dirs,
    error::MergeError,
    transformer::TransformOptions,
    types::{FxIndexSet, LineEnding},
};

/// Files in the sources directory that never belong in the merged library
pub const DEFAULT_EXCLUDED_FILES: [&str; 3] = ["UnitTests.java", "Example.java", "Integer.java"];

/// The lock utility class, only merged when locks are kept
pub const LOCKER_FILE: &str = "ObjectLocker.java";

/// Fully resolved settings for one merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root directory of the library checkout
    pub dir: PathBuf,
    /// Package declaration written as the first line of output
    pub package: String,
    /// Destination of the merged file
    pub output: PathBuf,
    pub keep_locks: bool,
    /// Curve files appended after the sorted base files, in this order
    pub curves: Vec<Curve>,
    /// Name of the outer class holding every merged class
    pub wrapper_class: String,
    pub library_name: String,
    pub library_url: Option<String>,
    /// Explicit version; when unset it is read from `gradle_file`
    pub version: Option<String>,
    /// Sources directory, relative to `dir`
    pub sources: PathBuf,
    /// Gradle build script carrying `version '<x>'`, relative to `dir`
    pub gradle_file: PathBuf,
    /// Extra file names excluded on top of the defaults
    pub exclude: Vec<String>,
    pub indent: String,
    pub line_ending: LineEnding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            package: "your_package".to_owned(),
            output: PathBuf::from("jcmathlib.java"),
            keep_locks: false,
            curves: vec![Curve::default()],
            wrapper_class: "jcmathlib".to_owned(),
            library_name: "JCMathLib".to_owned(),
            library_url: Some("https://github.com/OpenCryptoProject/JCMathLib".to_owned()),
            version: None,
            sources: PathBuf::from("applet/src/main/java/opencrypto/jcmathlib"),
            gradle_file: PathBuf::from("applet/build.gradle"),
            exclude: Vec::new(),
            indent: "    ".to_owned(),
            line_ending: LineEnding::default(),
        }
    }
}

/// One layer of configuration as written in a `jcmerge.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub package: Option<String>,
    pub output: Option<PathBuf>,
    pub keep_locks: Option<bool>,
    pub curves: Option<Vec<String>>,
    pub wrapper_class: Option<String>,
    pub library_name: Option<String>,
    pub library_url: Option<String>,
    pub version: Option<String>,
    pub sources: Option<PathBuf>,
    pub gradle_file: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
    pub indent: Option<String>,
    pub line_ending: Option<LineEnding>,
}

impl ConfigFile {
    /// Parse a configuration layer, rejecting unknown keys
    pub fn parse(text: &str) -> Result<Self, MergeError> {
        toml::from_str(text).map_err(|e| MergeError::InvalidConfig(e.message().to_owned()))
    }

    /// Read a configuration layer from disk
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
        Self::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl Config {
    /// Defaults for the library rooted at `dir`
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Load every configuration layer that exists for `dir`
    ///
    /// The user and project files are optional; an explicit file must exist.
    pub fn load(dir: impl Into<PathBuf>, explicit: Option<&Path>) -> Result<Self> {
        let dir = dir.into();
        let mut layers: Vec<PathBuf> = dirs::user_config_file()
            .into_iter()
            .chain(std::iter::once(dirs::project_config_file(&dir)))
            .filter(|path| path.is_file())
            .collect();
        if let Some(explicit) = explicit {
            layers.push(explicit.to_path_buf());
        }
        Self::from_layers(dir, &layers)
    }

    /// Apply the given configuration files in order on top of the defaults
    pub fn from_layers(dir: impl Into<PathBuf>, layers: &[PathBuf]) -> Result<Self> {
        let mut config = Self::for_dir(dir);
        for path in layers {
            debug!("Applying configuration layer {}", path.display());
            config.apply(ConfigFile::read(path)?)?;
        }
        Ok(config)
    }

    /// Overlay the values set in `layer`
    pub fn apply(&mut self, layer: ConfigFile) -> Result<(), MergeError> {
        if let Some(curves) = layer.curves {
            self.curves = Curve::parse_all(&curves)?;
        }
        if let Some(package) = layer.package {
            self.package = package;
        }
        if let Some(output) = layer.output {
            self.output = output;
        }
        if let Some(keep_locks) = layer.keep_locks {
            self.keep_locks = keep_locks;
        }
        if let Some(wrapper_class) = layer.wrapper_class {
            self.wrapper_class = wrapper_class;
        }
        if let Some(library_name) = layer.library_name {
            self.library_name = library_name;
        }
        if layer.library_url.is_some() {
            self.library_url = layer.library_url.filter(|url| !url.is_empty());
        }
        if layer.version.is_some() {
            self.version = layer.version;
        }
        if let Some(sources) = layer.sources {
            self.sources = sources;
        }
        if let Some(gradle_file) = layer.gradle_file {
            self.gradle_file = gradle_file;
        }
        if let Some(exclude) = layer.exclude {
            self.exclude = exclude;
        }
        if let Some(indent) = layer.indent {
            self.indent = indent;
        }
        if let Some(line_ending) = layer.line_ending {
            self.line_ending = line_ending;
        }
        Ok(())
    }

    /// Check the values that end up verbatim in the generated Java
    pub fn validate(&self) -> Result<(), MergeError> {
        if self.package.trim().is_empty() {
            return Err(MergeError::InvalidConfig(
                "package name must not be empty".to_owned(),
            ));
        }
        if self.wrapper_class.trim().is_empty() {
            return Err(MergeError::InvalidConfig(
                "wrapper class name must not be empty".to_owned(),
            ));
        }
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(MergeError::InvalidConfig(format!(
                "indent must consist of spaces or tabs, got {:?}",
                self.indent
            )));
        }
        Ok(())
    }

    pub fn sources_dir(&self) -> PathBuf {
        self.dir.join(&self.sources)
    }

    pub fn gradle_path(&self) -> PathBuf {
        self.dir.join(&self.gradle_file)
    }

    /// File names left out of the base file list
    pub fn excluded_files(&self) -> FxIndexSet<String> {
        let mut excluded: FxIndexSet<String> = DEFAULT_EXCLUDED_FILES
            .iter()
            .map(|name| (*name).to_owned())
            .collect();
        if !self.keep_locks {
            excluded.insert(LOCKER_FILE.to_owned());
        }
        excluded.extend(self.exclude.iter().cloned());
        excluded
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            keep_locks: self.keep_locks,
            indent: self.indent.clone(),
        }
    }
}
