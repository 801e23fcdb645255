//! Per-file source transformation.
//!
//! Each file is filtered line by line: package and import declarations go
//! away, lock handling is optionally stripped, and the top-level class becomes
//! a static nested class of the wrapper. The rules are purely textual; no
//! Java parsing takes place, so a region marker or lock call inside a string
//! literal is treated exactly like real code.

use std::path::Path;

use cow_utils::CowUtils;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{error::MergeError, imports::is_import_declaration, source::SourceFile};

/// Opens a block of code that only exists for the object locker
pub const REGION_BEGIN_MARKER: &str = "[DependencyBegin:ObjectLocker]";

/// Closes a block opened by [`REGION_BEGIN_MARKER`]
pub const REGION_END_MARKER: &str = "[DependencyEnd:ObjectLocker]";

/// Declaration phrase of a top-level class
pub const TOP_LEVEL_CLASS: &str = "public class ";

/// The same declaration as a nested class of the wrapper
pub const NESTED_CLASS: &str = "public static class ";

static PACKAGE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*package\s+[\w$]+(?:\s*\.\s*[\w$]+)*\s*;").expect("package pattern is valid")
});

// Method calls only: `rm.lock(x)`, `bn.unlock()`, `locker.registerLock(a)`.
// A bare name would also hit declarations such as `public void lock() {` and
// break the class body.
static LOCK_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(?:un)?lock\(.*\)").expect("lock pattern is valid"));

static REGISTER_LOCK_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.registerLock\(").expect("registerLock pattern is valid"));

/// Per-file behaviour switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Keep lock/unlock calls and locker-only regions
    pub keep_locks: bool,
    /// Prefix added to every emitted line
    pub indent: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            keep_locks: false,
            indent: "    ".to_owned(),
        }
    }
}

/// Whether the filter is currently inside a locker-only region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RegionState {
    #[default]
    Passing,
    Skipping,
}

/// Why a line did not make it into the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dropped {
    Marker,
    Region,
    Declaration,
    Lock,
}

/// A file's content ready to be nested in the wrapper class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformedBody {
    lines: Vec<String>,
}

impl TransformedBody {
    /// Build a body from already transformed lines, trimming blank edges
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut body = Self { lines };
        body.trim_blank_edges();
        body
    }

    fn trim_blank_edges(&mut self) {
        let trailing = self
            .lines
            .iter()
            .rev()
            .take_while(|line| line.trim().is_empty())
            .count();
        self.lines.truncate(self.lines.len() - trailing);
        let leading = self
            .lines
            .iter()
            .take_while(|line| line.trim().is_empty())
            .count();
        self.lines.drain(..leading);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

struct LineFilter<'a> {
    options: &'a TransformOptions,
    state: RegionState,
}

impl<'a> LineFilter<'a> {
    fn new(options: &'a TransformOptions) -> Self {
        Self {
            options,
            state: RegionState::Passing,
        }
    }

    fn classify(&mut self, line: &str) -> Option<Dropped> {
        if line.contains(REGION_END_MARKER) {
            self.state = RegionState::Passing;
            return Some(Dropped::Marker);
        }
        if line.contains(REGION_BEGIN_MARKER) {
            if !self.options.keep_locks {
                self.state = RegionState::Skipping;
            }
            return Some(Dropped::Marker);
        }
        if self.state == RegionState::Skipping {
            return Some(Dropped::Region);
        }
        if is_import_declaration(line) || PACKAGE_DECLARATION.is_match(line) {
            return Some(Dropped::Declaration);
        }
        if (!self.options.keep_locks && LOCK_CALL.is_match(line))
            || REGISTER_LOCK_CALL.is_match(line)
        {
            return Some(Dropped::Lock);
        }
        None
    }

    fn rewrite(&self, line: &str) -> String {
        let nested = line.cow_replace(TOP_LEVEL_CLASS, NESTED_CLASS);
        let mut out = String::with_capacity(self.options.indent.len() + nested.len());
        out.push_str(&self.options.indent);
        out.push_str(&nested);
        out.truncate(out.trim_end().len());
        out
    }
}

/// Transform one file's lines into a nested-class body
pub fn transform(file: &SourceFile, options: &TransformOptions) -> TransformedBody {
    let mut filter = LineFilter::new(options);
    let mut lines = Vec::with_capacity(file.line_count());
    let mut dropped = 0usize;

    for (index, line) in file.lines().enumerate() {
        match filter.classify(line) {
            Some(reason) => {
                trace!("{}:{}: dropped ({reason:?})", file.name(), index + 1);
                dropped += 1;
            }
            None => lines.push(filter.rewrite(line)),
        }
    }

    if filter.state == RegionState::Skipping {
        debug!(
            "{}: `{REGION_BEGIN_MARKER}` never closed, rest of file skipped",
            file.name()
        );
    }

    let body = TransformedBody::from_lines(lines);
    debug!(
        "Transformed {}: {} lines kept, {dropped} dropped",
        file.name(),
        body.len()
    );
    body
}

/// Read and transform the file at `path`
pub fn transform_path(path: &Path, options: &TransformOptions) -> Result<TransformedBody, MergeError> {
    let file = SourceFile::read(path)?;
    Ok(transform(&file, options))
}
