use std::{
    fs,
    path::{Path, PathBuf},
};

use log::trace;

use crate::error::MergeError;

/// One library source file, read in full
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl SourceFile {
    /// Split `text` into lines; a leading byte-order mark is not content
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    /// Read the file, releasing the handle before returning
    pub fn read(path: &Path) -> Result<Self, MergeError> {
        let text = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
        let file = Self::new(path, &text);
        trace!("Read {} ({} lines)", path.display(), file.lines.len());
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without directories, used in log messages
    pub fn name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_lines_drop_terminators() {
        let file = SourceFile::new("A.java", "class A {\r\n}\n");
        assert_eq!(file.lines().collect::<Vec<_>>(), vec!["class A {", "}"]);
        assert_eq!(file.name(), "A.java");
    }

    #[test]
    fn test_byte_order_mark_is_stripped() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("Bom.java");
        fs::write(&path, "\u{feff}package a.b;\r\nimport a.b.C;\r\n")?;

        let file = SourceFile::read(&path)?;
        assert_eq!(file.path(), path);
        assert_eq!(
            file.lines().collect::<Vec<_>>(),
            vec!["package a.b;", "import a.b.C;"]
        );
        Ok(())
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Missing.java");
        let err = SourceFile::read(&path).unwrap_err();
        match err {
            MergeError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
