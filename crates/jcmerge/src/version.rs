//! Library version lookup in the Gradle build script

use std::{fs, io::ErrorKind, path::Path};

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MergeError;

/// Written into the header when no version can be found
pub const FALLBACK_VERSION: &str = "0.0";

static VERSION_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bversion\s*=?\s*['"]([^'"]*)['"]"#).expect("version pattern is valid")
});

/// First `version '<x>'` found in `text`
pub fn find_version(text: &str) -> Option<String> {
    text.lines()
        .find_map(|line| VERSION_ASSIGNMENT.captures(line))
        .map(|captures| captures[1].to_owned())
}

/// Read the version declared in the build script at `path`
///
/// A missing build script is not an error; the caller falls back to
/// [`FALLBACK_VERSION`].
pub fn read_version(path: &Path) -> Result<Option<String>, MergeError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("No build script at {}, version unknown", path.display());
            return Ok(None);
        }
        Err(e) => return Err(MergeError::io(path, e)),
    };

    let version = find_version(&text);
    match &version {
        Some(version) => debug!("Library version {version} from {}", path.display()),
        None => warn!("No version declaration in {}", path.display()),
    }
    Ok(version)
}
