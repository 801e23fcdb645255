//! Shared type definitions for the jcmerge crate
//!
//! Common types used across the selector, transformer and emitter so that the
//! merge pipeline agrees on hashing and line termination.

use std::hash::BuildHasherDefault;

use clap::ValueEnum;
use indexmap::IndexSet;
use rustc_hash::FxHasher;
use serde::Deserialize;

/// Insertion-ordered set with the fast non-cryptographic hasher
pub type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

/// Line terminator written between lines of the merged output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Unix line feed (`\n`)
    #[default]
    Lf,

    /// Windows carriage return + line feed (`\r\n`)
    Crlf,

    /// Whatever the host platform uses
    Native,
}

impl LineEnding {
    /// The literal terminator for this line ending
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
            Self::Native => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}

impl std::fmt::Display for LineEnding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lf => write!(f, "lf"),
            Self::Crlf => write!(f, "crlf"),
            Self::Native => write!(f, "native"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ending_literals() {
        assert_eq!(LineEnding::Lf.as_str(), "\n");
        assert_eq!(LineEnding::Crlf.as_str(), "\r\n");
        assert!(LineEnding::Native.as_str().ends_with('\n'));
    }

    #[test]
    fn test_line_ending_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Holder {
            line_ending: LineEnding,
        }

        let holder: Holder = toml::from_str("line_ending = \"crlf\"").expect("valid toml");
        assert_eq!(holder.line_ending, LineEnding::Crlf);
    }
}
