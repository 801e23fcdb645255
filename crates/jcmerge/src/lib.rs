//! Merge a multi-file JavaCard library into a single `.java` file.
//!
//! The pipeline is [`selector`] → [`imports`] + [`transformer`] → [`emitter`],
//! driven by [`orchestrator::Merger`].

pub mod config;
pub mod curves;
pub mod dirs;
pub mod emitter;
pub mod error;
pub mod imports;
pub mod orchestrator;
pub mod selector;
pub mod source;
pub mod transformer;
pub mod types;
pub mod version;
