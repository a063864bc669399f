//! Error taxonomy for the solver (spec §7).
//!
//! Classification outcomes produced *inside* stages 3-5 (ambiguous
//! collisions, too-short typos, substring conflicts, exclusions) are not
//! errors — they are reported outcomes, see [`crate::reports`].

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CorrectorError {
    #[error("configuration error in field `{field}`: {message}")]
    Configuration { field: String, message: String },

    #[error("failed to read `{path}`: {source}")]
    InputIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("word source provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("internal invariant violated in stage `{stage}`: {detail} (typo={typo:?}, word={word:?})")]
    InvariantViolation {
        stage: &'static str,
        detail: String,
        typo: String,
        word: String,
    },

    #[error("failed to write output `{path}`: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in `{path}`: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
