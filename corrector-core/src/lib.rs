//! Autocorrect dictionary solver.
//!
//! Turns a corpus of source words into a consistent set of
//! `(typo, word, boundary)` corrections for a text-expander or a firmware
//! steno-style matcher. The hard part lives in [`pipeline`]: collision
//! resolution, pattern generalization and substring-conflict removal over
//! tens of thousands of candidates.

pub mod boundary;
pub mod config;
pub mod correction;
pub mod dictionary;
pub mod error;
pub mod exclusions;
pub mod index;
pub mod pattern;
pub mod pipeline;
pub mod platform;
pub mod reports;
pub mod tracer;
pub mod typo_gen;

pub use boundary::Boundary;
pub use config::Config;
pub use correction::Correction;
pub use error::CorrectorError;
pub use pattern::Pattern;
