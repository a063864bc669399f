//! External dictionary/frequency collaborators (spec §1, §6).
//!
//! These are narrow, pure-function interfaces by design: the solver
//! doesn't care whether the English word list comes from a flat file, an
//! embedded FST, or a network service, only that it answers `contains`,
//! `frequency` and `top_n`.

pub mod adjacency;
pub mod include;
pub mod word_source;

pub use word_source::WordSource;
