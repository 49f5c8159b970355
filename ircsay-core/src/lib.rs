//! Chat-log statistics and sentence generation library.
//!
//! This crate provides a small word-level Markov toolkit:
//! - A transcript parser accumulating unigram/bigram and sentence boundary counts
//! - A persisted frequency model (flat JSON snapshot)
//! - A sentence generator performing weighted random walks over the bigram graph
//!
//! Builder and generator only share the `FrequencyModel` snapshot.

/// Frequency model, transcript parsing and sentence generation.
pub mod model;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (lossy transcript reading).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Error, Result};
pub use model::builder::{LineOutcome, LogLine, ModelBuilder};
pub use model::frequency_model::FrequencyModel;
pub use model::generator::{SentenceGenerator, DEFAULT_MAX_WORDS};
