//! Top-level module for the chat-log statistics system.
//!
//! This module provides:
//! - The persisted frequency model (`FrequencyModel`)
//! - Transcript parsing and model accumulation (`ModelBuilder`)
//! - Weighted random sampling (`weighted_choice`)
//! - A sentence generation interface (`SentenceGenerator`)

/// Unigram, bigram and sentence boundary counts plus sentence length statistics.
///
/// Serialized as the flat JSON snapshot shared by builder and generator.
pub mod frequency_model;

/// Transcript line matching and incremental model construction.
pub mod builder;

/// Loads a frequency model and produces random sentences from it.
pub mod generator;

/// Weighted random selection over `(item, weight)` pairs.
pub mod weighted;
