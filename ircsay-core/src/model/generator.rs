use std::collections::HashMap;
use std::path::Path;

use rand::Rng;

use super::frequency_model::FrequencyModel;
use super::weighted::weighted_choice;
use crate::error::{Error, Result};

/// Hard cap on the number of words in a generated sentence, first word included.
///
/// The stop rule is probabilistic and may never fire on some models
/// (e.g. a word that loops onto itself but never ends a message).
pub const DEFAULT_MAX_WORDS: usize = 100;

/// Produces random sentences from a read-only `FrequencyModel`.
///
/// # Responsibilities
/// - Pick a first word weighted by how often it started a message
/// - Extend the sentence along the bigram graph, weighted by pair frequency
/// - Stop with a chance that grows once the sentence exceeds the mean length,
///   scaled by how often the current word ended a message
///
/// Generation only borrows `self`, so a single generator can be shared by
/// concurrent callers as long as each one brings its own random source.
#[derive(Debug, Clone)]
pub struct SentenceGenerator {
	model: FrequencyModel,
	/// `(word, start count)` in model order.
	start_choices: Vec<(String, f64)>,
	/// First word -> `(second word, count / distinct bigrams)`.
	successors: HashMap<String, Vec<(String, f64)>>,
	max_words: usize,
}

impl SentenceGenerator {
	/// Wraps a model and indexes its bigrams by first word.
	pub fn new(model: FrequencyModel) -> Self {
		let distinct_bigrams = model.distinct_bigrams() as f64;

		let mut successors: HashMap<String, Vec<(String, f64)>> = HashMap::new();
		for ((first, second), count) in model.bigrams() {
			successors
				.entry(first.to_owned())
				.or_default()
				.push((second.to_owned(), count as f64 / distinct_bigrams));
		}

		let start_choices = model
			.start_words()
			.map(|(word, count)| (word.to_owned(), count as f64))
			.collect();

		Self { model, start_choices, successors, max_words: DEFAULT_MAX_WORDS }
	}

	/// Builds a generator from a JSON snapshot.
	///
	/// # Errors
	/// Returns `Error::CorruptModel` if the snapshot is malformed.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		FrequencyModel::from_json(bytes).map(Self::new)
	}

	/// Builds a generator from a snapshot file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		FrequencyModel::load(path).map(Self::new)
	}

	/// Sets the maximum number of words per sentence (at least one).
	pub fn with_max_words(mut self, max_words: usize) -> Self {
		self.max_words = max_words.max(1);
		self
	}

	pub fn max_words(&self) -> usize {
		self.max_words
	}

	pub fn model(&self) -> &FrequencyModel {
		&self.model
	}

	/// Occurrences of `word` divided by the number of distinct words.
	///
	/// The denominator is the vocabulary size, not the token count, so
	/// frequent words in a small vocabulary can exceed `1.0`.
	/// Returns `0.0` for unseen words.
	pub fn word_probability(&self, word: &str) -> f64 {
		match self.model.unigrams.get(word) {
			Some(count) => *count as f64 / self.model.distinct_unigrams() as f64,
			None => 0.0,
		}
	}

	/// Words observed right after `word`, each with its pair count divided
	/// by the number of distinct bigrams.
	///
	/// Empty if `word` never precedes another word.
	pub fn possible_next_words(&self, word: &str) -> &[(String, f64)] {
		self.successors.get(word).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Picks a successor of `prev_word`, weighted by bigram frequency.
	///
	/// # Errors
	/// Returns `Error::NoSuccessor` if `prev_word` has no outgoing bigram.
	pub fn predict_next_word<R>(&self, prev_word: &str, rng: &mut R) -> Result<&str>
	where
		R: Rng + ?Sized,
	{
		let choices = self.possible_next_words(prev_word);
		if choices.is_empty() {
			return Err(Error::NoSuccessor(prev_word.to_owned()));
		}
		weighted_choice(choices, rng).map(String::as_str)
	}

	/// Share of messages ending with `word`, over the distinct end words.
	fn end_probability(&self, word: &str) -> f64 {
		match self.model.end_words.get(word) {
			Some(count) => *count as f64 / self.model.distinct_end_words() as f64,
			None => 0.0,
		}
	}

	/// Probability of stopping after `word` at continuation index `position`.
	///
	/// Zero while `position` is below the mean sentence length.
	fn finish_chance(&self, word: &str, position: usize) -> f64 {
		let mean = self.model.mean_sentence_length();
		let overshoot = (position as f64 - mean) / mean;
		// NaN (zero mean, zero end probability) counts as no chance
		(self.end_probability(word) * overshoot).max(0.0)
	}

	/// Generates one sentence using the thread-local random generator.
	pub fn generate_sentence(&self) -> Result<String> {
		self.generate_sentence_with(&mut rand::rng())
	}

	/// Generates one sentence drawing from `rng`.
	///
	/// # Behavior
	/// - Picks the first word among start words, weighted by count.
	/// - At each step draws `r` in `[0, 1)` and stops if `r` is within the
	///   finish chance or the current word has no successor.
	/// - Otherwise appends a predicted next word and continues from it.
	/// - Stops unconditionally once `max_words` words were emitted.
	///
	/// # Errors
	/// Returns `Error::EmptyModel` if the model has no start words.
	pub fn generate_sentence_with<R>(&self, rng: &mut R) -> Result<String>
	where
		R: Rng + ?Sized,
	{
		if self.start_choices.is_empty() {
			return Err(Error::EmptyModel);
		}

		let first = weighted_choice(&self.start_choices, rng)?.as_str();
		let mut words = vec![first];
		let mut current = first;
		let mut position = 0;

		loop {
			if words.len() >= self.max_words {
				log::trace!("Sentence reached the {} word cap", self.max_words);
				break;
			}

			let r: f64 = rng.random();
			if r <= self.finish_chance(current, position) || self.possible_next_words(current).is_empty() {
				break;
			}

			current = self.predict_next_word(current, rng)?;
			words.push(current);
			position += 1;
		}

		Ok(words.join(" "))
	}
}
