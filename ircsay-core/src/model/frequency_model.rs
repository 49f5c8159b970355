use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::write_file;

/// Ordered word pair: the first word immediately followed by the second.
pub type Bigram = (String, String);

/// Word statistics accumulated from a chat transcript.
///
/// This is the only artifact handed from the builder to the generator.
/// It is built once, written once and read-only afterwards.
///
/// ## Invariants
/// - Both words of every bigram key are also unigram keys
/// - `sentence_count` equals the number of messages added
/// - `mean_sentence_length` is the arithmetic mean of the per-message word counts
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(into = "Snapshot", try_from = "Snapshot")]
pub struct FrequencyModel {
	pub(crate) unigrams: HashMap<String, u64>,
	pub(crate) bigrams: HashMap<Bigram, u64>,
	pub(crate) start_words: HashMap<String, u64>,
	pub(crate) end_words: HashMap<String, u64>,
	pub(crate) sentence_count: f64,
	pub(crate) mean_sentence_length: f64,
}

/// On-disk shape of a `FrequencyModel`.
///
/// Mappings are stored as `[key, count]` pairs so that bigram keys can be
/// written as `[[first, second], count]`.
#[derive(Serialize, Deserialize)]
struct Snapshot {
	unigrams: Vec<(String, u64)>,
	bigrams: Vec<(Bigram, u64)>,
	#[serde(rename = "startwords")]
	start_words: Vec<(String, u64)>,
	#[serde(rename = "endwords")]
	end_words: Vec<(String, u64)>,
	#[serde(rename = "total-sentences")]
	total_sentences: f64,
	#[serde(rename = "mean-sentence-length")]
	mean_sentence_length: f64,
}

impl From<FrequencyModel> for Snapshot {
	fn from(model: FrequencyModel) -> Self {
		Self {
			unigrams: model.unigrams.into_iter().collect(),
			bigrams: model.bigrams.into_iter().collect(),
			start_words: model.start_words.into_iter().collect(),
			end_words: model.end_words.into_iter().collect(),
			total_sentences: model.sentence_count,
			mean_sentence_length: model.mean_sentence_length,
		}
	}
}

impl TryFrom<Snapshot> for FrequencyModel {
	type Error = String;

	/// Rebuilds the mappings. Duplicate keys resolve last-write-wins.
	fn try_from(snapshot: Snapshot) -> std::result::Result<Self, Self::Error> {
		if !snapshot.total_sentences.is_finite() || snapshot.total_sentences < 0.0 {
			return Err(format!("invalid total-sentences {}", snapshot.total_sentences));
		}
		if !snapshot.mean_sentence_length.is_finite() || snapshot.mean_sentence_length < 0.0 {
			return Err(format!("invalid mean-sentence-length {}", snapshot.mean_sentence_length));
		}

		let unigrams: HashMap<String, u64> = snapshot.unigrams.into_iter().collect();
		let bigrams: HashMap<Bigram, u64> = snapshot.bigrams.into_iter().collect();

		for (first, second) in bigrams.keys() {
			if !unigrams.contains_key(first) || !unigrams.contains_key(second) {
				return Err(format!("bigram ({first:?}, {second:?}) references an unknown unigram"));
			}
		}

		Ok(Self {
			unigrams,
			bigrams,
			start_words: snapshot.start_words.into_iter().collect(),
			end_words: snapshot.end_words.into_iter().collect(),
			sentence_count: snapshot.total_sentences,
			mean_sentence_length: snapshot.mean_sentence_length,
		})
	}
}

impl FrequencyModel {
	/// Creates an empty model.
	pub fn new() -> Self {
		Self::default()
	}

	/// Accounts for one message already split into words.
	///
	/// - The sentence count grows by one and the mean length is updated
	///   incrementally: `mean += (len - mean) / count`
	/// - Every word is counted, duplicates and empty strings included
	/// - The first and last words are counted as start and end words
	///   (the same word twice for a one-word message)
	/// - Every adjacent pair is counted as a bigram
	pub(crate) fn add_sentence(&mut self, words: &[&str]) {
		let (Some(first), Some(last)) = (words.first(), words.last()) else {
			return;
		};

		self.sentence_count += 1.0;
		self.mean_sentence_length += (words.len() as f64 - self.mean_sentence_length) / self.sentence_count;

		for word in words {
			*self.unigrams.entry((*word).to_owned()).or_insert(0) += 1;
		}

		*self.start_words.entry((*first).to_owned()).or_insert(0) += 1;
		*self.end_words.entry((*last).to_owned()).or_insert(0) += 1;

		for pair in words.windows(2) {
			let key = (pair[0].to_owned(), pair[1].to_owned());
			*self.bigrams.entry(key).or_insert(0) += 1;
		}
	}

	/// Returns `true` if no message was ever added.
	pub fn is_empty(&self) -> bool {
		self.sentence_count == 0.0 && self.unigrams.is_empty()
	}

	pub fn unigram_count(&self, word: &str) -> u64 {
		self.unigrams.get(word).copied().unwrap_or(0)
	}

	pub fn bigram_count(&self, first: &str, second: &str) -> u64 {
		self.bigrams
			.get(&(first.to_owned(), second.to_owned()))
			.copied()
			.unwrap_or(0)
	}

	pub fn start_word_count(&self, word: &str) -> u64 {
		self.start_words.get(word).copied().unwrap_or(0)
	}

	pub fn end_word_count(&self, word: &str) -> u64 {
		self.end_words.get(word).copied().unwrap_or(0)
	}

	/// Number of distinct words (not the total number of tokens).
	pub fn distinct_unigrams(&self) -> usize {
		self.unigrams.len()
	}

	/// Number of distinct word pairs.
	pub fn distinct_bigrams(&self) -> usize {
		self.bigrams.len()
	}

	pub fn distinct_start_words(&self) -> usize {
		self.start_words.len()
	}

	pub fn distinct_end_words(&self) -> usize {
		self.end_words.len()
	}

	/// Number of parsed messages.
	pub fn sentence_count(&self) -> f64 {
		self.sentence_count
	}

	/// Mean number of words per parsed message.
	pub fn mean_sentence_length(&self) -> f64 {
		self.mean_sentence_length
	}

	pub fn unigrams(&self) -> impl Iterator<Item = (&str, u64)> {
		self.unigrams.iter().map(|(word, count)| (word.as_str(), *count))
	}

	pub fn bigrams(&self) -> impl Iterator<Item = ((&str, &str), u64)> {
		self.bigrams
			.iter()
			.map(|((first, second), count)| ((first.as_str(), second.as_str()), *count))
	}

	pub fn start_words(&self) -> impl Iterator<Item = (&str, u64)> {
		self.start_words.iter().map(|(word, count)| (word.as_str(), *count))
	}

	pub fn end_words(&self) -> impl Iterator<Item = (&str, u64)> {
		self.end_words.iter().map(|(word, count)| (word.as_str(), *count))
	}

	/// Serializes the model into its JSON snapshot.
	pub fn to_json(&self) -> Result<Vec<u8>> {
		serde_json::to_vec(self).map_err(Error::Serialize)
	}

	/// Rebuilds a model from its JSON snapshot.
	///
	/// # Errors
	/// Returns `Error::CorruptModel` if a field is missing or malformed,
	/// or if the snapshot breaks the model invariants.
	pub fn from_json(bytes: &[u8]) -> Result<Self> {
		serde_json::from_slice(bytes).map_err(Error::CorruptModel)
	}

	/// Writes the JSON snapshot to `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let bytes = self.to_json()?;
		write_file(&path, &bytes)?;
		log::info!(
			"Saved model to {} ({} unigrams, {} bigrams)",
			path.as_ref().display(),
			self.distinct_unigrams(),
			self.distinct_bigrams()
		);
		Ok(())
	}

	/// Reads a JSON snapshot from `path`.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(&path)?;
		let model = Self::from_json(&bytes)?;
		log::info!(
			"Loaded model from {} ({} unigrams, {} bigrams, {} sentences)",
			path.as_ref().display(),
			model.distinct_unigrams(),
			model.distinct_bigrams(),
			model.sentence_count
		);
		Ok(model)
	}
}
