use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::frequency_model::FrequencyModel;
use crate::error::Result;
use crate::io::read_lines_lossy;

/// `HH:MM <MARKER NAME> MESSAGE`, marker being one of `@`, `+` or a space.
///
/// Anchored at the start only: the message stops at the first line break,
/// so lines still carrying their `\n` match too.
static LOG_LINE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^([0-9]{2}:[0-9]{2}) <[@+ ]([^>]+)> (.+)").expect("log line pattern is valid")
});

/// A transcript line that matched the chat message grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
	pub time: &'a str,
	pub speaker: &'a str,
	pub message: &'a str,
}

impl<'a> LogLine<'a> {
	/// Matches `line` against the message grammar.
	///
	/// Returns `None` for anything else (joins, parts, topic changes, ...).
	pub fn parse(line: &'a str) -> Option<Self> {
		let captures = LOG_LINE.captures(line)?;
		Some(Self {
			time: captures.get(1)?.as_str(),
			speaker: captures.get(2)?.as_str(),
			message: captures.get(3)?.as_str(),
		})
	}

	/// Splits the message on single spaces.
	///
	/// Consecutive spaces yield empty words; nothing is trimmed or case-folded.
	pub fn words(&self) -> Vec<&'a str> {
		self.message.split(' ').collect()
	}
}

/// Result of feeding one line to the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
	/// The line matched and its message contributed `words` words.
	Parsed { words: usize },
	/// The line did not match the grammar and was ignored.
	Skipped,
}

/// Accumulates a `FrequencyModel` from chat transcript lines.
///
/// Every builder owns its own model; nothing is shared between instances.
#[derive(Debug, Default)]
pub struct ModelBuilder {
	model: FrequencyModel,
	parsed: usize,
	skipped: usize,
}

impl ModelBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses one transcript line into the model.
	///
	/// Non-matching lines are reported at debug level and leave the model untouched.
	pub fn parse_line(&mut self, line: &str) -> LineOutcome {
		let Some(log_line) = LogLine::parse(line) else {
			log::info!("Ignoring line {line:?}: not a voice action");
			self.skipped += 1;
			return LineOutcome::Skipped;
		};

		let words = log_line.words();
		self.model.add_sentence(&words);
		self.parsed += 1;

		LineOutcome::Parsed { words: words.len() }
	}

	/// Parses every line in order.
	pub fn parse_lines<I, S>(&mut self, lines: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for line in lines {
			self.parse_line(line.as_ref());
		}
	}

	/// Parses a whole transcript file.
	///
	/// Invalid UTF-8 is replaced rather than aborting the run.
	///
	/// # Errors
	/// Returns an error only if the file cannot be read.
	pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
		let lines = read_lines_lossy(&path)?;
		let (parsed, skipped) = (self.parsed, self.skipped);

		self.parse_lines(&lines);

		log::info!(
			"Parsed {}: {} messages, {} lines ignored, mean sentence length {:.2}",
			path.as_ref().display(),
			self.parsed - parsed,
			self.skipped - skipped,
			self.model.mean_sentence_length()
		);
		Ok(())
	}

	/// Number of lines that matched the grammar so far.
	pub fn parsed_lines(&self) -> usize {
		self.parsed
	}

	/// Number of lines ignored so far.
	pub fn skipped_lines(&self) -> usize {
		self.skipped
	}

	/// Returns the model built so far.
	pub fn model(&self) -> &FrequencyModel {
		&self.model
	}

	/// Finishes the build and hands the model over.
	pub fn build(self) -> FrequencyModel {
		self.model
	}

	/// Serializes the model built so far into its JSON snapshot.
	pub fn serialize(&self) -> Result<Vec<u8>> {
		self.model.to_json()
	}

	/// Writes the model built so far to `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		self.model.save(path)
	}
}
