use thiserror::Error;

/// Errors surfaced by model persistence and sentence generation.
///
/// Unparsable transcript lines and undecodable bytes are recovered locally
/// and never show up here.
#[derive(Debug, Error)]
pub enum Error {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// The snapshot is missing fields, has the wrong shape, or fails validation.
	#[error("corrupt model: {0}")]
	CorruptModel(#[source] serde_json::Error),

	#[error("failed to serialize model: {0}")]
	Serialize(#[source] serde_json::Error),

	/// A next word was requested for a word without outgoing bigrams.
	#[error("no successor for word {0:?}")]
	NoSuccessor(String),

	/// The weighted distribution was empty or had a non-positive total weight.
	#[error("weighted choice exhausted (total weight {0})")]
	WeightedChoiceExhausted(f64),

	#[error("model has no start words")]
	EmptyModel,
}

pub type Result<T> = std::result::Result<T, Error>;
