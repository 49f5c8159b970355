use std::time::{SystemTime, UNIX_EPOCH};

use ircsay_core::{Error, FrequencyModel, ModelBuilder, SentenceGenerator};
use rand::SeedableRng;
use rand::rngs::StdRng;

const TRANSCRIPT: &str = "\
--- Log opened Sun Mar 03 12:00:00 2024
12:00 -!- alice [~alice@host] has joined #rust
12:00 <+alice> hi there
12:01 <@bob> hi
12:02 <@bob> anyone tried the new borrow checker
12:03 < carol> the new one is great
12:03 < carol> the  old one was fine too
12:04 -!- carol changed the topic to: borrowck
12:05 <+alice> great , thanks
--- Log closed Sun Mar 03 13:00:00 2024
";

/// Temporary path unique to this test run.
fn temp_path(name: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
	let stamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
	Ok(std::env::temp_dir().join(format!("ircsay-{}-{stamp}-{name}", std::process::id())))
}

/// Integration test: parse -> save -> load -> generate.
#[test]
fn parse_save_load_generate() -> Result<(), Box<dyn std::error::Error>> {
	let log_path = temp_path("chat.log")?;
	let model_path = temp_path("output.json")?;
	std::fs::write(&log_path, TRANSCRIPT)?;

	let mut builder = ModelBuilder::new();
	builder.parse_file(&log_path)?;
	assert_eq!(builder.parsed_lines(), 6);
	assert_eq!(builder.skipped_lines(), 4);
	builder.save(&model_path)?;
	let built = builder.build();

	let generator = SentenceGenerator::load(&model_path)?;
	std::fs::remove_file(&log_path)?;
	std::fs::remove_file(&model_path)?;

	assert_eq!(generator.model(), &built);
	assert_eq!(built.sentence_count(), 6.0);
	let batch_mean = (2 + 1 + 6 + 5 + 7 + 3) as f64 / 6.0;
	assert!((built.mean_sentence_length() - batch_mean).abs() < 1e-9);
	assert_eq!(built.unigram_count(""), 1);
	assert_eq!(built.bigram_count("the", ""), 1);

	let mut rng = StdRng::seed_from_u64(2024);
	for _ in 0..100 {
		let sentence = generator.generate_sentence_with(&mut rng)?;
		let first = sentence.split(' ').next().unwrap_or_default();
		assert!(built.start_word_count(first) > 0, "{sentence:?}");
	}

	Ok(())
}

#[test]
fn invalid_utf8_does_not_abort_parsing() -> Result<(), Box<dyn std::error::Error>> {
	let log_path = temp_path("latin1.log")?;
	std::fs::write(&log_path, b"12:00 <+alice> caf\xe9 au lait\n12:01 <@bob> ok\n")?;

	let mut builder = ModelBuilder::new();
	builder.parse_file(&log_path)?;
	std::fs::remove_file(&log_path)?;

	assert_eq!(builder.parsed_lines(), 2);
	assert_eq!(builder.model().start_word_count("caf\u{FFFD}"), 1);
	Ok(())
}

#[test]
fn missing_log_file_is_an_io_error() {
	let mut builder = ModelBuilder::new();
	let result = builder.parse_file("/nonexistent/ircsay/chat.log");
	assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn missing_model_file_is_an_io_error() {
	assert!(matches!(SentenceGenerator::load("/nonexistent/ircsay/output.json"), Err(Error::Io(_))));
}

#[test]
fn truncated_model_file_is_corrupt() -> Result<(), Box<dyn std::error::Error>> {
	let mut builder = ModelBuilder::new();
	builder.parse_lines(TRANSCRIPT.lines());
	let bytes = builder.serialize()?;

	let result = FrequencyModel::from_json(&bytes[..bytes.len() / 2]);
	assert!(matches!(result, Err(Error::CorruptModel(_))));
	Ok(())
}

#[test]
fn line_order_does_not_change_the_model() {
	let lines: Vec<&str> = TRANSCRIPT.lines().collect();

	let mut forward = ModelBuilder::new();
	forward.parse_lines(lines.iter());
	let mut backward = ModelBuilder::new();
	backward.parse_lines(lines.iter().rev());

	let (forward, backward) = (forward.build(), backward.build());
	assert_eq!(forward.unigrams().count(), backward.unigrams().count());
	for (word, count) in forward.unigrams() {
		assert_eq!(backward.unigram_count(word), count);
	}
	for ((first, second), count) in forward.bigrams() {
		assert_eq!(backward.bigram_count(first, second), count);
	}
	assert!((forward.mean_sentence_length() - backward.mean_sentence_length()).abs() < 1e-9);
}
