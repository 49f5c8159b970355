use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use ircsay_core::{DEFAULT_MAX_WORDS, ModelBuilder, SentenceGenerator};

/// Learns word statistics from chat logs and babbles sentences out of them.
#[derive(Parser, Debug)]
#[command(name = "ircsay", version)]
struct Cli {
	/// Increase log verbosity (-v debug, -vv trace).
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,

	/// Decrease log verbosity (-q warn, -qq error).
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	quiet: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Parse a chat log and write the model snapshot.
	Parse(ParseArgs),

	/// Load the model snapshot and print generated sentences.
	Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct ParseArgs {
	/// Chat log to learn from.
	#[arg(value_name = "LOGFILE")]
	logfile: PathBuf,

	/// Where to write the model snapshot.
	#[arg(short, long, value_name = "PATH", env = "IRCSAY_MODEL", default_value = "output.json")]
	output: PathBuf,
}

#[derive(Args, Debug)]
struct GenerateArgs {
	/// Model snapshot to generate from.
	#[arg(short, long, value_name = "PATH", env = "IRCSAY_MODEL", default_value = "output.json")]
	model: PathBuf,

	/// Number of sentences to print.
	#[arg(short = 'n', long, default_value_t = 1)]
	count: usize,

	/// Maximum number of words per sentence.
	#[arg(long, default_value_t = DEFAULT_MAX_WORDS)]
	max_words: usize,
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	match cli.command {
		Commands::Parse(args) => run_parse(args),
		Commands::Generate(args) => run_generate(args),
	}
}

fn init_logging(verbose: u8, quiet: u8) {
	use log::LevelFilter;

	let level = match (verbose, quiet) {
		(_, 1) => LevelFilter::Warn,
		(_, q) if q > 1 => LevelFilter::Error,
		(0, _) => LevelFilter::Info,
		(1, _) => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
	builder.format_timestamp_millis();
	builder.filter_level(level);
	let _ = builder.try_init();
}

fn run_parse(args: ParseArgs) -> Result<()> {
	log::info!("Trying to parse contents of log {}", args.logfile.display());

	let mut builder = ModelBuilder::new();
	builder
		.parse_file(&args.logfile)
		.with_context(|| format!("failed to read log {}", args.logfile.display()))?;

	println!("Average sentence length is {}", builder.model().mean_sentence_length() as u64);

	builder
		.save(&args.output)
		.with_context(|| format!("failed to write model {}", args.output.display()))?;
	Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
	let generator = SentenceGenerator::load(&args.model)
		.with_context(|| format!("failed to load model {}", args.model.display()))?
		.with_max_words(args.max_words);

	for _ in 0..args.count {
		println!("{}", generator.generate_sentence().context("failed to generate a sentence")?);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::{SystemTime, UNIX_EPOCH};

	/// Temporary path unique to this test run.
	fn temp_path(name: &str) -> PathBuf {
		let stamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
		std::env::temp_dir().join(format!("ircsay-{}-{stamp}-{name}", std::process::id()))
	}

	#[test]
	fn parse_defaults_to_output_json() {
		let cli = Cli::try_parse_from(["ircsay", "parse", "chat.log"]).unwrap();
		match cli.command {
			Commands::Parse(args) => {
				assert_eq!(args.logfile, PathBuf::from("chat.log"));
				assert_eq!(args.output, PathBuf::from("output.json"));
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn generate_accepts_count_and_cap() {
		let cli = Cli::try_parse_from(["ircsay", "-v", "generate", "-n", "3", "--max-words", "12", "-m", "m.json"])
			.unwrap();
		assert_eq!(cli.verbose, 1);
		match cli.command {
			Commands::Generate(args) => {
				assert_eq!(args.count, 3);
				assert_eq!(args.max_words, 12);
				assert_eq!(args.model, PathBuf::from("m.json"));
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn parse_requires_a_logfile() {
		assert!(Cli::try_parse_from(["ircsay", "parse"]).is_err());
	}

	#[test]
	fn parse_then_generate() {
		let dir = temp_path("cli");
		std::fs::create_dir_all(&dir).unwrap();
		let log = dir.join("chat.log");
		let model = dir.join("model").join("output.json");
		std::fs::write(&log, "12:00 <+alice> hi there\n12:01 <@bob> hi\n").unwrap();

		run_parse(ParseArgs { logfile: log, output: model.clone() }).unwrap();
		run_generate(GenerateArgs { model: model.clone(), count: 2, max_words: 5 }).unwrap();

		std::fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn generate_without_model_fails() {
		let result = run_generate(GenerateArgs {
			model: PathBuf::from("/nonexistent/ircsay/output.json"),
			count: 1,
			max_words: DEFAULT_MAX_WORDS,
		});
		let message = format!("{:#}", result.unwrap_err());
		assert!(message.contains("failed to load model"), "{message}");
	}
}
