use std::path::PathBuf;

use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use ircsay_core::{DEFAULT_MAX_WORDS, SentenceGenerator};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Serves one generated sentence per request.
#[derive(Parser, Debug)]
#[command(name = "ircsay-server", version)]
struct ServerArgs {
	/// Model snapshot to generate from.
	#[arg(short, long, value_name = "PATH", env = "IRCSAY_MODEL", default_value = "output.json")]
	model: PathBuf,

	#[arg(long, env = "IRCSAY_HOST", default_value = "0.0.0.0")]
	host: String,

	#[arg(long, env = "IRCSAY_PORT", default_value_t = 1234)]
	port: u16,

	/// Maximum number of words per sentence.
	#[arg(long, default_value_t = DEFAULT_MAX_WORDS)]
	max_words: usize,
}

/// Escapes the characters that are significant in HTML text and attributes.
fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

fn render_index(sentence: &str) -> String {
	INDEX_TEMPLATE.replace("{{sentence}}", &escape_html(sentence))
}

/// HTTP GET endpoint `/`
///
/// Renders a page showing one freshly generated sentence.
#[get("/")]
async fn index(generator: web::Data<SentenceGenerator>) -> impl Responder {
	match generator.generate_sentence() {
		Ok(sentence) => HttpResponse::Ok()
			.content_type("text/html; charset=utf-8")
			.body(render_index(&sentence)),
		Err(e) => {
			log::error!("Generation failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Returns one generated sentence as plain text.
#[get("/v1/generate")]
async fn get_generated(generator: web::Data<SentenceGenerator>) -> impl Responder {
	match generator.generate_sentence() {
		Ok(sentence) => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(sentence),
		Err(e) => {
			log::error!("Generation failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(index).service(get_generated);
}

/// Main entry point for the server.
///
/// Loads the model once and shares it read-only between workers; every
/// request draws from its worker's thread-local random generator.
#[actix_web::main]
async fn main() -> Result<()> {
	let args = ServerArgs::parse();
	env_logger::Builder::from_env(Env::default().default_filter_or("info"))
		.format_timestamp_millis()
		.init();

	let generator = SentenceGenerator::load(&args.model)
		.with_context(|| format!("failed to load model {}", args.model.display()))?
		.with_max_words(args.max_words);
	let generator = web::Data::new(generator);

	log::info!("Listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.app_data(generator.clone())
			.configure(configure)
	})
		.bind((args.host.as_str(), args.port))
		.with_context(|| format!("failed to bind {}:{}", args.host, args.port))?
		.run()
		.await?;

	Ok(())
}
