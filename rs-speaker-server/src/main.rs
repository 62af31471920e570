use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};

use log::info;
use serde::Deserialize;

use rs_speaker_core::io::{list_speakers, read_text};
use rs_speaker_core::{Backend, IdentifyRequest, MarkovError, identify_speaker_with};

/// Folder holding the `.txt` speech files.
const DATA_FOLDER: &str = "./data";

/// Extension of the speech files.
const TEXT_EXTENSION: &str = "txt";

/// Window length used when the request does not give one.
const DEFAULT_K: usize = 2;

/// Query parameters of `GET /v1/identify`, naming loaded speakers.
#[derive(Deserialize)]
struct IdentifyParams {
	a: String,
	b: String,
	unknown: String,
	k: Option<usize>,
	backend: Option<String>,
	parallel: Option<bool>,
}

/// JSON body of `POST /v1/identify`, carrying the raw texts.
#[derive(Deserialize)]
struct IdentifyBody {
	speaker_a: String,
	speaker_b: String,
	unknown: String,
	k: Option<usize>,
	backend: Option<Backend>,
	parallel: Option<bool>,
}

#[derive(Deserialize)]
struct SpeakerQuery {
	names: Option<String>,
}

/// Speech texts loaded from the data folder, by name.
struct SharedData {
	speakers: HashMap<String, String>,
}

/// Runs the classifier and turns the outcome into a response.
///
/// Invalid input is a client error.
fn classify(request: &IdentifyRequest) -> HttpResponse {
	match identify_speaker_with(request) {
		Ok(result) => HttpResponse::Ok().json(result),
		Err(e @ MarkovError::Allocation { .. }) => HttpResponse::InternalServerError().body(e.to_string()),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// Copies the texts of the named speakers out of the shared state.
///
/// The lock is released on return, so classification never runs under it.
fn loaded_texts(data: &Mutex<SharedData>, names: [&String; 3]) -> Result<Vec<String>, HttpResponse> {
	let shared_data = data
		.lock()
		.map_err(|_| HttpResponse::InternalServerError().body("Speaker lock failed"))?;
	names
		.into_iter()
		.map(|name| {
			shared_data
				.speakers
				.get(name)
				.cloned()
				.ok_or_else(|| HttpResponse::BadRequest().body(format!("Speaker '{}' is not loaded", name)))
		})
		.collect()
}

/// HTTP GET endpoint `/v1/identify`
///
/// Classifies the loaded speaker `unknown` as speaker `a` or speaker `b`.
/// `k` defaults to 2 and `backend` to `table`.
#[get("/v1/identify")]
async fn get_identify(data: web::Data<Mutex<SharedData>>, query: web::Query<IdentifyParams>) -> impl Responder {
	let backend = match query.backend.as_deref().map(str::parse::<Backend>).transpose() {
		Ok(backend) => backend.unwrap_or_default(),
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};

	let texts = match loaded_texts(&data, [&query.a, &query.b, &query.unknown]) {
		Ok(texts) => texts,
		Err(response) => return response,
	};

	let mut request = IdentifyRequest::new(&texts[0], &texts[1], &texts[2], query.k.unwrap_or(DEFAULT_K), backend);
	request.parallel = query.parallel.unwrap_or(false);
	classify(&request)
}

/// HTTP POST endpoint `/v1/identify`
///
/// Same as the GET endpoint with the texts sent in a JSON body.
#[post("/v1/identify")]
async fn post_identify(body: web::Json<IdentifyBody>) -> impl Responder {
	let mut request = IdentifyRequest::new(
		&body.speaker_a,
		&body.speaker_b,
		&body.unknown,
		body.k.unwrap_or(DEFAULT_K),
		body.backend.unwrap_or_default(),
	);
	request.parallel = body.parallel.unwrap_or(false);
	classify(&request)
}

#[get("/v1/speakers")]
async fn get_speakers() -> impl Responder {
	match list_speakers(DATA_FOLDER, TEXT_EXTENSION) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list speakers"),
	}
}

#[get("/v1/loaded_speakers")]
async fn get_loaded_speakers(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Speaker lock failed"),
	};
	let mut names: Vec<&str> = shared_data.speakers.keys().map(String::as_str).collect();
	names.sort();
	HttpResponse::Ok().body(names.join("\n"))
}

#[put("/v1/load_speakers")]
async fn put_speakers(data: web::Data<Mutex<SharedData>>, query: web::Query<SpeakerQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty speaker name"),
	};

	let speaker_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	// Read everything before touching the shared state
	let folder = Path::new(DATA_FOLDER);
	let mut loaded = HashMap::new();
	for name in speaker_names {
		let path = folder.join(format!("{}.{}", name, TEXT_EXTENSION));
		match read_text(&path) {
			Ok(text) => loaded.insert(name.to_owned(), text),
			Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load speaker {}: {e}", name)),
		};
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Speaker lock failed"),
	};
	info!("loaded speakers: {:?}", loaded.keys().collect::<Vec<_>>());
	shared_data.speakers = loaded;

	HttpResponse::Ok().body("Speakers loaded successfully")
}

/// Main entry point for the server.
///
/// Keeps the loaded speeches in a `Mutex` and starts an Actix-web HTTP
/// server on 127.0.0.1:5000. Set `RUST_LOG=info` to see requests.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let shared_data = SharedData {
		speakers: HashMap::new(),
	};
	let shared_speakers = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_speakers.clone())
			.service(get_identify)
			.service(post_identify)
			.service(get_speakers)
			.service(get_loaded_speakers)
			.service(put_speakers)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test::{TestRequest, call_and_read_body_json, call_service, init_service};
	use rs_speaker_core::{Classification, Verdict};

	fn shared(speakers: &[(&str, &str)]) -> web::Data<Mutex<SharedData>> {
		let speakers = speakers.iter().map(|(name, text)| (name.to_string(), text.to_string())).collect();
		web::Data::new(Mutex::new(SharedData { speakers }))
	}

	#[test]
	fn texts_are_copied_out_of_the_lock() {
		let data = shared(&[("a", "abab"), ("b", "abba")]);
		let (a, b, unknown) = ("a".to_owned(), "b".to_owned(), "a".to_owned());
		let texts = loaded_texts(&data, [&a, &b, &unknown]).unwrap();
		assert!(data.try_lock().is_ok());
		assert_eq!(texts, vec!["abab", "abba", "abab"]);
	}

	#[actix_web::test]
	async fn identify_loaded_speakers() {
		let data = shared(&[("a", "abab"), ("b", "abba")]);
		let app = init_service(App::new().app_data(data.clone()).service(get_identify)).await;

		let request = TestRequest::get().uri("/v1/identify?a=a&b=b&unknown=a&k=1").to_request();
		let result: Classification = call_and_read_body_json(&app, request).await;
		assert_eq!(result.verdict, Verdict::A);
		assert!(data.try_lock().is_ok());

		let request = TestRequest::get().uri("/v1/identify?a=a&b=missing&unknown=a").to_request();
		let response = call_service(&app, request).await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}
