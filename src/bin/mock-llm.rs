//! Deterministic stand-in for the downstream summarization service.
//!
//! Serves the same routes as the real model service in mock mode, so the
//! gateway can be run locally end-to-end without model credentials.

use axum::{
    extract::Multipart,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

const CHUNK_MAX_CHARS: usize = 3000;
const CHUNK_OVERLAP: usize = 200;
const MOCK_CONFIDENCE: f64 = 0.7;

#[derive(Parser)]
#[command(name = "mock-llm")]
struct Args {
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    bind: String,
}

#[derive(Deserialize)]
struct SummarizeRequest {
    text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Summary {
    short: String,
    medium: String,
    long: String,
    highlights: Vec<String>,
    confidence: f64,
}

fn head(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

fn truncate(text: &str, n: usize) -> String {
    if text.chars().count() > n {
        format!("{}...", head(text, n))
    } else {
        text.to_string()
    }
}

/// Split text into overlapping windows of at most `max_chars` characters.
fn chunk_text(text: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.trim().chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    if chars.len() <= max_chars {
        return vec![chars.into_iter().collect()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + max_chars).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start = end.saturating_sub(overlap);
    }
    chunks
}

fn summarize_chunk(text: &str) -> Summary {
    Summary {
        short: truncate(text, 120),
        medium: truncate(text, 400),
        long: truncate(text, 800),
        highlights: if text.is_empty() {
            Vec::new()
        } else {
            vec![format!("{}...", head(text, 100))]
        },
        confidence: MOCK_CONFIDENCE,
    }
}

fn aggregate(chunks: &[Summary]) -> Summary {
    if chunks.is_empty() {
        return Summary {
            short: String::new(),
            medium: String::new(),
            long: String::new(),
            highlights: Vec::new(),
            confidence: 0.0,
        };
    }

    let joined = chunks
        .iter()
        .map(|c| c.medium.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut highlights: Vec<String> = Vec::new();
    for h in chunks.iter().flat_map(|c| c.highlights.iter()) {
        if !highlights.contains(h) {
            highlights.push(h.clone());
        }
    }
    highlights.truncate(5);

    let avg = chunks.iter().map(|c| c.confidence).sum::<f64>() / chunks.len() as f64;

    Summary {
        short: truncate(&joined, 140),
        medium: truncate(&joined, 800),
        long: truncate(&joined, 2000),
        highlights,
        confidence: (avg * 100.0).round() / 100.0,
    }
}

fn summarize(text: &str) -> Summary {
    if text.chars().count() <= CHUNK_MAX_CHARS {
        return summarize_chunk(text);
    }
    let chunks: Vec<Summary> = chunk_text(text, CHUNK_MAX_CHARS, CHUNK_OVERLAP)
        .iter()
        .map(|c| summarize_chunk(c))
        .collect();
    aggregate(&chunks)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": message }))).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "mode": "mock" }))
}

async fn summarize_text(Json(req): Json<SummarizeRequest>) -> Response {
    let text = req.text.trim();
    if text.is_empty() {
        return detail(StatusCode::BAD_REQUEST, "text is required");
    }
    Json(summarize(text)).into_response()
}

async fn summarize_file(mut multipart: Multipart) -> Response {
    let mut content = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => match field.bytes().await {
                Ok(bytes) => {
                    content = Some(bytes);
                    break;
                }
                Err(e) => return detail(e.status(), &e.body_text()),
            },
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => return detail(e.status(), &e.body_text()),
        }
    }

    let Some(bytes) = content else {
        return detail(StatusCode::BAD_REQUEST, "file is required");
    };
    // Only UTF-8 text is extractable here.
    let text = std::str::from_utf8(&bytes).unwrap_or_default().trim();
    if text.is_empty() {
        return detail(StatusCode::BAD_REQUEST, "no extractable text from file");
    }
    Json(summarize(text)).into_response()
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/summarize", post(summarize_text))
        .route("/api/summarize", post(summarize_text))
        .route("/v1/summarize-file", post(summarize_file))
        .route("/api/summarize-file", post(summarize_file))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let app = router();
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    tracing::info!(address = %listener.local_addr()?, "mock-llm listening");
    axum::serve(listener, app).await?;
    Ok(())
}
