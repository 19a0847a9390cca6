//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    response::Response,
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use summarize_gateway::config::GatewayConfig;
use summarize_gateway::{HttpServer, Shutdown};

/// One part of a multipart body seen by the downstream.
#[derive(Debug, Clone)]
pub struct CapturedPart {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// One request seen by the downstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub parts: Vec<CapturedPart>,
}

struct Recorder<F> {
    seen: Arc<Mutex<Vec<Captured>>>,
    respond: Arc<F>,
}

impl<F> Clone for Recorder<F> {
    fn clone(&self) -> Self {
        Self {
            seen: self.seen.clone(),
            respond: self.respond.clone(),
        }
    }
}

/// Start a downstream on an ephemeral port that records every request
/// (multipart bodies are parsed into parts) and answers with `respond`.
pub async fn start_programmable_backend<F, Fut>(
    respond: F,
) -> (SocketAddr, Arc<Mutex<Vec<Captured>>>)
where
    F: Fn(Captured) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Recorder {
        seen: seen.clone(),
        respond: Arc::new(respond),
    };

    let app = Router::new().fallback(record::<F, Fut>).with_state(recorder);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, seen)
}

async fn record<F, Fut>(State(recorder): State<Recorder<F>>, request: Request) -> Response
where
    F: Fn(Captured) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut parts = Vec::new();
    let mut body = Bytes::new();
    if content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    {
        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            let part_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.unwrap();
            parts.push(CapturedPart {
                name,
                file_name,
                content_type: part_type,
                bytes,
            });
        }
    } else {
        body = Bytes::from_request(request, &()).await.unwrap();
    }

    let captured = Captured {
        method,
        path,
        content_type,
        body,
        parts,
    };
    recorder.seen.lock().unwrap().push(captured.clone());
    (recorder.respond)(captured).await
}

/// Start a downstream that accepts connections, reads a little and hangs
/// up without ever answering.
pub async fn start_hangup_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                drop(socket);
            });
        }
    });

    addr
}

/// Start a downstream that answers 200 with a `Content-Length` larger than
/// the body it writes, then hangs up mid-body.
pub async fn start_truncating_backend(partial: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n",
                    partial.len() + 93
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(partial).await;
                let _ = socket.flush().await;
                drop(socket);
            });
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Gateway config pointing at `downstream`.
pub fn config_for(downstream: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.downstream.base_url = format!("http://{}", downstream);
    config.downstream.use_system_proxy = false;
    config
}

/// Run a gateway on an ephemeral port. Trigger the returned handle to stop it.
pub async fn spawn_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// A client that never pools or proxies, so each request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
