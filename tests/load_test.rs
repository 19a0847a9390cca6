//! Concurrent load through the gateway.

use std::time::Instant;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_concurrent_requests_each_forwarded_once() {
    // Downstream echoes the forwarded JSON body back.
    let (downstream, seen) =
        common::start_programmable_backend(|captured: common::Captured| async move {
            (StatusCode::OK, captured.body).into_response()
        })
        .await;
    let (gateway, shutdown) = common::spawn_gateway(common::config_for(downstream)).await;

    let concurrency = 20;
    let requests_per_task = 10;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let url = format!("http://{}/summarize", gateway);
        tasks.push(tokio::spawn(async move {
            let mut ok = 0;
            for i in 0..requests_per_task {
                let payload = json!({"text": format!("task {task} request {i}")});
                let res = client.post(&url).json(&payload).send().await.unwrap();
                assert_eq!(res.status(), 200);
                let echoed: Value = res.json().await.unwrap();
                assert_eq!(echoed, payload, "Relayed body must match this request");
                ok += 1;
            }
            ok
        }));
    }

    let mut succeeded = 0;
    for task in tasks {
        succeeded += task.await.unwrap();
    }

    println!(
        "{} requests in {:?} ({:.2} req/s)",
        total_requests,
        start.elapsed(),
        total_requests as f64 / start.elapsed().as_secs_f64()
    );

    assert_eq!(succeeded, total_requests);
    assert_eq!(seen.lock().unwrap().len(), total_requests);

    shutdown.trigger();
}
