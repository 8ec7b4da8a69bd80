//! Canned HTTP server for exercising the live client

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// One request as the server saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path plus query string
    pub target: String,
    /// Lower-cased header names
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    tx: mpsc::UnboundedSender<Recorded>,
}

async fn record(
    State(canned): State<Canned>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let headers = headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();

    let _ = canned.tx.send(Recorded {
        method: method.to_string(),
        target,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    });

    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
}

/// Serve `body` with `status` to every request. Returns the base URL
/// (ending in `/api`) and a stream of the requests received.
pub async fn serve(status: u16, body: &str) -> (String, mpsc::UnboundedReceiver<Recorded>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let canned = Canned {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
        tx,
    };
    let app = Router::new().fallback(record).with_state(canned);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), rx)
}

/// Accept connections and never answer
pub async fn silent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    // let the accept loop start
    tokio::time::sleep(Duration::from_millis(1)).await;

    format!("http://{}/api", addr)
}
