// src/checker/testing.rs
// =============================================================================
// Test helpers: checker constructors and a tiny local HTTP server.
//
// The server answers every request with the status code named by the first
// path segment ("/404" -> 404 Not Found, anything else -> 200). Redirect
// codes carry a Location header pointing at the requested path itself.
// "/oversized" answers with a header block far larger than the client will
// buffer.
// It also records the request methods it saw and the highest number of
// requests it was handling at the same time.
// =============================================================================

use super::{remote, LinkChecker};
use crate::anchors::AnchorCache;
use crate::config::CheckerConfig;
use crate::gate::ConcurrencyGate;
use reqwest::StatusCode;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A checker with default settings and a gate of 8.
pub(crate) fn checker() -> LinkChecker {
    checker_with(CheckerConfig::new(Arc::new(ConcurrencyGate::new(8))))
}

/// A checker using `config` and the production client settings. Proxies are
/// disabled so probes reach the local test server directly.
pub(crate) fn checker_with(config: CheckerConfig) -> LinkChecker {
    let client = remote::client_builder().no_proxy().build().unwrap();
    LinkChecker::with_client(config, Arc::new(AnchorCache::new()), client)
}

#[derive(Default)]
struct ServerState {
    requests: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    methods: Mutex<Vec<String>>,
}

pub(crate) struct TestServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl TestServer {
    pub(crate) async fn start() -> Self {
        Self::with_delay(Duration::ZERO).await
    }

    /// A server that waits `delay` before answering each request.
    pub(crate) async fn with_delay(delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(ServerState::default());

        let accept_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&accept_state);
                tokio::spawn(handle(stream, state, delay));
            }
        });

        Self { addr, state }
    }

    /// A URL on a port nobody is listening on.
    pub(crate) async fn closed_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/", addr)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub(crate) fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn methods(&self) -> Vec<String> {
        self.state.methods.lock().unwrap().clone()
    }
}

async fn handle(mut stream: TcpStream, state: Arc<ServerState>, delay: Duration) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&chunk[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request).into_owned();
    let mut request_line = request.split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or("/").to_string();

    state.requests.fetch_add(1, Ordering::SeqCst);
    state.methods.lock().unwrap().push(method);

    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_in_flight.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(delay).await;
    // Leave before answering, so a client that already got its response is
    // never counted as in flight.
    state.in_flight.fetch_sub(1, Ordering::SeqCst);

    let response = if path == "/oversized" {
        let padding = "x".repeat(1024 * 1024);
        format!(
            "HTTP/1.1 200 OK\r\nX-Padding: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            padding
        )
    } else {
        let code = path
            .trim_start_matches('/')
            .split('/')
            .next()
            .and_then(|segment| segment.parse::<u16>().ok())
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::OK);
        let location = if code.is_redirection() {
            format!("Location: {}\r\n", path)
        } else {
            String::new()
        };
        format!(
            "HTTP/1.1 {} {}\r\n{}Content-Length: 0\r\nConnection: close\r\n\r\n",
            code.as_u16(),
            code.canonical_reason().unwrap_or("Unknown"),
            location
        )
    };

    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
