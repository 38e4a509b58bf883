//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use embedded_wallet_starter::config::schema::AppSection;
use embedded_wallet_starter::{HttpServer, Shutdown, Starter, StarterConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const SANDBOX_ADDRESS: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";
pub const BLOCKHASH: &str = "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N";

/// Read one HTTP request (headers plus `Content-Length` body) and return it.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the raw request and returns `(status, json body)`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let (status, body) = f(request).await;
                let status_text = match status {
                    200 => "200 OK",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// A mock Solana node answering `getLatestBlockhash`, counting calls.
pub async fn start_mock_rpc(status: u16) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let addr = start_programmable_backend(move |request| {
        let counter = counter.clone();
        async move {
            if request.contains("getLatestBlockhash") {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            let body = serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "context": { "slot": 1 },
                    "value": { "blockhash": BLOCKHASH, "lastValidBlockHeight": 100 }
                }
            });
            (status, body.to_string())
        }
    })
    .await;
    (format!("http://{}/", addr), calls)
}

/// A running starter on an ephemeral port.
pub struct TestStarter {
    pub base: String,
    pub shutdown: Arc<Shutdown>,
}

impl Drop for TestStarter {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the full app against `rpc_url` with the sandbox wallet.
pub async fn start_starter(rpc_url: &str) -> TestStarter {
    let mut config = StarterConfig {
        app: AppSection {
            app_id: Some("test-app".to_string()),
            rpc_url: Some(rpc_url.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    config.wallet.sandbox_address = SANDBOX_ADDRESS.to_string();
    config.server.bind_address = "127.0.0.1:0".to_string();

    let starter = Starter::resolve(config).unwrap();
    let server_config = starter.config().server.clone();
    let state = starter.mount().await.unwrap();

    let listener = TcpListener::bind(&server_config.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Arc::new(Shutdown::new());

    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        HttpServer::new(&server_config, state)
            .run(listener, &server_shutdown)
            .await
            .unwrap();
    });

    TestStarter {
        base: format!("http://{}", addr),
        shutdown,
    }
}

/// Client that does not follow redirects, so tests can inspect them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// Poll `/api/session` until `connected` matches.
pub async fn wait_for_connected(client: &reqwest::Client, base: &str, connected: bool) {
    for _ in 0..50 {
        let session: serde_json::Value = client
            .get(format!("{}/api/session", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if session["status"]["connected"] == connected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("session never reached connected={}", connected);
}
