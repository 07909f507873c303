//! Shared helpers: a real proxy router on an ephemeral port, backed by a
//! wiremock upstream.
#![allow(dead_code)]

use std::time::Duration;

use cityweather::{AppState, Config};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const WEATHER_PATH: &str = "/data/2.5/weather";

/// Config pointing at `upstream` with the test credential.
pub fn config_for(upstream: &MockServer) -> Config {
    // ---
    Config {
        api_key: Some(API_KEY.to_string()),
        api_url: upstream.uri(),
        upstream_timeout: Duration::from_millis(500),
        ..Config::default()
    }
}

/// Serve the proxy router on 127.0.0.1 and return its base URL.
pub async fn spawn_proxy(config: Config) -> String {
    // ---
    let state = AppState::from_config(config).expect("upstream client");
    let app = cityweather::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("proxy server");
    });

    format!("http://{}", addr)
}

pub fn madrid_body() -> Value {
    json!({
        "coord": { "lon": -3.7026, "lat": 40.4165 },
        "main": { "temp": 22.6, "feels_like": 22.1, "humidity": 65 },
        "weather": [{ "id": 800, "main": "Clear", "description": "cielo despejado" }],
        "name": "Madrid",
        "cod": 200
    })
}

/// Upstream that answers every request with `status_line` and a body cut
/// short of its declared `Content-Length`, so reading the body fails.
pub fn spawn_truncated_upstream(status_line: &'static str) -> String {
    // ---
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: 500\r\nConnection: close\r\n\r\n{{\"cod\":",
                status_line
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{}", addr)
}
