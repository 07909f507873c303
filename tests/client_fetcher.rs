//! `WeatherFetcher` and `WeatherView` against a mocked proxy, and end to
//! end through the real proxy with a mocked upstream.

mod common;

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cityweather::client::FALLBACK_MESSAGE;
use cityweather::ui::EMPTY_QUERY_MESSAGE;
use cityweather::{
    FetchError, Phase, SubmitError, Trigger, WeatherFetcher, WeatherReport, WeatherView,
};
use common::{config_for, madrid_body, spawn_proxy, WEATHER_PATH};

fn fetcher(base: &str) -> WeatherFetcher {
    WeatherFetcher::new(base, Duration::from_secs(5)).expect("fetcher")
}

fn madrid_report() -> WeatherReport {
    WeatherReport {
        city: "Madrid".to_string(),
        temperature_celsius: 23,
        humidity_percent: 65,
        description: "cielo despejado".to_string(),
    }
}

// --- fetcher against a mocked proxy

#[tokio::test]
async fn fetch_returns_report_and_encodes_city() {
    // ---
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .and(query_param("city", "Zürich & Co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temperatureCelsius": 9,
            "humidityPercent": 71,
            "description": "lluvia ligera",
            "city": "Zürich"
        })))
        .expect(1)
        .mount(&proxy)
        .await;

    let report = assert_ok!(fetcher(&proxy.uri()).fetch("Zürich & Co").await);
    assert_eq!(report.city, "Zürich");
    assert_eq!(report.temperature_celsius, 9);
    assert_eq!(report.humidity_percent, 71);
}

#[tokio::test]
async fn fetch_uses_server_error_message_verbatim() {
    // ---
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "City not found. Please check the spelling."
        })))
        .mount(&proxy)
        .await;

    let err = assert_err!(fetcher(&proxy.uri()).fetch("Atlantis").await);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.user_message(), "City not found. Please check the spelling.");
}

#[tokio::test]
async fn fetch_falls_back_on_unreadable_error_body() {
    // ---
    let bodies = [
        ResponseTemplate::new(500).set_body_string("<html>Bad Gateway</html>"),
        ResponseTemplate::new(502).set_body_json(json!({ "message": "no error field" })),
        ResponseTemplate::new(503),
    ];

    for template in bodies {
        let proxy = MockServer::start().await;
        Mock::given(any()).respond_with(template).mount(&proxy).await;

        let err = assert_err!(fetcher(&proxy.uri()).fetch("Madrid").await);
        assert!(matches!(err, FetchError::Status { .. }));
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }
}

#[tokio::test]
async fn fetch_does_not_cache_or_retry() {
    // ---
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "down" })))
        .expect(2)
        .mount(&proxy)
        .await;

    let f = fetcher(&proxy.uri());
    assert_err!(f.fetch("Madrid").await);
    assert_err!(f.fetch("Madrid").await);
}

#[tokio::test]
async fn fetch_transport_failure_uses_fallback() {
    // ---
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = assert_err!(fetcher(&format!("http://{}", addr)).fetch("Madrid").await);
    assert!(matches!(err, FetchError::Transport(_)));
    assert_eq!(err.status(), None);
    assert_eq!(err.user_message(), FALLBACK_MESSAGE);
}

// --- end to end: view -> fetcher -> proxy -> mocked upstream

#[tokio::test]
async fn madrid_end_to_end() {
    // ---
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Madrid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": { "temp": 22.6, "humidity": 65 },
            "weather": [{ "description": "cielo despejado" }],
            "name": "Madrid"
        })))
        .mount(&upstream)
        .await;

    let base = spawn_proxy(config_for(&upstream)).await;
    let mut view = WeatherView::new();
    view.set_input("Madrid");

    assert_ok!(view.search(Trigger::Button, &fetcher(&base)).await);

    assert_eq!(view.phase(), Phase::Success);
    assert_eq!(view.report(), Some(&madrid_report()));
    assert!(view.error().is_none());
}

#[tokio::test]
async fn not_found_end_to_end() {
    // ---
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "cod": "404" })))
        .mount(&upstream)
        .await;

    let base = spawn_proxy(config_for(&upstream)).await;
    let f = fetcher(&base);

    let err = assert_err!(f.fetch("CiudadInexistente123").await);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.user_message().contains("No weather information was found"));

    let mut view = WeatherView::new();
    view.set_input("CiudadInexistente123");
    assert_ok!(view.search(Trigger::Enter, &f).await);

    assert_eq!(view.phase(), Phase::Error);
    assert!(view.report().is_none());
    assert_eq!(view.error(), Some(err.user_message().as_str()));
}

#[tokio::test]
async fn unauthorized_end_to_end() {
    // ---
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&upstream)
        .await;

    let base = spawn_proxy(config_for(&upstream)).await;
    let err = assert_err!(fetcher(&base).fetch("Madrid").await);

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(err.user_message().contains("not active"));
}

#[tokio::test]
async fn blank_input_never_hits_the_network() {
    // ---
    let proxy = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&proxy)
        .await;

    let f = fetcher(&proxy.uri());
    let mut view = WeatherView::new();

    for blank in ["", "   ", "\t"] {
        view.set_input(blank);
        assert_eq!(
            view.search(Trigger::Button, &f).await,
            Err(SubmitError::EmptyQuery)
        );
        assert_eq!(view.error(), Some(EMPTY_QUERY_MESSAGE));
    }

    proxy.verify().await;
}

#[tokio::test]
async fn success_after_failure_clears_error() {
    // ---
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Madrid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(madrid_body()))
        .mount(&upstream)
        .await;

    let base = spawn_proxy(config_for(&upstream)).await;
    let f = fetcher(&base);
    let mut view = WeatherView::new();

    view.set_input("Atlantis");
    assert_ok!(view.search(Trigger::Enter, &f).await);
    assert_eq!(view.phase(), Phase::Error);

    view.set_input("Madrid");
    assert_ok!(view.search(Trigger::Button, &f).await);
    assert_eq!(view.phase(), Phase::Success);
    assert!(view.error().is_none());
    assert_eq!(view.report(), Some(&madrid_report()));
}
