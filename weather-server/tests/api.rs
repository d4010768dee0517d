//! End-to-end tests for the HTTP API.
//!
//! Every upstream (IP geolocation, reverse geocoding, OpenWeather) is served by
//! one wiremock server; requests go through the full router via `oneshot`.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::{Days, Local};
use serde_json::{Value, json};
use tower::ServiceExt;
use weather_core::Config;
use weather_server::{AppState, router};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, api_key: Option<&str>) -> Config {
    let mut config = Config::default();
    config.api_key = api_key.map(str::to_owned);
    config.endpoints.openweather = format!("{}/data/2.5", server.uri());
    config.endpoints.ip_geolocation = format!("{}/json", server.uri());
    config.endpoints.reverse_geocoding = format!("{}/reverse", server.uri());
    config
}

fn app(server: &MockServer, api_key: Option<&str>) -> Router {
    let state = AppState::from_config(&config_for(server, api_key)).expect("state builds");
    router(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

/// Unix timestamp for local noon `days` after today.
fn local_noon(days: u64) -> i64 {
    Local::now()
        .date_naive()
        .checked_add_days(Days::new(days))
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_local_timezone(Local)
        .earliest()
        .unwrap()
        .timestamp()
}

fn slot(dt: i64, temp: f64, main: &str) -> Value {
    json!({
        "dt": dt,
        "main": {"temp": temp, "feels_like": temp, "humidity": 85, "pressure": 1002},
        "weather": [{"main": main, "description": main.to_lowercase(), "icon": "10d"}],
        "clouds": {"all": 92},
        "wind": {"speed": 5.5}
    })
}

async fn mount_ip(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_reverse(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": {"city": "London", "country": "United Kingdom"}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn health_reports_healthy() {
    let server = MockServer::start().await;

    let (status, body) = get(app(&server, None), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Ultimate Weather AI");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn location_comes_from_ip_lookup() {
    let server = MockServer::start().await;
    mount_ip(&server, json!({"city": "Lisbon", "country": "PT", "loc": "38.7167,-9.1333"})).await;

    let (status, body) = get(app(&server, None), "/api/location").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["location"],
        json!({"city": "Lisbon", "country": "PT", "lat": 38.7167, "lng": -9.1333})
    );
}

#[tokio::test]
async fn location_failure_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (status, body) = get(app(&server, Some("KEY")), "/api/location").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not detect location");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn forecast_without_detectable_location_is_bad_request() {
    let server = MockServer::start().await;
    mount_ip(&server, json!({"city": "Nowhere"})).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = get(app(&server, Some("KEY")), "/api/forecast").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
    assert!(body.get("forecast").is_none());
}

#[tokio::test]
async fn forecast_for_coordinates_covers_available_days() {
    let server = MockServer::start().await;
    mount_reverse(&server).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .and(query_param("cnt", "40"))
        .and(query_param("appid", "KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [
                slot(local_noon(1) - 3 * 3600, 9.0, "Rain"),
                slot(local_noon(1), 12.0, "Rain"),
                slot(local_noon(2), 14.0, "Clouds"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(app(&server, Some("KEY")), "/api/forecast?lat=51.5&lng=-0.12").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["location"]["city"], "London");
    assert_eq!(body["location"]["lat"], 51.5);
    assert_eq!(body["location"]["lng"], -0.12);

    let forecast = body["forecast"].as_array().expect("forecast array");
    assert_eq!(forecast.len(), 2);

    let first = &forecast[0];
    assert_eq!(first["min_temp"], 9.0);
    assert_eq!(first["max_temp"], 12.0);
    assert_eq!(first["avg_temp"], 10.5);
    assert_eq!(first["humidity"], 85);
    assert_eq!(first["cloud_cover"], 92);
    assert_eq!(first["condition"], "Rain");
    assert_eq!(first["icon"], "10d");
    assert_eq!(first["will_rain"], true);
    assert!(forecast[0]["date"].as_str() < forecast[1]["date"].as_str());
}

#[tokio::test]
async fn repeated_coordinate_parameters_use_the_first_value() {
    let server = MockServer::start().await;
    mount_reverse(&server).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [slot(local_noon(1), 12.0, "Clouds")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(
        app(&server, Some("KEY")),
        "/api/forecast?lat=51.5&lat=2&lng=-0.12",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["location"]["lat"], 51.5);
}

#[tokio::test]
async fn forecast_without_api_key_is_internal_error() {
    let server = MockServer::start().await;
    mount_reverse(&server).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = get(app(&server, None), "/api/forecast?lat=51.5&lng=-0.12").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "API key not configured");
    assert_eq!(body["reason"], "config-missing");
}

#[tokio::test]
async fn upstream_failure_is_internal_error_with_reason() {
    let server = MockServer::start().await;
    mount_reverse(&server).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let (status, body) = get(app(&server, Some("KEY")), "/api/forecast?lat=51.5&lng=-0.12").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Could not fetch forecast");
    assert_eq!(body["reason"], "transport");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected() {
    let server = MockServer::start().await;

    let (status, body) = get(app(&server, Some("KEY")), "/api/forecast?lat=123&lng=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Coordinates out of range");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let server = MockServer::start().await;

    let (status, body) = get(app(&server, None), "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");
    assert_eq!(body["path"], "/api/nope");
    assert_eq!(body["success"], false);
}
