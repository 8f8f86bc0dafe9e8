//! Integration tests for WeatherProvider using wiremock.

use std::time::Duration;

use tenki_weather::{City, HistoryWindow, RetryConfig, WeatherCondition, WeatherError, WeatherProvider};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Hourly block with `past + future` samples starting at midnight.
fn hourly_body(past: usize, future: usize) -> serde_json::Value {
    let len = past + future;
    let time: Vec<String> = (0..len)
        .map(|h| format!("2026-10-{:02}T{:02}:00", 15 + h / 24, h % 24))
        .collect();
    let temperature: Vec<f64> = (0..len).map(|h| 12.0 + h as f64 * 0.1).collect();
    let precipitation: Vec<f64> = (0..len).map(|h| if h == past { 1.5 } else { 0.0 }).collect();
    let humidity: Vec<u32> = vec![65; len];
    let wind: Vec<f64> = vec![2.5; len];
    let code: Vec<i32> = (0..len).map(|h| if h == past { 63 } else { 3 }).collect();

    serde_json::json!({
        "latitude": 35.7,
        "longitude": 139.7,
        "timezone": "Asia/Tokyo",
        "hourly": {
            "time": time,
            "temperature_2m": temperature,
            "precipitation": precipitation,
            "relative_humidity_2m": humidity,
            "wind_speed_10m": wind,
            "weather_code": code
        }
    })
}

fn provider(server: &MockServer) -> WeatherProvider {
    WeatherProvider::new(format!("{}/v1/forecast", server.uri()), Duration::from_secs(5))
        .unwrap()
        .with_retry(RetryConfig::new(2, 1, 5))
}

#[tokio::test]
async fn test_fetch_marks_now_at_history_boundary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("past_hours", "24"))
        .and(query_param("forecast_hours", "48"))
        .and(query_param("timezone", "Asia/Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body(24, 48)))
        .mount(&server)
        .await;

    let forecast = provider(&server)
        .fetch(City::default_city())
        .await
        .unwrap();

    assert_eq!(forecast.city_id, "tokyo");
    assert_eq!(forecast.samples.len(), 72);
    assert_eq!(forecast.now_index, 24);
    let now = forecast.current().unwrap();
    assert_eq!(now.precipitation, Some(1.5));
    assert_eq!(now.condition, WeatherCondition::Rain);
    assert_eq!(now.humidity, Some(65));
}

#[tokio::test]
async fn test_fetch_uses_configured_history() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("past_hours", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body(6, 24)))
        .mount(&server)
        .await;

    let forecast = provider(&server)
        .with_history(HistoryWindow {
            past_hours: 6,
            forecast_hours: 24,
        })
        .fetch(City::find("naha").unwrap())
        .await
        .unwrap();

    assert_eq!(forecast.now_index, 6);
    assert_eq!(forecast.current().unwrap().condition, WeatherCondition::Rain);
}

#[tokio::test]
async fn test_fetch_sends_city_coordinates() {
    let server = MockServer::start().await;
    let sapporo = City::find("sapporo").unwrap();

    Mock::given(method("GET"))
        .and(query_param("latitude", sapporo.latitude.to_string()))
        .and(query_param("longitude", sapporo.longitude.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body(24, 24)))
        .expect(1)
        .mount(&server)
        .await;

    let forecast = provider(&server).fetch(sapporo).await.unwrap();
    assert_eq!(forecast.city_id, "sapporo");
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Parameter 'past_hours' must be between 0 and 92"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch(City::default_city())
        .await
        .unwrap_err();

    match err {
        WeatherError::Status { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("past_hours"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_retried_then_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch(City::default_city())
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_recovers_after_transient_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body(24, 24)))
        .mount(&server)
        .await;

    let forecast = provider(&server)
        .fetch(City::default_city())
        .await
        .unwrap();
    assert_eq!(forecast.samples.len(), 48);
}

#[tokio::test]
async fn test_retry_after_is_capped_by_policy() {
    let server = MockServer::start().await;

    // Asks for an hour; the policy's 5 ms ceiling wins.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "3600"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body(24, 24)))
        .mount(&server)
        .await;

    let forecast = tokio::time::timeout(
        Duration::from_secs(5),
        provider(&server).fetch(City::default_city()),
    )
    .await
    .expect("retry wait was capped")
    .unwrap();
    assert_eq!(forecast.samples.len(), 48);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch(City::default_city())
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)));
}
