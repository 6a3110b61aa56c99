#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

/// 2026-10-18T00:00:00Z, a Sunday.
pub const MIDNIGHT: i64 = 1_792_281_600;
pub const THREE_HOURS: i64 = 3 * 3600;
pub const API_KEY: &str = "test-key";

pub fn current_body(name: &str, country: &str, timezone: i64) -> Value {
    json!({
        "coord": { "lon": 3.3947, "lat": 6.4541 },
        "weather": [{ "id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d" }],
        "main": { "temp": 28.6, "feels_like": 31.2, "humidity": 78 },
        "wind": { "speed": 2.5 },
        "rain": { "1h": 0.3 },
        "dt": MIDNIGHT,
        "sys": { "country": country },
        "timezone": timezone,
        "name": name
    })
}

/// Five days of 3-hourly samples starting at `MIDNIGHT`. Temperatures cycle
/// through 20..=27 and the icon is "01d" except every fourth sample.
pub fn forecast_body(name: &str, country: &str, timezone: i64) -> Value {
    let list: Vec<Value> = (0..40)
        .map(|i| {
            let icon = if i % 4 == 3 { "10d" } else { "01d" };
            json!({
                "dt": MIDNIGHT + i * THREE_HOURS,
                "main": { "temp": 20.0 + (i % 8) as f64, "feels_like": 20.0, "humidity": 60 },
                "weather": [{ "description": "clear sky", "icon": icon }]
            })
        })
        .collect();

    json!({
        "cod": "200",
        "cnt": list.len(),
        "list": list,
        "city": { "name": name, "country": country, "timezone": timezone }
    })
}

pub async fn mount_city(server: &MockServer, city: &str, current: Value, forecast: Value) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(current))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast))
        .mount(server)
        .await;
}

pub async fn mount_not_found(server: &MockServer, city: &str) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", city))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(server)
        .await;
}
