mod common;

use std::sync::Arc;

use chrono::Weekday;
use common::{API_KEY, MIDNIGHT, current_body, forecast_body, mount_city, mount_not_found};
use dashboard_core::{
    DashboardError, LocationQuery, OpenWeatherProvider, RefreshStatus, UnitPreferences,
    UnitSystem, WeatherSession,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const HOUR: i64 = 3600;

fn session(server: &MockServer) -> WeatherSession {
    let provider = OpenWeatherProvider::with_base_url(API_KEY.to_string(), server.uri())
        .expect("provider builds");
    WeatherSession::new(Arc::new(provider), UnitPreferences::default())
}

fn city(name: &str) -> LocationQuery {
    LocationQuery::City(name.to_string())
}

async fn mount_lagos(server: &MockServer) {
    let current = current_body("State of Lagos", "NG", HOUR);
    let forecast = forecast_body("Lagos", "NG", HOUR);
    mount_city(server, "Lagos", current, forecast).await;
}

#[tokio::test]
async fn refresh_then_render_dashboard() {
    let server = MockServer::start().await;
    mount_lagos(&server).await;

    let mut session = session(&server);
    let status = session.refresh(city("Lagos")).await.expect("refresh");
    assert_eq!(status, RefreshStatus::Applied { forecast_error: None });

    session.select_day(Weekday::Sun);
    let payload = session.render(MIDNIGHT + 10 * HOUR).expect("payload");

    assert_eq!(payload.location_label, "Lagos, NG");
    assert_eq!(payload.local_time, "Sun, Oct 18, 2026, 11:00:00 AM");
    assert_eq!(payload.current.temperature, "29°");
    assert!(payload.forecast_available);

    let labels: Vec<&str> = payload.daily.iter().map(|row| row.label.as_str()).collect();
    assert_eq!(labels, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    assert_eq!(payload.daily[0].min, "20°");
    assert_eq!(payload.daily[0].max, "27°");
    assert_eq!(payload.daily[0].icon_code.as_deref(), Some("01d"));
    assert!(payload.daily[4].min.is_empty());

    assert!(payload.hourly_available);
    assert_eq!(payload.hourly.len(), 24);
    assert_eq!(payload.hourly[0].label, "11 AM");
    assert!(payload.hourly[0].current);
}

#[tokio::test]
async fn unknown_city_keeps_the_loaded_dashboard() {
    let server = MockServer::start().await;
    mount_lagos(&server).await;
    mount_not_found(&server, "Atlantis").await;

    let mut session = session(&server);
    session.refresh(city("Lagos")).await.expect("refresh");

    let err = session.refresh(city("Atlantis")).await.unwrap_err();
    assert!(matches!(err, DashboardError::LocationNotFound { .. }));
    assert_eq!(err.user_message(), "Could not fetch weather. Try another city.");

    let payload = session.render(MIDNIGHT).expect("previous payload");
    assert_eq!(payload.location_label, "Lagos, NG");
}

#[tokio::test]
async fn forecast_outage_still_shows_current_conditions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Lagos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(current_body("Lagos", "NG", HOUR)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let mut session = session(&server);
    let status = session.refresh(city("Lagos")).await.expect("current conditions load");
    assert!(matches!(
        status,
        RefreshStatus::Applied { forecast_error: Some(DashboardError::ForecastUnavailable(_)) }
    ));

    let payload = session.render(MIDNIGHT).expect("payload");
    assert_eq!(payload.current.humidity, "78%");
    assert!(!payload.forecast_available);
    assert!(payload.hourly.iter().all(|slot| slot.hidden));
}

#[tokio::test]
async fn switching_units_refetches_imperial_data() {
    let server = MockServer::start().await;
    mount_lagos(&server).await;

    let mut session = session(&server);
    session.refresh(city("Lagos")).await.expect("metric refresh");
    session.toggle_unit_system().await.expect("imperial refresh");

    assert_eq!(session.state().fetched_in, UnitSystem::Imperial);
    let imperial_requests = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| req.url.query().is_some_and(|q| q.contains("units=imperial")))
        .count();
    assert_eq!(imperial_requests, 2);
}
