use httpmock::prelude::*;
use luxmed_hunter::config::toml_config::ApiConfig;
use luxmed_hunter::core::lookup;
use luxmed_hunter::domain::ports::LuxmedApi;
use luxmed_hunter::{HttpLuxmedApi, HunterError};

fn api(server: &MockServer) -> HttpLuxmedApi {
    HttpLuxmedApi::new(ApiConfig {
        base_url: server.base_url(),
        cookie: Some("ASP.NET_SessionId=abc".to_string()),
        ..ApiConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_expired_session_is_upstream_error() {
    let server = MockServer::start();
    let cities_mock = server.mock(|when, then| {
        when.method(GET)
            .path(ApiConfig::default().endpoints.cities)
            .header("Cookie", "ASP.NET_SessionId=abc");
        then.status(401);
    });

    let err = api(&server).get_cities_raw().await.unwrap_err();

    cities_mock.assert();
    assert!(matches!(err, HunterError::UpstreamError { status: 401, .. }));
    assert!(err.recovery_suggestion().contains("token"));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(ApiConfig::default().endpoints.services);
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<html>maintenance</html>");
    });

    let err = api(&server).get_services_raw().await.unwrap_err();

    assert!(matches!(err, HunterError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_unexpected_shape_is_malformed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(ApiConfig::default().endpoints.facilities_and_doctors);
        then.status(200)
            .json_body(serde_json::json!({"facilities": [{"name": "LX Wola"}]}));
    });

    let err = lookup::get_clinics(&api(&server), 5, 4502).await.unwrap_err();

    match err {
        HunterError::MalformedResponse { endpoint, .. } => {
            assert_eq!(endpoint, "facilitiesAndDoctors")
        }
        other => panic!("expected MalformedResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_terms_request_carries_window() {
    let server = MockServer::start();
    let today = chrono::Local::now().date_naive();
    let until = today + chrono::Duration::days(14);

    let terms_mock = server.mock(|when, then| {
        when.method(GET)
            .path(ApiConfig::default().endpoints.terms)
            .query_param("searchDateFrom", today.format("%Y-%m-%d").to_string())
            .query_param("searchDateTo", until.format("%Y-%m-%d").to_string())
            .query_param("languageId", "10");
        then.status(200)
            .json_body(serde_json::json!({"termsForService": {"termsForDays": []}}));
    });

    let raw = api(&server).get_terms_raw(5, 4502, 14).await.unwrap();

    terms_mock.assert();
    assert!(raw["termsForService"]["termsForDays"].as_array().unwrap().is_empty());
}
