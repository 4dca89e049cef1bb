use crate::config::toml_config::ApiConfig;
use crate::domain::model::{CityId, ServiceId};
use crate::domain::ports::LuxmedApi;
use crate::utils::date::window_end;
use crate::utils::error::{HunterError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, COOKIE};
use reqwest::Client;

/// `LuxmedApi` over HTTP. Authentication is whatever token or cookie the
/// config carries; no login is performed here.
pub struct HttpLuxmedApi {
    client: Client,
    config: ApiConfig,
}

impl HttpLuxmedApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers(&config)?)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_json(&self, endpoint: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
        let url = self.url(endpoint);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(HunterError::UpstreamError {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| HunterError::malformed(endpoint, e.to_string()))
    }

    /// Query for the terms search window starting at `today`. A window past the
    /// calendar's end is clamped to the last representable date.
    pub fn terms_query(
        &self,
        city_id: CityId,
        service_id: ServiceId,
        lookup_days: u32,
        today: NaiveDate,
    ) -> Vec<(&'static str, String)> {
        let date_to = window_end(today, lookup_days).unwrap_or(NaiveDate::MAX);
        vec![
            ("searchPlace.id", city_id.to_string()),
            ("searchPlace.type", "0".to_string()),
            ("serviceVariantId", service_id.to_string()),
            ("languageId", self.config.language_id.to_string()),
            ("searchDateFrom", today.format("%Y-%m-%d").to_string()),
            ("searchDateTo", date_to.format("%Y-%m-%d").to_string()),
            ("delocalized", "false".to_string()),
        ]
    }
}

fn default_headers(config: &ApiConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(token) = &config.token {
        headers.insert(AUTHORIZATION, header_value("api.token", token)?);
    }
    if let Some(cookie) = &config.cookie {
        headers.insert(COOKIE, header_value("api.cookie", cookie)?);
    }

    Ok(headers)
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| HunterError::InvalidConfigValueError {
        field: field.to_string(),
        value: "<redacted>".to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl LuxmedApi for HttpLuxmedApi {
    async fn get_cities_raw(&self) -> Result<serde_json::Value> {
        self.get_json(&self.config.endpoints.cities, &[]).await
    }

    async fn get_services_raw(&self) -> Result<serde_json::Value> {
        self.get_json(&self.config.endpoints.services, &[]).await
    }

    async fn get_clinics_and_doctors_raw(
        &self,
        city_id: CityId,
        service_id: ServiceId,
    ) -> Result<serde_json::Value> {
        let query = [
            ("cityId", city_id.to_string()),
            ("serviceVariantId", service_id.to_string()),
        ];
        self.get_json(&self.config.endpoints.facilities_and_doctors, &query)
            .await
    }

    async fn get_terms_raw(
        &self,
        city_id: CityId,
        service_id: ServiceId,
        lookup_days: u32,
    ) -> Result<serde_json::Value> {
        let today = chrono::Local::now().date_naive();
        let query = self.terms_query(city_id, service_id, lookup_days, today);
        self.get_json(&self.config.endpoints.terms, &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_query_spans_lookup_window() {
        let api = HttpLuxmedApi::new(ApiConfig::default()).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();

        let query = api.terms_query(5, 4502, 7, today);

        assert!(query.contains(&("searchPlace.id", "5".to_string())));
        assert!(query.contains(&("serviceVariantId", "4502".to_string())));
        assert!(query.contains(&("searchDateFrom", "2024-12-28".to_string())));
        assert!(query.contains(&("searchDateTo", "2025-01-04".to_string())));
    }

    #[test]
    fn test_terms_query_clamps_oversized_window() {
        let api = HttpLuxmedApi::new(ApiConfig::default()).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();

        let query = api.terms_query(5, 4502, u32::MAX, today);

        let date_to = NaiveDate::MAX.format("%Y-%m-%d").to_string();
        assert!(query.contains(&("searchDateTo", date_to)));
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let config = ApiConfig {
            token: Some("bad\nvalue".to_string()),
            ..ApiConfig::default()
        };
        assert!(matches!(
            HttpLuxmedApi::new(config),
            Err(HunterError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..ApiConfig::default()
        };
        let api = HttpLuxmedApi::new(config).unwrap();
        assert_eq!(api.url("/cities"), "http://localhost:8080/cities");
    }
}
