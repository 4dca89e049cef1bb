use crate::domain::ports::ConfigProvider;
use crate::utils::error::{HunterError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "luxmedhunter.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as the `Authorization` header.
    pub token: Option<String>,
    /// Sent as the `Cookie` header.
    pub cookie: Option<String>,
    pub timeout_seconds: u64,
    pub language_id: u32,
    pub endpoints: EndpointsConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://portalpacjenta.luxmed.pl".to_string(),
            token: None,
            cookie: None,
            timeout_seconds: 30,
            language_id: 10,
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Whole-request timeout for the HTTP client.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub cities: String,
    pub services: String,
    pub facilities_and_doctors: String,
    pub terms: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            cities: "/PatientPortal/NewPortal/Dictionary/cities".to_string(),
            services: "/PatientPortal/NewPortal/Dictionary/serviceVariantsGroups".to_string(),
            facilities_and_doctors: "/PatientPortal/NewPortal/Dictionary/facilitiesAndDoctors"
                .to_string(),
            terms: "/PatientPortal/NewPortal/terms/index".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: String,
    /// Where `cities.txt` and `services.txt` are written.
    pub export_dir: String,
    pub refresh_pause_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: "luxmedhunter/db/saved_data.db".to_string(),
            export_dir: ".".to_string(),
            refresh_pause_ms: 2000,
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HunterError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Defaults when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No config at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HunterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HunterError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for AppConfig {
    fn cache_path(&self) -> &str {
        &self.cache.path
    }

    fn export_dir(&self) -> &str {
        &self.cache.export_dir
    }

    fn refresh_pause(&self) -> Duration {
        Duration::from_millis(self.cache.refresh_pause_ms)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_positive_number("api.timeout_seconds", self.api.timeout_seconds, 1)?;

        let endpoints = &self.api.endpoints;
        validation::validate_endpoint_path("api.endpoints.cities", &endpoints.cities)?;
        validation::validate_endpoint_path("api.endpoints.services", &endpoints.services)?;
        validation::validate_endpoint_path(
            "api.endpoints.facilities_and_doctors",
            &endpoints.facilities_and_doctors,
        )?;
        validation::validate_endpoint_path("api.endpoints.terms", &endpoints.terms)?;

        if let Some(token) = &self.api.token {
            validation::validate_non_empty_string("api.token", token)?;
        }

        validation::validate_path("cache.path", &self.cache.path)?;
        validation::validate_path("cache.export_dir", &self.cache.export_dir)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.api.base_url, "https://portalpacjenta.luxmed.pl");
        assert_eq!(config.cache.path, "luxmedhunter/db/saved_data.db");
        assert_eq!(config.refresh_pause(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_merge_with_defaults() {
        let toml_content = r#"
[api]
base_url = "http://localhost:9000"
timeout_seconds = 5

[api.endpoints]
terms = "/terms"

[cache]
refresh_pause_ms = 0
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert_eq!(config.api.endpoints.terms, "/terms");
        assert_eq!(
            config.api.endpoints.cities,
            "/PatientPortal/NewPortal/Dictionary/cities"
        );
        assert_eq!(config.refresh_pause(), Duration::ZERO);
        assert_eq!(config.export_dir(), ".");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LUXMED_TEST_TOKEN", "Bearer abc123");

        let toml_content = r#"
[api]
token = "${LUXMED_TEST_TOKEN}"
cookie = "${LUXMED_TEST_UNSET_COOKIE}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.token.as_deref(), Some("Bearer abc123"));
        assert_eq!(
            config.api.cookie.as_deref(),
            Some("${LUXMED_TEST_UNSET_COOKIE}")
        );

        std::env::remove_var("LUXMED_TEST_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[api]
base_url = "portal"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[api.endpoints]
cities = "cities"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[cache]\nexport_dir = \"exports\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.cache.export_dir, "exports");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api.timeout_seconds, 30);
    }
}
