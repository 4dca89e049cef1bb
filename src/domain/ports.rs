use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

use super::model::{CityId, ServiceId};

pub const LAST_UPDATE_KEY: &str = "last_update_date";

/// Raw-JSON operations of the booking API.
#[async_trait]
pub trait LuxmedApi: Send + Sync {
    async fn get_cities_raw(&self) -> Result<serde_json::Value>;
    async fn get_services_raw(&self) -> Result<serde_json::Value>;
    async fn get_clinics_and_doctors_raw(
        &self,
        city_id: CityId,
        service_id: ServiceId,
    ) -> Result<serde_json::Value>;
    async fn get_terms_raw(
        &self,
        city_id: CityId,
        service_id: ServiceId,
        lookup_days: u32,
    ) -> Result<serde_json::Value>;
}

/// Opens a session on a persistent key-value store.
pub trait CacheStore: Send + Sync {
    type Session: CacheSession;

    fn open(&self) -> Result<Self::Session>;
}

/// Writes made with `put` become visible to the next `open` only after `commit`.
pub trait CacheSession {
    fn get(&self, key: &str) -> Option<serde_json::Value>;
    fn put(&mut self, key: &str, value: serde_json::Value);
    fn commit(self) -> Result<()>;

    /// `None` when the date is missing or unreadable.
    fn last_refreshed(&self) -> Option<NaiveDate> {
        self.get(LAST_UPDATE_KEY)
            .and_then(|value| serde_json::from_value(value).ok())
    }
}

/// Destination for human-readable exports.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn cache_path(&self) -> &str;
    fn export_dir(&self) -> &str;
    fn refresh_pause(&self) -> Duration;
}
