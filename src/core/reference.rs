//! Daily cache of the slow-changing dictionaries (cities and services).

use crate::core::lookup;
use crate::core::table::render_column;
use crate::domain::model::{City, ReferenceData, Service};
use crate::domain::ports::{CacheSession, CacheStore, LuxmedApi, Storage, LAST_UPDATE_KEY};
use crate::utils::error::{HunterError, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const CITIES_KEY: &str = "cities_df";
pub const SERVICES_KEY: &str = "services_df";
pub const CITIES_EXPORT: &str = "cities.txt";
pub const SERVICES_EXPORT: &str = "services.txt";

pub struct ReferenceCache<S: CacheStore, E: Storage> {
    store: S,
    exports: E,
    refresh_pause: Duration,
}

impl<S: CacheStore, E: Storage> ReferenceCache<S, E> {
    pub fn new(store: S, exports: E, refresh_pause: Duration) -> Self {
        Self {
            store,
            exports,
            refresh_pause,
        }
    }

    /// Returns cached cities and services, refetching them at most once per day.
    pub async fn evaluate_db<A: LuxmedApi + ?Sized>(&self, api: &A) -> Result<ReferenceData> {
        self.evaluate_on(api, chrono::Local::now().date_naive()).await
    }

    pub async fn evaluate_on<A: LuxmedApi + ?Sized>(
        &self,
        api: &A,
        today: NaiveDate,
    ) -> Result<ReferenceData> {
        let session = self.store.open()?;

        if let Some(cached) = read_current(&session, today)? {
            tracing::debug!(
                "Using cached reference data ({} cities, {} services)",
                cached.cities.len(),
                cached.services.len()
            );
            return Ok(cached);
        }

        tracing::info!("Refreshing reference data for {}", today);
        self.refresh(api, session, today).await
    }

    pub async fn force_refresh<A: LuxmedApi + ?Sized>(
        &self,
        api: &A,
        today: NaiveDate,
    ) -> Result<ReferenceData> {
        let session = self.store.open()?;
        self.refresh(api, session, today).await
    }

    /// Fetches both tables and stores them with `today` in a single commit.
    async fn refresh<A: LuxmedApi + ?Sized>(
        &self,
        api: &A,
        mut session: S::Session,
        today: NaiveDate,
    ) -> Result<ReferenceData> {
        let cities = lookup::get_cities(api).await?;
        if !self.refresh_pause.is_zero() {
            tokio::time::sleep(self.refresh_pause).await;
        }
        let services = lookup::get_services(api).await?;

        session.put(CITIES_KEY, serde_json::to_value(&cities)?);
        session.put(SERVICES_KEY, serde_json::to_value(&services)?);
        session.put(LAST_UPDATE_KEY, serde_json::to_value(today)?);
        session.commit()?;

        self.export_names(&cities, &services).await?;
        tracing::info!(
            "Cached {} cities and {} services",
            cities.len(),
            services.len()
        );

        Ok(ReferenceData { cities, services })
    }

    async fn export_names(&self, cities: &[City], services: &[Service]) -> Result<()> {
        let city_names = render_column(cities.iter().map(|c| c.name.as_str()))?;
        self.exports
            .write_file(CITIES_EXPORT, city_names.as_bytes())
            .await?;

        let service_names = render_column(services.iter().map(|s| s.name.as_str()))?;
        self.exports
            .write_file(SERVICES_EXPORT, service_names.as_bytes())
            .await
    }
}

/// Cached tables when they are complete and dated today or later.
fn read_current<C: CacheSession>(session: &C, today: NaiveDate) -> Result<Option<ReferenceData>> {
    match session.last_refreshed() {
        Some(stored) if stored >= today => {}
        _ => return Ok(None),
    }

    let cities: Option<Vec<City>> = read_table(session, CITIES_KEY)?;
    let services: Option<Vec<Service>> = read_table(session, SERVICES_KEY)?;

    match (cities, services) {
        (Some(cities), Some(services)) => Ok(Some(ReferenceData { cities, services })),
        _ => {
            tracing::warn!("Cache is dated but incomplete; refetching");
            Ok(None)
        }
    }
}

fn read_table<C: CacheSession, T: DeserializeOwned>(session: &C, key: &str) -> Result<Option<T>> {
    session
        .get(key)
        .map(|value| {
            serde_json::from_value(value).map_err(|e| HunterError::CacheError {
                message: format!("stored '{}' is unreadable: {}", key, e),
            })
        })
        .transpose()
}
