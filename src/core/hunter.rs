use crate::core::lookup::{self, resolve_id};
use crate::core::reference::ReferenceCache;
use crate::core::terms;
use crate::domain::model::{City, Clinic, Doctor, ReferenceData, Service, Term, TermQuery};
use crate::domain::ports::{CacheStore, LuxmedApi, Storage};
use crate::utils::error::{LookupKind, Result};

/// Name-based entry point over the booking API and the reference cache.
pub struct LuxmedHunter<A: LuxmedApi, S: CacheStore, E: Storage> {
    api: A,
    reference: ReferenceCache<S, E>,
}

impl<A: LuxmedApi, S: CacheStore, E: Storage> LuxmedHunter<A, S, E> {
    pub fn new(api: A, reference: ReferenceCache<S, E>) -> Self {
        Self { api, reference }
    }

    pub async fn reference_data(&self) -> Result<ReferenceData> {
        self.reference.evaluate_db(&self.api).await
    }

    /// Refetches the reference tables regardless of the stored date.
    pub async fn refresh_reference_data(&self) -> Result<ReferenceData> {
        let today = chrono::Local::now().date_naive();
        self.reference.force_refresh(&self.api, today).await
    }

    pub async fn cities(&self) -> Result<Vec<City>> {
        Ok(self.reference_data().await?.cities)
    }

    pub async fn services(&self) -> Result<Vec<Service>> {
        Ok(self.reference_data().await?.services)
    }

    async fn resolve_city_and_service(&self, city: &str, service: &str) -> Result<(i64, i64)> {
        let reference = self.reference_data().await?;
        let city_id = resolve_id(&reference.cities, LookupKind::City, city)?;
        let service_id = resolve_id(&reference.services, LookupKind::Service, service)?;
        Ok((city_id, service_id))
    }

    pub async fn clinics(&self, city: &str, service: &str) -> Result<Vec<Clinic>> {
        let (city_id, service_id) = self.resolve_city_and_service(city, service).await?;
        lookup::get_clinics(&self.api, city_id, service_id).await
    }

    pub async fn doctors(
        &self,
        city: &str,
        service: &str,
        clinic: Option<&str>,
    ) -> Result<Vec<Doctor>> {
        let (city_id, service_id) = self.resolve_city_and_service(city, service).await?;

        let clinic_id = match clinic {
            Some(name) => {
                let clinics = lookup::get_clinics(&self.api, city_id, service_id).await?;
                Some(resolve_id(&clinics, LookupKind::Clinic, name)?)
            }
            None => None,
        };

        lookup::get_doctors(&self.api, city_id, service_id, clinic_id).await
    }

    pub async fn get_available_terms_translated(&self, query: &TermQuery) -> Result<Vec<Term>> {
        let reference = self.reference_data().await?;
        let today = chrono::Local::now().date_naive();
        terms::get_available_terms_translated(&self.api, &reference, query, today).await
    }
}
