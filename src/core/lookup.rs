//! Projections of the raw dictionary endpoints into flat, sorted tables.

use crate::domain::model::{
    City, CityId, Clinic, ClinicId, ClinicsAndDoctors, Doctor, Named, Service, ServiceId,
    ServiceNode,
};
use crate::domain::ports::LuxmedApi;
use crate::utils::error::{HunterError, LookupKind, Result};
use serde::de::DeserializeOwned;

/// Deserializes an API payload, naming the endpoint on failure.
pub fn parse_response<T: DeserializeOwned>(endpoint: &str, value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| HunterError::malformed(endpoint, e.to_string()))
}

/// Collects the bookable services from the category tree.
///
/// Categories are never bookable. A child of a category is bookable when it
/// has no children of its own; otherwise its children are.
pub fn flatten_services(categories: &[ServiceNode]) -> Vec<Service> {
    let mut services = Vec::new();

    for category in categories {
        for service in &category.children {
            if service.is_leaf() {
                services.push(Service {
                    id: service.id,
                    name: service.name.clone(),
                });
            }
            for subcategory in &service.children {
                services.push(Service {
                    id: subcategory.id,
                    name: subcategory.name.clone(),
                });
            }
        }
    }

    services.sort_by(|a, b| a.name.cmp(&b.name));
    services
}

pub fn sort_clinics(mut clinics: Vec<Clinic>) -> Vec<Clinic> {
    clinics.sort_by(|a, b| a.name.cmp(&b.name));
    clinics
}

pub fn project_doctors(response: ClinicsAndDoctors, clinic_id: Option<ClinicId>) -> Vec<Doctor> {
    let mut doctors = response.doctors;
    doctors.sort_by(|a, b| a.first_name.cmp(&b.first_name));

    doctors
        .into_iter()
        .filter(|doctor| match clinic_id {
            Some(id) => doctor.facility_group_ids.contains(&id),
            None => true,
        })
        .map(Doctor::from)
        .collect()
}

pub fn same_name(left: &str, right: &str) -> bool {
    left.to_uppercase() == right.to_uppercase()
}

/// Id of the first row whose name matches case-insensitively.
pub fn resolve_id<T: Named>(rows: &[T], kind: LookupKind, wanted: &str) -> Result<i64> {
    rows.iter()
        .find(|row| same_name(row.name(), wanted))
        .map(Named::id)
        .ok_or_else(|| HunterError::not_found(kind, wanted))
}

pub async fn get_cities<A: LuxmedApi + ?Sized>(api: &A) -> Result<Vec<City>> {
    let raw = api.get_cities_raw().await?;
    let cities: Vec<City> = parse_response("cities", raw)?;
    tracing::debug!("Fetched {} cities", cities.len());
    Ok(cities)
}

pub async fn get_services<A: LuxmedApi + ?Sized>(api: &A) -> Result<Vec<Service>> {
    let raw = api.get_services_raw().await?;
    let categories: Vec<ServiceNode> = parse_response("services", raw)?;
    let services = flatten_services(&categories);
    tracing::debug!(
        "Flattened {} categories into {} services",
        categories.len(),
        services.len()
    );
    Ok(services)
}

async fn get_clinics_and_doctors<A: LuxmedApi + ?Sized>(
    api: &A,
    city_id: CityId,
    service_id: ServiceId,
) -> Result<ClinicsAndDoctors> {
    let raw = api.get_clinics_and_doctors_raw(city_id, service_id).await?;
    parse_response("facilitiesAndDoctors", raw)
}

pub async fn get_clinics<A: LuxmedApi + ?Sized>(
    api: &A,
    city_id: CityId,
    service_id: ServiceId,
) -> Result<Vec<Clinic>> {
    let response = get_clinics_and_doctors(api, city_id, service_id).await?;
    Ok(sort_clinics(response.facilities))
}

pub async fn get_doctors<A: LuxmedApi + ?Sized>(
    api: &A,
    city_id: CityId,
    service_id: ServiceId,
    clinic_id: Option<ClinicId>,
) -> Result<Vec<Doctor>> {
    let response = get_clinics_and_doctors(api, city_id, service_id).await?;
    Ok(project_doctors(response, clinic_id))
}
