//! Appointment term search: name resolution, flattening and filtering.

use crate::core::lookup::{self, parse_response, resolve_id};
use crate::domain::model::{
    CityId, ClinicId, DoctorId, ReferenceData, ServiceId, Term, TermQuery, TermsResponse,
};
use crate::domain::ports::LuxmedApi;
use crate::utils::date::{parse_api_datetime, window_end};
use crate::utils::error::{LookupKind, Result};
use chrono::NaiveDate;

/// One row per term, across all days of the response.
pub fn flatten_terms(response: TermsResponse) -> Result<Vec<Term>> {
    response
        .terms_for_service
        .terms_for_days
        .into_iter()
        .flat_map(|day| day.terms)
        .map(|term| {
            let date_time_from = parse_api_datetime(&term.date_time_from)?;
            Ok(Term {
                day: date_time_from.date(),
                doctor_name: format!("{} {}", term.doctor.first_name, term.doctor.last_name),
                doctor_id: term.doctor.id,
                clinic_id: term.clinic_id,
                service_id: term.service_id,
                date_time_from,
            })
        })
        .collect()
}

/// Drops terms past the lookup window; the API is not trusted to honour it.
/// A window reaching past the calendar's end keeps everything.
pub fn within_window(terms: Vec<Term>, today: NaiveDate, lookup_days: u32) -> Vec<Term> {
    match window_end(today, lookup_days) {
        Some(last_day) => terms.into_iter().filter(|term| term.day <= last_day).collect(),
        None => terms,
    }
}

pub fn with_doctor(terms: Vec<Term>, doctor_id: DoctorId) -> Vec<Term> {
    terms.into_iter().filter(|term| term.doctor_id == doctor_id).collect()
}

pub fn with_clinic(terms: Vec<Term>, clinic_id: ClinicId) -> Vec<Term> {
    terms.into_iter().filter(|term| term.clinic_id == clinic_id).collect()
}

pub async fn get_available_terms<A: LuxmedApi + ?Sized>(
    api: &A,
    city_id: CityId,
    service_id: ServiceId,
    lookup_days: u32,
) -> Result<Vec<Term>> {
    let raw = api.get_terms_raw(city_id, service_id, lookup_days).await?;
    let response: TermsResponse = parse_response("terms", raw)?;
    flatten_terms(response)
}

/// Resolves the query's names against `reference` and the live doctor and
/// clinic lists, then narrows the available terms.
///
/// Doctor and clinic lists are only fetched while terms remain.
pub async fn get_available_terms_translated<A: LuxmedApi + ?Sized>(
    api: &A,
    reference: &ReferenceData,
    query: &TermQuery,
    today: NaiveDate,
) -> Result<Vec<Term>> {
    let city_id = resolve_id(&reference.cities, LookupKind::City, &query.city)?;
    let service_id = resolve_id(&reference.services, LookupKind::Service, &query.service)?;
    tracing::debug!(city_id, service_id, "Resolved term query");

    let mut terms = get_available_terms(api, city_id, service_id, query.lookup_days).await?;
    let fetched = terms.len();

    if !terms.is_empty() {
        terms = within_window(terms, today, query.lookup_days);
    }

    if let Some(doctor_name) = query.doctor.as_deref().filter(|name| !name.is_empty()) {
        if !terms.is_empty() {
            let doctors = lookup::get_doctors(api, city_id, service_id, None).await?;
            let doctor_id = resolve_id(&doctors, LookupKind::Doctor, doctor_name)?;
            terms = with_doctor(terms, doctor_id);
        }
    }

    if let Some(clinic_name) = query.clinic.as_deref().filter(|name| !name.is_empty()) {
        if !terms.is_empty() {
            let clinics = lookup::get_clinics(api, city_id, service_id).await?;
            let clinic_id = resolve_id(&clinics, LookupKind::Clinic, clinic_name)?;
            terms = with_clinic(terms, clinic_id);
        }
    }

    tracing::info!("{} of {} fetched terms match", terms.len(), fetched);
    Ok(terms)
}
