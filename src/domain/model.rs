use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub type CityId = i64;
pub type ServiceId = i64;
pub type ClinicId = i64;
pub type DoctorId = i64;

/// A row that can be looked up by its human-readable name.
pub trait Named {
    fn name(&self) -> &str;
    fn id(&self) -> i64;
}

macro_rules! impl_named {
    ($($row:ty),+) => {
        $(impl Named for $row {
            fn name(&self) -> &str {
                &self.name
            }

            fn id(&self) -> i64 {
                self.id
            }
        })+
    };
}

impl_named!(City, Service, Clinic, Doctor);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
}

/// One node of the service category tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceNode {
    pub id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub children: Vec<ServiceNode>,
}

impl ServiceNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A facility. Fields other than `id` and `name` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub id: ClinicId,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Doctor as returned by the facilities-and-doctors endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDoctor {
    pub id: DoctorId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub academic_title: Option<String>,
    #[serde(default)]
    pub facility_group_ids: Vec<ClinicId>,
    #[serde(default)]
    pub is_english_speaker: bool,
}

/// Doctor row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub name: String,
    pub id: DoctorId,
    pub academic_title: Option<String>,
    pub facility_group_ids: Vec<ClinicId>,
    pub is_english_speaker: bool,
    pub first_name: String,
    pub last_name: String,
}

impl From<RawDoctor> for Doctor {
    fn from(raw: RawDoctor) -> Self {
        Self {
            name: format!("{} {}", raw.first_name, raw.last_name),
            id: raw.id,
            academic_title: raw.academic_title,
            facility_group_ids: raw.facility_group_ids,
            is_english_speaker: raw.is_english_speaker,
            first_name: raw.first_name,
            last_name: raw.last_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClinicsAndDoctors {
    #[serde(default)]
    pub facilities: Vec<Clinic>,
    #[serde(default)]
    pub doctors: Vec<RawDoctor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsResponse {
    pub terms_for_service: TermsForService,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsForService {
    #[serde(default)]
    pub terms_for_days: Vec<TermsForDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TermsForDay {
    #[serde(default)]
    pub terms: Vec<RawTerm>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTerm {
    pub date_time_from: String,
    pub doctor: TermDoctor,
    pub clinic_id: ClinicId,
    pub service_id: ServiceId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermDoctor {
    pub id: DoctorId,
    pub first_name: String,
    pub last_name: String,
}

/// One available appointment slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub day: NaiveDate,
    pub doctor_name: String,
    #[serde(rename = "doctorId")]
    pub doctor_id: DoctorId,
    #[serde(rename = "clinicId")]
    pub clinic_id: ClinicId,
    #[serde(rename = "serviceId")]
    pub service_id: ServiceId,
    #[serde(rename = "dateTimeFrom")]
    pub date_time_from: NaiveDateTime,
}

/// Search parameters for available terms. Names match case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    pub city: String,
    pub service: String,
    pub lookup_days: u32,
    pub doctor: Option<String>,
    pub clinic: Option<String>,
}

impl TermQuery {
    pub fn new(city: impl Into<String>, service: impl Into<String>, lookup_days: u32) -> Self {
        Self {
            city: city.into(),
            service: service.into(),
            lookup_days,
            doctor: None,
            clinic: None,
        }
    }

    pub fn with_doctor(mut self, doctor: impl Into<String>) -> Self {
        self.doctor = Some(doctor.into());
        self
    }

    pub fn with_clinic(mut self, clinic: impl Into<String>) -> Self {
        self.clinic = Some(clinic.into());
        self
    }
}

/// Cached reference tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    pub cities: Vec<City>,
    pub services: Vec<Service>,
}
