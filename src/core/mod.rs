pub mod hunter;
pub mod lookup;
pub mod reference;
pub mod table;
pub mod terms;

pub use crate::domain::model::{
    City, Clinic, Doctor, ReferenceData, Service, ServiceNode, Term, TermQuery,
};
pub use crate::domain::ports::{CacheSession, CacheStore, ConfigProvider, LuxmedApi, Storage};
pub use crate::utils::error::Result;
