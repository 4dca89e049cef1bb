use crate::domain::model::{City, Clinic, Doctor, Service, Term};
use crate::utils::error::{HunterError, Result};
use serde::Serialize;
use std::str::FromStr;

/// A row that can be printed as part of a table.
pub trait TableRow: Serialize {
    fn headers() -> Vec<String>;
    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Csv,
    #[default]
    Tsv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = HunterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(HunterError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: csv, tsv, json".to_string(),
            }),
        }
    }
}

pub fn render<R: TableRow>(rows: &[R], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => render_delimited(rows, b','),
        OutputFormat::Tsv => render_delimited(rows, b'\t'),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}

fn render_delimited<R: TableRow>(rows: &[R], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(R::headers())?;
    for row in rows {
        writer.write_record(row.cells())?;
    }

    into_string(writer)
}

/// One value per line, no header. Used for the name exports.
pub fn render_column<'a, I>(values: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for value in values {
        writer.write_record([value])?;
    }

    into_string(writer)
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| HunterError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| HunterError::malformed("table", e.to_string()))
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl TableRow for City {
    fn headers() -> Vec<String> {
        headers(&["id", "name"])
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone()]
    }
}

impl TableRow for Service {
    fn headers() -> Vec<String> {
        headers(&["id", "name"])
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone()]
    }
}

/// Facility fields beyond `id` and `name` differ per API version, so they
/// travel as one JSON object column.
impl TableRow for Clinic {
    fn headers() -> Vec<String> {
        headers(&["id", "name", "extra"])
    }

    fn cells(&self) -> Vec<String> {
        let extra = serde_json::Value::Object(self.extra.clone()).to_string();
        vec![self.id.to_string(), self.name.clone(), extra]
    }
}

impl TableRow for Doctor {
    fn headers() -> Vec<String> {
        headers(&[
            "name",
            "id",
            "academicTitle",
            "facilityGroupIds",
            "isEnglishSpeaker",
            "firstName",
            "lastName",
        ])
    }

    fn cells(&self) -> Vec<String> {
        let facility_ids = self
            .facility_group_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(";");

        vec![
            self.name.clone(),
            self.id.to_string(),
            self.academic_title.clone().unwrap_or_default(),
            facility_ids,
            self.is_english_speaker.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
        ]
    }
}

impl TableRow for Term {
    fn headers() -> Vec<String> {
        headers(&[
            "day",
            "doctor_name",
            "doctorId",
            "clinicId",
            "serviceId",
            "dateTimeFrom",
        ])
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.day.to_string(),
            self.doctor_name.clone(),
            self.doctor_id.to_string(),
            self.clinic_id.to_string(),
            self.service_id.to_string(),
            self.date_time_from.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor() -> Doctor {
        Doctor {
            name: "Anna Nowak".to_string(),
            id: 7,
            academic_title: Some("dr n. med.".to_string()),
            facility_group_ids: vec![1, 2],
            is_english_speaker: true,
            first_name: "Anna".to_string(),
            last_name: "Nowak".to_string(),
        }
    }

    #[test]
    fn test_doctor_columns_in_fixed_order() {
        let output = render(&[doctor()], OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "name,id,academicTitle,facilityGroupIds,isEnglishSpeaker,firstName,lastName"
        );
        assert_eq!(lines[1], "Anna Nowak,7,dr n. med.,1;2,true,Anna,Nowak");
    }

    #[test]
    fn test_doctor_json_keeps_field_order() {
        let output = render(&[doctor()], OutputFormat::Json).unwrap();
        let name_at = output.find("\"name\"").unwrap();
        let last_at = output.find("\"lastName\"").unwrap();
        assert!(name_at < last_at);
    }

    #[test]
    fn test_clinic_keeps_raw_fields() {
        let clinic: Clinic = serde_json::from_value(serde_json::json!({
            "id": 100,
            "name": "LX Wola",
            "city": "Warszawa",
            "isExternal": false
        }))
        .unwrap();

        let output = render(&[clinic], OutputFormat::Tsv).unwrap();
        assert_eq!(
            output,
            "id\tname\textra\n100\tLX Wola\t\"{\"\"city\"\":\"\"Warszawa\"\",\"\"isExternal\"\":false}\"\n"
        );

        let bare = Clinic {
            id: 200,
            name: "LX Mokotów".to_string(),
            extra: serde_json::Map::new(),
        };
        let output = render(&[bare], OutputFormat::Csv).unwrap();
        assert_eq!(output.lines().nth(1), Some("200,LX Mokotów,{}"));
    }

    #[test]
    fn test_tsv_uses_tabs() {
        let cities = vec![City {
            id: 1,
            name: "Warszawa".to_string(),
        }];
        let output = render(&cities, OutputFormat::Tsv).unwrap();
        assert_eq!(output, "id\tname\n1\tWarszawa\n");
    }

    #[test]
    fn test_render_column_quotes_like_csv() {
        let output = render_column(["Kraków", "Ortopeda, dzieci"]).unwrap();
        assert_eq!(output, "Kraków\n\"Ortopeda, dzieci\"\n");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }
}
