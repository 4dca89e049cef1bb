use crate::utils::error::{HunterError, Result};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses a booking API timestamp into the wall-clock time it names.
///
/// The API sends `2024-05-10T08:00:00+02:00`; the offset is dropped, so the
/// result is the local time at the clinic. Offset-less strings are accepted
/// as-is.
pub fn parse_api_datetime(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            HunterError::malformed("dateTimeFrom", format!("unrecognised date-time '{}'", value))
        })
}

/// Last day of a `lookup_days` window starting at `today`, or `None` when it
/// lies past the last representable date.
pub fn window_end(today: NaiveDate, lookup_days: u32) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(u64::from(lookup_days)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_dropped_not_converted() {
        let parsed = parse_api_datetime("2024-05-10T08:15:00+02:00").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_naive_and_fractional_forms() {
        let plain = parse_api_datetime("2024-05-10T23:59:00").unwrap();
        assert_eq!(plain.date(), NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());

        let fractional = parse_api_datetime("2024-05-10T07:00:00.000").unwrap();
        assert_eq!(fractional.format("%H:%M").to_string(), "07:00");
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = parse_api_datetime("next tuesday").unwrap_err();
        assert!(matches!(err, HunterError::MalformedResponse { .. }));
    }

    #[test]
    fn test_window_end_inclusive_and_bounded() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        assert_eq!(
            window_end(today, 7),
            NaiveDate::from_ymd_opt(2025, 1, 4)
        );
        assert_eq!(window_end(today, 0), Some(today));
        assert_eq!(window_end(today, u32::MAX), None);
    }
}
