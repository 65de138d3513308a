use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Parses the loosely formatted `date` column of a lead.
///
/// Zoned timestamps are converted to UTC. Returns `None` for anything else,
/// which callers treat as "no date".
pub fn parse_lead_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    log::debug!("unparsable lead date '{}'", raw);
    None
}

/// Parses a `YYYY-MM-DD` query bound.
pub fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", raw.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn accepts_the_formats_found_in_lead_tables() {
        assert_eq!(
            parse_lead_date("2024-02-01T10:30:00.000Z"),
            Some(ymd_hms(2024, 2, 1, 10, 30, 0))
        );
        assert_eq!(
            parse_lead_date("2024-02-01T16:00:00+05:30"),
            Some(ymd_hms(2024, 2, 1, 10, 30, 0))
        );
        assert_eq!(
            parse_lead_date("2024-02-01 09:15"),
            Some(ymd_hms(2024, 2, 1, 9, 15, 0))
        );
        assert_eq!(parse_lead_date("2024-02-01"), Some(ymd_hms(2024, 2, 1, 0, 0, 0)));
        assert_eq!(parse_lead_date("01/02/2024"), Some(ymd_hms(2024, 2, 1, 0, 0, 0)));
    }

    #[test]
    fn garbage_is_absent() {
        assert_eq!(parse_lead_date(""), None);
        assert_eq!(parse_lead_date("yesterday"), None);
        assert_eq!(parse_lead_date("2024-13-45"), None);
    }

    #[test]
    fn query_days_are_strict() {
        assert!(parse_day("2024-03-01").is_ok());
        assert!(parse_day("03/01/2024").is_err());
    }
}
