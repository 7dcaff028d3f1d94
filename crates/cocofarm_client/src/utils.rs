//! Date helpers shared by the request builders and history grouping.

use chrono::NaiveDate;

/// Parse a backend date into a `NaiveDate`, discarding any time-of-day.
///
/// Accepts:
/// - `YYYY-MM-DD`
/// - RFC3339 datetime
/// - Naive datetime `YYYY-MM-DDTHH:MM:SS`
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.date());
    }
    None
}

/// Normalize a date string to `YYYY-MM-DD`, the grouping key for daily
/// statistics.
pub fn normalize_date_str(s: &str) -> Option<String> {
    parse_iso_date(s).map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_date() {
        assert_eq!(
            parse_iso_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn normalize_strips_time_of_day() {
        assert_eq!(
            normalize_date_str("2024-01-05T14:30:00").unwrap(),
            "2024-01-05"
        );
        assert_eq!(
            normalize_date_str("2024-01-05T14:30:00Z").unwrap(),
            "2024-01-05"
        );
    }

    #[test]
    fn normalize_rejects_invalid() {
        assert!(normalize_date_str("yesterday").is_none());
    }
}
