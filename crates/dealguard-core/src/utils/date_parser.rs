use arrow::array::StringArray;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Date-only layouts, tried in order. Slash dates are read month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Best-effort date inference. Returns `None` for anything that does not
/// look like a calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    // chrono's %Y is greedy, so compact YYYYMMDD is split by hand
    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        let (year, rest) = value.split_at(4);
        let (month, day) = rest.split_at(2);
        return NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}

/// Rewrite a text column as `YYYY-MM-DD`; unparseable values become null.
pub fn standardize_date_column(array: &StringArray) -> StringArray {
    array
        .iter()
        .map(|opt_str| {
            opt_str
                .and_then(parse_date)
                .map(|date| date.format(ISO_FORMAT).to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parse_common_layouts() {
        assert_eq!(parse_date("2024-01-05"), ymd(2024, 1, 5));
        assert_eq!(parse_date("01/05/2024"), ymd(2024, 1, 5));
        assert_eq!(parse_date("2024/01/05"), ymd(2024, 1, 5));
        assert_eq!(parse_date("20240105"), ymd(2024, 1, 5));
        assert_eq!(parse_date("Jan 5, 2024"), ymd(2024, 1, 5));
        assert_eq!(parse_date("5 January 2024"), ymd(2024, 1, 5));
        assert_eq!(parse_date("2024-01-05 13:45:00"), ymd(2024, 1, 5));
        assert_eq!(parse_date("2024-01-05T13:45:00Z"), ymd(2024, 1, 5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn test_standardize_column() {
        let array = StringArray::from(vec![Some("01/05/2024"), Some("soon"), None]);
        let out = standardize_date_column(&array);
        assert_eq!(out.value(0), "2024-01-05");
        assert!(out.is_null(1));
        assert!(out.is_null(2));
    }
}
