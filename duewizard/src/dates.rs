//! Due-date normalization and display.
//!
//! Canvas dates in this tool always carry a fixed `-04:00` offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

const OFFSET_WEST_SECS: i32 = 4 * 3600;

/// `Sep 20, 2025`
pub const SHORT: &str = "%b %-d, %Y";
/// `Saturday, September 20, 2025 at 11:59 PM`
pub const LONG_WITH_TIME: &str = "%A, %B %-d, %Y at %-I:%M %p";
/// `11:59 PM`
pub const TIME: &str = "%-I:%M %p";
/// Value for `<input type="date">`.
pub const INPUT_DATE: &str = "%Y-%m-%d";
/// Value for `<input type="time">`.
pub const INPUT_TIME: &str = "%H:%M";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn canvas_offset() -> FixedOffset {
    FixedOffset::west_opt(OFFSET_WEST_SECS).expect("-04:00 is a valid offset")
}

/// Parse a user-supplied date and express it at the Canvas offset.
///
/// Accepts RFC 3339 timestamps (converted to `-04:00`), naive date-times and
/// bare dates (both read as `-04:00` wall time, bare dates at midnight).
pub fn normalize(input: &str) -> Option<String> {
    let input = input.trim();
    let offset = canvas_offset();

    let at_offset = if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        dt.with_timezone(&offset)
    } else {
        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(input, INPUT_DATE)
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })?;
        naive.and_local_timezone(offset).single()?
    };

    Some(at_offset.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
}

/// Format a stored due date for display, falling back to the raw text.
pub fn display(value: &str, format: &str) -> String {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.format(format).to_string())
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_timestamp_is_shifted_to_canvas_offset() {
        assert_eq!(
            normalize("2025-09-16T03:59:00.000Z").as_deref(),
            Some("2025-09-15T23:59:00-04:00")
        );
    }

    #[test]
    fn naive_input_is_read_as_canvas_wall_time() {
        assert_eq!(
            normalize("2025-09-15T23:59").as_deref(),
            Some("2025-09-15T23:59:00-04:00")
        );
        assert_eq!(
            normalize("2025-09-15").as_deref(),
            Some("2025-09-15T00:00:00-04:00")
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(normalize("next tuesday"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn display_formats() {
        let d = "2025-09-20T23:59:00-04:00";
        assert_eq!(display(d, SHORT), "Sep 20, 2025");
        assert_eq!(display(d, TIME), "11:59 PM");
        assert_eq!(display(d, INPUT_DATE), "2025-09-20");
        assert_eq!(display(d, INPUT_TIME), "23:59");
        assert_eq!(display("soon", SHORT), "soon");
    }
}
