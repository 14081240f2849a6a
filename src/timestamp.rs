use chrono::NaiveDate;

pub const DATE_UNKNOWN: &str = "date unknown";

/// Which index encoding a raw timestamp came from. Both encodings currently
/// emit 14-digit `YYYYMMDDhhmmss` stamps, so the offset tables agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimestampStyle {
    Structured,
    Delimited,
}

impl TimestampStyle {
    fn offsets(self) -> (usize, usize, usize) {
        match self {
            TimestampStyle::Structured => (0, 4, 6),
            TimestampStyle::Delimited => (0, 4, 6),
        }
    }
}

/// `YYYY-MM-DD`, or the sentinel when the stamp is too short or names an
/// impossible calendar date.
pub fn format_archive_date(raw: &str, style: TimestampStyle) -> String {
    match extract_date(raw, style) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => DATE_UNKNOWN.to_string(),
    }
}

fn extract_date(raw: &str, style: TimestampStyle) -> Option<NaiveDate> {
    let (y, m, d) = style.offsets();
    let year: i32 = raw.get(y..y + 4)?.parse().ok()?;
    let month: u32 = raw.get(m..m + 2)?.parse().ok()?;
    let day: u32 = raw.get(d..d + 2)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_stamp_formats_as_date() {
        assert_eq!(
            format_archive_date("20230115120000", TimestampStyle::Structured),
            "2023-01-15"
        );
        assert_eq!(
            format_archive_date("20230115000000", TimestampStyle::Delimited),
            "2023-01-15"
        );
    }

    #[test]
    fn test_eight_digit_stamp_is_enough() {
        assert_eq!(
            format_archive_date("19991231", TimestampStyle::Structured),
            "1999-12-31"
        );
    }

    #[test]
    fn test_truncated_stamp_is_unknown() {
        assert_eq!(format_archive_date("2023", TimestampStyle::Structured), DATE_UNKNOWN);
        assert_eq!(format_archive_date("202301", TimestampStyle::Delimited), DATE_UNKNOWN);
        assert_eq!(format_archive_date("", TimestampStyle::Structured), DATE_UNKNOWN);
    }

    #[test]
    fn test_out_of_range_fields_are_unknown() {
        assert_eq!(
            format_archive_date("20231315000000", TimestampStyle::Structured),
            DATE_UNKNOWN
        );
        assert_eq!(
            format_archive_date("20230230000000", TimestampStyle::Delimited),
            DATE_UNKNOWN
        );
        assert_eq!(
            format_archive_date("20230100000000", TimestampStyle::Structured),
            DATE_UNKNOWN
        );
    }

    #[test]
    fn test_non_digit_stamp_is_unknown() {
        assert_eq!(
            format_archive_date("not-a-stamp-00", TimestampStyle::Structured),
            DATE_UNKNOWN
        );
    }
}
