use chrono::DateTime;

/// Render a stored progress timestamp for display.
///
/// RFC 3339 values are shown as `YYYY-MM-DD HH:MM` (UTC); anything else the
/// server sent is shown verbatim.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_owned(),
        |at| at.naive_utc().format("%Y-%m-%d %H:%M").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rfc3339_and_passes_through_other_text() {
        assert_eq!(format_timestamp("2023-11-14T22:13:20.000Z"), "2023-11-14 22:13");
        assert_eq!(format_timestamp("2024-01-01T02:00:00+02:00"), "2024-01-01 00:00");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
