//! Timestamp helpers. Instants are stored as RFC 3339 UTC strings with
//! millisecond precision (`2026-10-19T08:30:00.000Z`).

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub fn now_rfc3339() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

/// Format an instant in the stored timestamp shape.
pub fn format_timestamp(dt: OffsetDateTime) -> String {
    dt.to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
        .unwrap_or_default()
}

/// Parse any RFC 3339 timestamp. `None` for anything else.
pub fn parse_timestamp(ts: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(ts.trim(), &Rfc3339).ok()
}

/// Calendar day (`YYYY-MM-DD`) of an instant, in UTC.
pub fn iso_date(dt: OffsetDateTime) -> String {
    dt.to_offset(UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

pub fn today_utc() -> String {
    iso_date(OffsetDateTime::now_utc())
}

/// `HH:MM:SS` of a stored timestamp at the given offset. Unparseable input is
/// returned verbatim.
pub fn time_of_day(ts: &str, offset: UtcOffset) -> String {
    match parse_timestamp(ts) {
        Some(dt) => dt
            .to_offset(offset)
            .format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_else(|_| ts.to_string()),
        None => ts.to_string(),
    }
}

/// The machine's local offset, or UTC when it cannot be determined.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn format_uses_millis_and_z_suffix() {
        let dt = datetime!(2026-10-19 08:30:05.123456 UTC);
        assert_eq!(format_timestamp(dt), "2026-10-19T08:30:05.123Z");
    }

    #[test]
    fn format_normalizes_offset_to_utc() {
        let dt = datetime!(2026-10-19 10:00:00 +2);
        assert_eq!(format_timestamp(dt), "2026-10-19T08:00:00.000Z");
    }

    #[test]
    fn parse_accepts_formatted_output() {
        let dt = datetime!(2026-10-19 08:30:05.123 UTC);
        assert_eq!(parse_timestamp(&format_timestamp(dt)), Some(dt));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn iso_date_is_utc_day() {
        assert_eq!(iso_date(datetime!(2026-10-19 23:30:00 -2)), "2026-10-20");
    }

    #[test]
    fn time_of_day_applies_offset() {
        assert_eq!(time_of_day("2026-10-19T08:30:05.000Z", UtcOffset::UTC), "08:30:05");
        assert_eq!(time_of_day("2026-10-19T08:30:05.000Z", offset!(+2)), "10:30:05");
        assert_eq!(time_of_day("not a time", UtcOffset::UTC), "not a time");
    }
}
