//! Due-date normalization between user-facing edit text and the canonical
//! store representation.
//!
//! Users type `YYYY-MM-DD-HH:MM` or `YYYY-MM-DD`; the store carries RFC 3339
//! strings anchored to a fixed UTC+9 offset at minute precision.

use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::{format_description, offset};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Fixed offset every canonical timestamp is anchored to.
pub const STORE_OFFSET: UtcOffset = offset!(+9);

const EDIT_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]-[hour]:[minute]");
const DATE_ONLY_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Failure while normalizing user-entered due-date text.
#[derive(Debug, Error)]
pub enum DueDateError {
    /// Input matched neither accepted shape.
    #[error("invalid due date '{0}', expected YYYY-MM-DD-HH:MM or YYYY-MM-DD")]
    InvalidFormat(String),
    /// Canonical rendering failed.
    #[error("failed to render due date: {0}")]
    Render(#[from] time::error::Format),
}

/// Parse user-entered due text into a UTC+9 anchored instant.
///
/// Accepts exactly `YYYY-MM-DD-HH:MM` and `YYYY-MM-DD` (implying 00:00);
/// seconds and sub-seconds are always zero.
///
/// # Errors
/// Returns [`DueDateError::InvalidFormat`] for any other shape.
pub fn parse(input: &str) -> Result<OffsetDateTime, DueDateError> {
    if let Ok(dt) = PrimitiveDateTime::parse(input, EDIT_FORMAT) {
        return Ok(dt.assume_offset(STORE_OFFSET));
    }
    if let Ok(date) = Date::parse(input, DATE_ONLY_FORMAT) {
        return Ok(date.midnight().assume_offset(STORE_OFFSET));
    }
    Err(DueDateError::InvalidFormat(input.to_owned()))
}

/// True iff `input` matches one of the two accepted shapes.
#[must_use]
pub fn is_valid(input: &str) -> bool {
    parse(input).is_ok()
}

/// Normalize user-entered due text into the canonical RFC 3339 string.
///
/// # Errors
/// Returns [`DueDateError`] when the text fails to parse.
pub fn to_canonical(input: &str) -> Result<String, DueDateError> {
    Ok(parse(input)?.format(&Rfc3339)?)
}

/// Render a canonical timestamp back into the `YYYY-MM-DD-HH:MM` edit shape
/// in UTC+9. Unparseable input is returned unchanged.
#[must_use]
pub fn display(canonical: &str) -> String {
    OffsetDateTime::parse(canonical, &Rfc3339)
        .ok()
        .and_then(|dt| dt.to_offset(STORE_OFFSET).format(EDIT_FORMAT).ok())
        .unwrap_or_else(|| canonical.to_owned())
}

/// Human-readable remaining/overdue text for an optional canonical due date,
/// measured against the current time in UTC+9.
#[must_use]
pub fn time_left(due: Option<&str>) -> String {
    match due {
        None => "No deadline".to_owned(),
        Some(canonical) if canonical.is_empty() => "No deadline".to_owned(),
        Some(canonical) => time_left_at(canonical, OffsetDateTime::now_utc().to_offset(STORE_OFFSET)),
    }
}

fn time_left_at(canonical: &str, now: OffsetDateTime) -> String {
    let Ok(due) = OffsetDateTime::parse(canonical, &Rfc3339) else {
        return "Invalid date".to_owned();
    };
    let remaining = due.to_offset(STORE_OFFSET) - now;

    if remaining < Duration::ZERO {
        let overdue = -remaining;
        let days = overdue.whole_days();
        if days >= 1 {
            format!("Overdue by {days}d")
        } else {
            format!("Overdue by {}h", overdue.whole_hours())
        }
    } else if remaining <= Duration::hours(24) {
        format!("{}h remaining", remaining.whole_hours())
    } else {
        let days = remaining.whole_days();
        if days < 30 {
            format!("{days}d remaining")
        } else {
            format!("{}m remaining", days / 30)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_full_shape_anchored_to_store_offset() {
        let parsed = parse("2025-03-02-18:30").expect("must parse full shape");
        assert_eq!(parsed, datetime!(2025-03-02 18:30 +9));
        assert_eq!(parsed.second(), 0);
    }

    #[test]
    fn date_only_implies_midnight() {
        let parsed = parse("2025-03-02").expect("must parse date-only shape");
        assert_eq!(parsed, datetime!(2025-03-02 00:00 +9));
    }

    #[test]
    fn canonical_roundtrips_through_display() {
        let canonical = to_canonical("2025-03-02-18:30").expect("must normalize");
        assert_eq!(canonical, "2025-03-02T18:30:00+09:00");
        assert_eq!(display(&canonical), "2025-03-02-18:30");

        let date_only = to_canonical("2025-03-02").expect("must normalize date-only");
        assert_eq!(date_only, "2025-03-02T00:00:00+09:00");
        assert_eq!(display(&date_only), "2025-03-02-00:00");
    }

    #[test]
    fn rejects_every_other_shape() {
        for input in [
            "2025/03/02",
            "02-03-2025",
            "2025-13-01",
            "2025-03-32",
            "2025-03-02-25:00",
            "2025-03-02 18:30",
            "2025-03-02T18:30",
            "tomorrow",
            "",
        ] {
            assert!(!is_valid(input), "expected rejection for {input:?}");
        }
    }

    #[test]
    fn display_returns_unparseable_input_unchanged() {
        assert_eq!(display("not-a-date"), "not-a-date");
        assert_eq!(display(""), "");
    }

    #[test]
    fn display_converts_utc_input_into_store_offset() {
        assert_eq!(display("2025-03-02T00:00:00Z"), "2025-03-02-09:00");
    }

    #[test]
    fn time_left_handles_absent_and_invalid_dates() {
        assert_eq!(time_left(None), "No deadline");
        assert_eq!(time_left(Some("")), "No deadline");
        assert_eq!(time_left(Some("garbage")), "Invalid date");
    }

    #[test]
    fn upcoming_deadlines_use_hour_day_month_tiers() {
        let now = datetime!(2025-06-01 00:00 +9);
        assert_eq!(time_left_at("2025-06-01T12:00:00+09:00", now), "12h remaining");
        assert_eq!(time_left_at("2025-06-02T00:00:00+09:00", now), "24h remaining");
        assert_eq!(time_left_at("2025-06-02T01:00:00+09:00", now), "1d remaining");
        assert_eq!(time_left_at("2025-06-30T00:00:00+09:00", now), "29d remaining");
        assert_eq!(time_left_at("2025-08-05T00:00:00+09:00", now), "2m remaining");
    }

    #[test]
    fn overdue_deadlines_report_hours_then_days() {
        let now = datetime!(2025-06-01 12:00 +9);
        assert_eq!(time_left_at("2025-06-01T10:00:00+09:00", now), "Overdue by 2h");
        assert_eq!(time_left_at("2025-05-31T06:00:00+09:00", now), "Overdue by 1d");
        assert_eq!(time_left_at("2025-05-20T12:00:00+09:00", now), "Overdue by 12d");
    }

    #[test]
    fn exact_due_time_counts_as_upcoming() {
        let now = datetime!(2025-06-01 12:00 +9);
        assert_eq!(time_left_at("2025-06-01T12:00:00+09:00", now), "0h remaining");
    }
}
