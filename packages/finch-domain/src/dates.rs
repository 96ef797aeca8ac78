//! Permissive parsing for the date strings upstream APIs return.
//!
//! Connectors surface dates exactly as received: RFC 3339 timestamps, plain
//! `YYYY-MM-DD`, and the truncated `YYYY-MM` / `YYYY` forms Google Books
//! uses. Anything unrecognized parses to `None`; the recency boost treats
//! that as "no date", never as an error.

use time::{Date, Month, OffsetDateTime, format_description::well_known::Rfc3339};

pub fn parse_date(raw: &str) -> Option<Date> {
	let raw = raw.trim();

	if raw.is_empty() {
		return None;
	}
	if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(parsed.date());
	}

	// Fall back to the calendar prefix, tolerating a trailing time component
	// without an offset.
	let head = raw.split(['T', ' ']).next()?;
	let mut segments = head.splitn(3, '-');
	let year_raw = segments.next()?;

	if year_raw.len() != 4 {
		return None;
	}

	let year: i32 = year_raw.parse().ok()?;
	let month: u8 = match segments.next() {
		Some(segment) => segment.parse().ok()?,
		None => 1,
	};
	let day: u8 = match segments.next() {
		Some(segment) => segment.parse().ok()?,
		None => 1,
	};

	Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
}

/// Whole days between `raw` and `now`. Future dates yield negative ages.
pub fn age_days(raw: &str, now: OffsetDateTime) -> Option<i64> {
	let date = parse_date(raw)?;

	Some((now.date() - date).whole_days())
}
