use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CALENDAR_DATE: Regex =
        Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("Failed to create date regex");
    static ref TIME_PART: Regex =
        Regex::new(r"T[0-9]{2}:[0-9]{2}").expect("Failed to create time regex");
}

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const LOCAL_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const LOCAL_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%A, %B %d, %Y",
];

/// Parsed form of an event's `date` text.
///
/// `Undated` orders after every `Dated` value, so sorting by `EventDate`
/// pushes undated events to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventDate {
    Dated(DateTime<Utc>),
    Undated,
}

impl EventDate {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            EventDate::Dated(instant) => Some(*instant),
            EventDate::Undated => None,
        }
    }

    pub fn is_dated(&self) -> bool {
        matches!(self, EventDate::Dated(_))
    }
}

impl From<Option<DateTime<Utc>>> for EventDate {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(EventDate::Undated, EventDate::Dated)
    }
}

/// Parses an event date in the given timezone. Never fails.
///
/// A bare `YYYY-MM-DD` is midnight in `tz`, not UTC midnight, so the
/// calendar day does not shift for viewers west of UTC. Anything else goes
/// through [`parse_permissive`].
pub fn parse_event_date<Tz: TimeZone>(value: &str, tz: &Tz) -> EventDate {
    if value.is_empty() {
        return EventDate::Undated;
    }

    if let Some(captures) = CALENDAR_DATE.captures(value) {
        let date = NaiveDate::from_ymd_opt(
            captures[1].parse().unwrap_or_default(),
            captures[2].parse().unwrap_or_default(),
            captures[3].parse().unwrap_or_default(),
        );

        return date.and_then(|date| local_midnight(date, tz)).into();
    }

    parse_permissive(value, tz).into()
}

/// Start of `date` in `tz`, as a UTC instant.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    local_to_utc(date.and_time(chrono::NaiveTime::MIN), tz)
}

/// Resolves a wall-clock time in `tz`. Ambiguous times take the earliest
/// instant and times inside a DST gap are pushed forward by an hour.
pub fn local_to_utc<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    let resolved = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => naive
            .checked_add_signed(Duration::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest()),
    };

    resolved.map(|dt| dt.with_timezone(&Utc))
}

/// Best-effort parsing of timestamps and common date spellings.
///
/// Values carrying an offset keep it; values without one are wall-clock
/// times in `tz`.
pub fn parse_permissive<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let with_offset = match value.strip_suffix(&['Z', 'z'][..]) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => value.to_string(),
    };

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in LOCAL_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return local_to_utc(naive, tz);
        }
    }

    for format in LOCAL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return local_midnight(date, tz);
        }
    }

    None
}

/// Whether the text carries a `THH:MM` time of day.
pub fn has_time_part(value: &str) -> bool {
    TIME_PART.is_match(value)
}
