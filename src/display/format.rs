use crate::events::date::{has_time_part, parse_event_date, EventDate};
use crate::events::model::Price;
use chrono::TimeZone;
use std::fmt::Display;

const DATE_FORMAT: &str = "%b %-d, %Y";
const DATE_TIME_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";
const FREE_LABEL: &str = "Free";

/// Short human date, e.g. `Jun 1, 2024` or `Jun 1, 2024, 7:30 PM` when the
/// text carries a time of day. Text that is not a date is shown as-is.
pub fn format_event_date<Tz>(value: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match parse_event_date(value, tz) {
        EventDate::Dated(instant) => {
            let format = if has_time_part(value) {
                DATE_TIME_FORMAT
            } else {
                DATE_FORMAT
            };

            instant.with_timezone(tz).format(format).to_string()
        }
        EventDate::Undated => value.to_string(),
    }
}

/// Price label for a card. Zero-like and "free" prices read "Free", other
/// values are shown trimmed, a missing price is empty.
pub fn display_price(price: Option<&Price>) -> String {
    let Some(price) = price else {
        return String::new();
    };

    if let Price::Number(number) = price {
        if number.as_f64() == Some(0.0) {
            return FREE_LABEL.to_string();
        }
    }

    let text = price.as_text();
    let clean = text.trim();

    if clean == "$0" || clean == "$0–$0" || clean.to_lowercase().contains("free") {
        FREE_LABEL.to_string()
    } else {
        clean.to_string()
    }
}
