use crate::events::date::EventDate;
use crate::events::model::EventRecord;
use chrono::{DateTime, Utc};

const FREE_WORD: &str = "free";

/// Case-insensitive search over title, description and venue.
///
/// `query` must already be trimmed and lowercased. The fields are joined with
/// a space, so a query may span the end of one field and the start of the
/// next.
pub fn matches_query(record: &EventRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let haystack = format!(
        "{} {} {}",
        record.title.as_deref().unwrap_or_default(),
        record.description_text(),
        record.venue_text()
    )
    .to_lowercase();

    haystack.contains(query)
}

/// Exact, case-sensitive venue match. An empty filter accepts everything.
pub fn matches_venue(record: &EventRecord, venue: &str) -> bool {
    venue.is_empty() || record.venue.as_deref() == Some(venue)
}

/// Which events a date filter lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// No bounds chosen: hide dated events that started before today.
    /// Undated events always pass.
    Upcoming { today_start: DateTime<Utc> },
    /// At least one bound chosen: only dated events inside the inclusive
    /// range pass. A missing bound is open.
    Range {
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    },
}

impl DateWindow {
    pub fn admits(&self, date: EventDate) -> bool {
        match self {
            DateWindow::Upcoming { today_start } => match date {
                EventDate::Dated(instant) => instant >= *today_start,
                EventDate::Undated => true,
            },
            DateWindow::Range { from, until } => match date {
                EventDate::Dated(instant) => {
                    from.map_or(true, |from| instant >= from)
                        && until.map_or(true, |until| instant <= until)
                }
                EventDate::Undated => false,
            },
        }
    }
}

/// Heuristic for the free-form price field: blank, `0`, `$0`, or the word
/// "free" on its own.
pub fn looks_free(price: &str) -> bool {
    let price = price.trim().to_lowercase();

    price.is_empty() || price == "0" || price == "$0" || contains_word(&price, FREE_WORD)
}

pub fn has_image(record: &EventRecord) -> bool {
    record
        .image
        .as_deref()
        .is_some_and(|image| !image.trim().is_empty())
}

// ASCII word boundaries, "free-for-all" matches but "carefree" does not
fn contains_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();

        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn event_at(venue: &str) -> EventRecord {
        EventRecord {
            title: Some("Evening Set".to_string()),
            description: Some("Standards and originals".to_string()),
            venue: Some(venue.to_string()),
            ..Default::default()
        }
    }

    #[test_log::test]
    fn query_should_match_venue_case_insensitively() {
        let record = event_at("Village Jazz Cellar");

        assert!(matches_query(&record, "jazz"));
        assert!(!matches_query(&record, "blues"));
    }

    #[test_log::test]
    fn empty_query_should_match_empty_record() {
        assert!(matches_query(&EventRecord::default(), ""));
    }

    #[test_log::test]
    fn venue_filter_should_be_exact() {
        let record = event_at("Blue Note");

        assert!(matches_venue(&record, ""));
        assert!(matches_venue(&record, "Blue Note"));
        assert!(!matches_venue(&record, "blue note"));
        assert!(!matches_venue(&EventRecord::default(), "Blue Note"));
    }

    #[test_log::test]
    fn upcoming_window_should_let_undated_through() {
        let window = DateWindow::Upcoming {
            today_start: at(2024, 6, 10, 0, 0),
        };

        assert!(window.admits(EventDate::Undated));
        assert!(window.admits(EventDate::Dated(at(2024, 6, 10, 0, 0))));
        assert!(!window.admits(EventDate::Dated(at(2024, 6, 9, 23, 59))));
    }

    #[test_log::test]
    fn range_window_should_reject_undated() {
        let window = DateWindow::Range {
            from: None,
            until: None,
        };

        assert!(!window.admits(EventDate::Undated));
        assert!(window.admits(EventDate::Dated(at(1999, 1, 1, 0, 0))));
    }

    #[test_log::test]
    fn range_window_should_be_inclusive() {
        let window = DateWindow::Range {
            from: Some(at(2024, 6, 1, 0, 0)),
            until: Some(at(2024, 6, 3, 12, 0)),
        };

        assert!(window.admits(EventDate::Dated(at(2024, 6, 1, 0, 0))));
        assert!(window.admits(EventDate::Dated(at(2024, 6, 3, 12, 0))));
        assert!(!window.admits(EventDate::Dated(at(2024, 5, 31, 23, 59))));
        assert!(!window.admits(EventDate::Dated(at(2024, 6, 3, 12, 1))));
    }

    #[test_log::test]
    fn should_recognise_free_prices() {
        for price in ["", "   ", "$0", "0", "Free admission", "FREE", "Free-for-all", "entry: free!"] {
            assert!(looks_free(price), "{price:?} should look free");
        }
    }

    #[test_log::test]
    fn should_reject_paid_prices() {
        for price in ["$0.50", "$15", "Buffet", "carefree", "freebies", "10 EUR"] {
            assert!(!looks_free(price), "{price:?} should not look free");
        }
    }

    #[test_log::test]
    fn whitespace_image_should_not_count() {
        let mut record = EventRecord::default();
        assert!(!has_image(&record));

        record.image = Some("  ".to_string());
        assert!(!has_image(&record));

        record.image = Some("http://x/y.png".to_string());
        assert!(has_image(&record));
    }
}
