use super::format::{display_price, format_event_date};
use crate::events::model::EventRecord;
use chrono::TimeZone;
use reqwest::Url;
use std::fmt::Display;
use voca_rs::chop::prune;
use voca_rs::escape::unescape_html;
use voca_rs::strip::strip_tags;

const DESCRIPTION_LIMIT: usize = 160;
const FALLBACK_BADGE: &str = "event";
const ELLIPSIS: &str = "…";

/// Text rendition of one event, the terminal counterpart of a listing card.
pub struct EventCard<'a> {
    event: &'a EventRecord,
    expanded: bool,
}

impl<'a> EventCard<'a> {
    pub fn new(event: &'a EventRecord) -> Self {
        Self {
            event,
            expanded: false,
        }
    }

    /// Show the whole description instead of a pruned preview.
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Venue when known, otherwise the host the event links to.
    pub fn badge(&self) -> String {
        let venue = self.event.venue_text();

        if !venue.is_empty() {
            return venue.to_string();
        }

        Url::parse(self.event.link_or_default())
            .ok()
            .and_then(|url| url.host_str().map(|host| host.trim_start_matches("www.").to_string()))
            .unwrap_or_else(|| FALLBACK_BADGE.to_string())
    }

    pub fn description(&self) -> String {
        let description = unescape_html(&strip_tags(self.event.description_text()));
        let description = description.trim();

        if self.expanded || description.chars().count() <= DESCRIPTION_LIMIT {
            description.to_string()
        } else {
            prune(description, DESCRIPTION_LIMIT, ELLIPSIS)
        }
    }

    pub fn render<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut chips = Vec::new();

        let date = self.event.date_text();
        if !date.is_empty() {
            chips.push(format!("📅 {}", format_event_date(date, tz)));
        }
        let venue = self.event.venue_text();
        if !venue.is_empty() {
            chips.push(format!("📍 {}", venue));
        }
        let price = display_price(self.event.price.as_ref());
        if !price.is_empty() {
            chips.push(format!("💰 {}", price));
        }

        let mut lines = vec![format!("[{}] {}", self.badge(), self.event.title_or_default())];

        if !chips.is_empty() {
            lines.push(format!("  {}", chips.join("   ")));
        }

        let image = self.event.image.as_deref().map(str::trim).unwrap_or_default();
        if !image.is_empty() {
            lines.push(format!("  🖼 {}", image));
        }

        let description = self.description();
        if !description.is_empty() {
            lines.push(format!("  {}", description));
        }

        lines.push(format!("  Open Event: {}", self.event.link_or_default()));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::model::Price;
    use chrono::Utc;

    fn jazz_night() -> EventRecord {
        EventRecord {
            title: Some("Late Night Jazz".to_string()),
            date: Some("2024-06-12".to_string()),
            venue: Some("Blue Note".to_string()),
            link: Some("https://www.bluenote.example/jazz".to_string()),
            image: None,
            description: Some("A <em>trio</em> plays standards &amp; originals.".to_string()),
            price: Some(Price::from("$0")),
        }
    }

    #[test_log::test]
    fn should_render_every_part() {
        let card = EventCard::new(&jazz_night()).render(&Utc);

        assert_eq!(
            card,
            "[Blue Note] Late Night Jazz\n\
             \x20 📅 Jun 12, 2024   📍 Blue Note   💰 Free\n\
             \x20 A trio plays standards & originals.\n\
             \x20 Open Event: https://www.bluenote.example/jazz"
        );
    }

    #[test_log::test]
    fn should_show_the_image_under_the_chips() {
        let event = EventRecord {
            image: Some(" https://cdn.example/jazz.jpg ".to_string()),
            ..jazz_night()
        };
        let blank = EventRecord {
            image: Some("   ".to_string()),
            ..jazz_night()
        };

        assert_eq!(
            EventCard::new(&event).render(&Utc),
            "[Blue Note] Late Night Jazz\n\
             \x20 📅 Jun 12, 2024   📍 Blue Note   💰 Free\n\
             \x20 🖼 https://cdn.example/jazz.jpg\n\
             \x20 A trio plays standards & originals.\n\
             \x20 Open Event: https://www.bluenote.example/jazz"
        );
        assert!(!EventCard::new(&blank).render(&Utc).contains('🖼'));
    }

    #[test_log::test]
    fn empty_record_should_use_defaults() {
        let event = EventRecord::default();

        let card = EventCard::new(&event).render(&Utc);

        assert_eq!(card, "[event] Untitled Event\n  Open Event: #");
    }

    #[test_log::test]
    fn badge_should_fall_back_to_link_host() {
        let event = EventRecord {
            link: Some("https://www.tickets.example/e/1".to_string()),
            ..Default::default()
        };

        assert_eq!(EventCard::new(&event).badge(), "tickets.example");
    }

    #[test_log::test]
    fn long_descriptions_should_be_pruned_unless_expanded() {
        let event = EventRecord {
            description: Some("word ".repeat(100)),
            ..Default::default()
        };

        let preview = EventCard::new(&event).description();
        let full = EventCard::new(&event).expanded(true).description();

        assert!(preview.ends_with(ELLIPSIS), "{preview}");
        assert!(preview.chars().count() < full.chars().count());
        assert_eq!(full, "word ".repeat(100).trim());
    }
}
