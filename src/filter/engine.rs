use super::config::FilterConfig;
use super::rules::{has_image, looks_free, matches_query, matches_venue, DateWindow};
use super::venues::unique_venues;
use crate::events::date::{local_midnight, parse_event_date, EventDate};
use crate::events::model::EventRecord;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::debug;

/// Turns raw records plus a [`FilterConfig`] into the records to display.
///
/// The engine only holds the viewer's timezone and the calendar day it
/// considers "today"; every call works on fresh inputs and borrows them.
#[derive(Debug, Clone)]
pub struct FilterEngine<Tz: TimeZone> {
    tz: Tz,
    today: NaiveDate,
}

impl FilterEngine<Local> {
    pub fn local() -> Self {
        Self::new(Local, Local::now().date_naive())
    }
}

impl<Tz: TimeZone> FilterEngine<Tz> {
    pub fn new(tz: Tz, today: NaiveDate) -> Self {
        Self { tz, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn parse_date(&self, value: &str) -> EventDate {
        parse_event_date(value, &self.tz)
    }

    /// Stable ascending sort by parsed date, undated events last.
    pub fn sort_by_date<'a, I>(&self, events: I) -> Vec<&'a EventRecord>
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        self.dated(events).into_iter().map(|(_, event)| event).collect()
    }

    /// Keeps the events passing every rule of `config`, in input order.
    pub fn apply_filters<'a, I>(&self, events: I, config: &FilterConfig) -> Vec<&'a EventRecord>
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        let criteria = self.criteria(config);
        let mut total = 0;

        let shown: Vec<&EventRecord> = events
            .into_iter()
            .inspect(|_| total += 1)
            .filter(|event| criteria.admits(event, self.parse_date(event.date_text())))
            .collect();

        debug!("{} of {} events match '{}'", shown.len(), total, config.summary());

        shown
    }

    pub fn matches(&self, event: &EventRecord, config: &FilterConfig) -> bool {
        self.criteria(config)
            .admits(event, self.parse_date(event.date_text()))
    }

    /// Sort then filter, the full pipeline for one configuration.
    pub fn visible_events<'a>(
        &self,
        events: &'a [EventRecord],
        config: &FilterConfig,
    ) -> Vec<&'a EventRecord> {
        self.apply_filters(self.sort_by_date(events), config)
    }

    /// Upcoming-only when no bound is set, otherwise the inclusive range
    /// from the start of `date_from` to the last millisecond of `date_to`.
    pub fn date_window(&self, config: &FilterConfig) -> DateWindow {
        if !config.has_date_range() {
            return DateWindow::Upcoming {
                today_start: self.midnight(self.today),
            };
        }

        DateWindow::Range {
            from: config.date_from.map(|date| self.midnight(date)),
            until: config.date_to.map(|date| self.end_of_day(date)),
        }
    }

    // Past the last representable instant the range simply has no end
    fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.midnight(date)
            .checked_add_signed(Duration::days(1))
            .and_then(|next| next.checked_sub_signed(Duration::milliseconds(1)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn midnight(&self, date: NaiveDate) -> DateTime<Utc> {
        local_midnight(date, &self.tz).unwrap_or_else(|| date.and_time(NaiveTime::MIN).and_utc())
    }

    fn dated<'a, I>(&self, events: I) -> Vec<(EventDate, &'a EventRecord)>
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        let mut dated: Vec<(EventDate, &EventRecord)> = events
            .into_iter()
            .map(|event| (self.parse_date(event.date_text()), event))
            .collect();

        dated.sort_by_key(|(date, _)| *date);
        dated
    }

    fn criteria<'c>(&self, config: &'c FilterConfig) -> Criteria<'c> {
        Criteria {
            query: config.query.trim().to_lowercase(),
            venue: &config.venue,
            window: self.date_window(config),
            free_only: config.free_only,
            with_images: config.with_images,
        }
    }
}

/// A [`FilterConfig`] with the query folded and the date bounds resolved,
/// so the per-event check does no parsing of its own.
struct Criteria<'c> {
    query: String,
    venue: &'c str,
    window: DateWindow,
    free_only: bool,
    with_images: bool,
}

impl Criteria<'_> {
    fn admits(&self, event: &EventRecord, date: EventDate) -> bool {
        matches_query(event, &self.query)
            && matches_venue(event, self.venue)
            && self.window.admits(date)
            && (!self.free_only || looks_free(&event.price_text()))
            && (!self.with_images || has_image(event))
    }
}

/// A loaded collection kept sorted, with dates parsed once and the venue list
/// ready, so a filter change only re-runs the rules.
#[derive(Debug)]
pub struct EventListing<Tz: TimeZone> {
    engine: FilterEngine<Tz>,
    sorted: Vec<(EventDate, EventRecord)>,
    venues: Vec<String>,
}

impl<Tz: TimeZone> EventListing<Tz> {
    pub fn new(engine: FilterEngine<Tz>, events: Vec<EventRecord>) -> Self {
        let venues = unique_venues(&events);
        let mut sorted: Vec<(EventDate, EventRecord)> = events
            .into_iter()
            .map(|event| (engine.parse_date(event.date_text()), event))
            .collect();

        sorted.sort_by_key(|(date, _)| *date);

        debug!(
            "Listing {} events ({} dated) across {} venues",
            sorted.len(),
            sorted.iter().filter(|(date, _)| date.is_dated()).count(),
            venues.len()
        );

        Self {
            engine,
            sorted,
            venues,
        }
    }

    pub fn engine(&self) -> &FilterEngine<Tz> {
        &self.engine
    }

    pub fn venues(&self) -> &[String] {
        &self.venues
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// All events, date order.
    pub fn sorted(&self) -> impl Iterator<Item = &EventRecord> {
        self.sorted.iter().map(|(_, event)| event)
    }

    pub fn visible(&self, config: &FilterConfig) -> Vec<&EventRecord> {
        let criteria = self.engine.criteria(config);

        self.sorted
            .iter()
            .filter(|(date, event)| criteria.admits(event, *date))
            .map(|(_, event)| event)
            .collect()
    }
}
