use super::quick_range::QuickRange;
use chrono::NaiveDate;
use itertools::Itertools;

const SUMMARY_SEPARATOR: &str = " · ";
const OPEN_BOUND: &str = "…";

/// What the viewer asked to see. The default value is the cleared state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub query: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub venue: String,
    pub free_only: bool,
    pub with_images: bool,
}

impl FilterConfig {
    /// Either bound set switches the date filter from upcoming-only to an
    /// explicit range.
    pub fn has_date_range(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    pub fn with_quick_range(&self, range: QuickRange, today: NaiveDate) -> Self {
        let (date_from, date_to) = range.bounds(today);

        Self {
            date_from,
            date_to,
            ..self.clone()
        }
    }

    /// One-line description of the active filters, e.g.
    /// `“jazz” · Blue Note · Upcoming · Free`.
    pub fn summary(&self) -> String {
        let mut bits = Vec::new();

        if !self.query.is_empty() {
            bits.push(format!("“{}”", self.query));
        }
        if !self.venue.is_empty() {
            bits.push(self.venue.clone());
        }
        if self.has_date_range() {
            bits.push(format!(
                "{} → {}",
                display_bound(self.date_from),
                display_bound(self.date_to)
            ));
        } else {
            bits.push("Upcoming".to_string());
        }
        if self.free_only {
            bits.push("Free".to_string());
        }
        if self.with_images {
            bits.push("Images".to_string());
        }

        bits.iter().join(SUMMARY_SEPARATOR)
    }
}

fn display_bound(bound: Option<NaiveDate>) -> String {
    bound
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| OPEN_BOUND.to_string())
}
