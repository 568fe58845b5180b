use chrono::{Datelike, Duration, NaiveDate};

/// Date presets offered next to the explicit from/to pickers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::IntoStaticStr, strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum QuickRange {
    #[strum(serialize = "anytime")]
    Anytime,
    #[strum(serialize = "today")]
    Today,
    #[strum(serialize = "weekend")]
    Weekend,
    #[strum(to_string = "next7days", serialize = "next-7-days")]
    Next7Days,
}

impl QuickRange {
    /// Date bounds relative to the viewer's local `today`.
    /// `Anytime` clears both bounds, which brings back the upcoming-only view.
    pub fn bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self {
            QuickRange::Anytime => (None, None),
            QuickRange::Today => (Some(today), Some(today)),
            QuickRange::Weekend => {
                let days_until_saturday = (6 - today.weekday().num_days_from_sunday()) % 7;
                let saturday = today + Duration::days(days_until_saturday as i64);

                (Some(saturday), Some(saturday + Duration::days(1)))
            }
            QuickRange::Next7Days => (Some(today), Some(today + Duration::days(6))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickRange::Anytime => "Anytime",
            QuickRange::Today => "Today",
            QuickRange::Weekend => "Weekend",
            QuickRange::Next7Days => "Next 7 days",
        }
    }
}
