use serde_json::Number;

pub const DEFAULT_TITLE: &str = "Untitled Event";
pub const DEFAULT_LINK: &str = "#";

/// A single entry of the static event collection.
///
/// Every field is optional; records arrive from an uncontrolled feed and are
/// never modified after loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventRecord {
    pub title: Option<String>,
    pub date: Option<String>,
    pub venue: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
}

impl EventRecord {
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn link_or_default(&self) -> &str {
        match self.link.as_deref() {
            Some(link) if !link.is_empty() => link,
            _ => DEFAULT_LINK,
        }
    }

    pub fn date_text(&self) -> &str {
        self.date.as_deref().unwrap_or_default()
    }

    pub fn venue_text(&self) -> &str {
        self.venue.as_deref().unwrap_or_default()
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Price coerced to text, empty when absent
    pub fn price_text(&self) -> String {
        self.price.as_ref().map(Price::as_text).unwrap_or_default()
    }
}

const BROWSER_EXPONENT_LIMIT: f64 = 1e21;

/// Free-form price, either as the feed wrote it or as a bare number.
#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    Text(String),
    Number(Number),
}

impl Price {
    /// Renders the price the way a browser stringifies it: integral floats
    /// lose their fractional part (`2.0` -> `"2"`) and are written out in
    /// full below 1e21.
    pub fn as_text(&self) -> String {
        match self {
            Price::Text(text) => text.clone(),
            Price::Number(number) => match number.as_f64() {
                Some(value) if number.is_f64() && value == 0.0 => "0".to_string(),
                Some(value) if number.is_f64() && is_plain_integral(value) => value.to_string(),
                _ => number
                    .to_string()
                    .replacen('e', "e+", 1)
                    .replacen("e+-", "e-", 1),
            },
        }
    }
}

fn is_plain_integral(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() < BROWSER_EXPONENT_LIMIT
}

impl From<&str> for Price {
    fn from(value: &str) -> Self {
        Price::Text(value.to_string())
    }
}
