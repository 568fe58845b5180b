use super::model::{EventRecord, Price};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

// Note: every field goes through a lenient deserializer, a wrong JSON type
// must degrade to "absent" instead of failing the whole collection
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventResponse {
    #[serde(deserialize_with = "deserialize_opt_str")]
    pub title: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_str")]
    pub date: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_str")]
    pub venue: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_str")]
    pub link: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_str")]
    pub image: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_str")]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Option<Price>,
}

impl EventResponse {
    pub fn to_model(self) -> EventRecord {
        EventRecord {
            title: self.title,
            date: self.date,
            venue: self.venue,
            link: self.link,
            image: self.image,
            description: self.description,
            price: self.price,
        }
    }
}

/// Converts the elements of a decoded JSON array into records.
///
/// Elements that are not objects become empty records so that one broken
/// entry never hides the others.
pub fn to_models(values: Vec<Value>) -> Vec<EventRecord> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(_) => match serde_json::from_value::<EventResponse>(value) {
                Ok(response) => response.to_model(),
                Err(err) => {
                    warn!("Event #{index} could not be read, keeping it empty. Err: {err}");
                    EventRecord::default()
                }
            },
            other => {
                warn!("Event #{index} is not an object (found {other}), keeping it empty");
                EventRecord::default()
            }
        })
        .collect()
}

fn deserialize_opt_str<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn deserialize_price<'de, D>(d: D) -> Result<Option<Price>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(Price::Text(s)),
        Value::Number(n) => Some(Price::Number(n)),
        _ => None,
    })
}
