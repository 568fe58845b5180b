use crate::events::dto::to_models;
use crate::events::model::EventRecord;
use itertools::Itertools;
use lazy_static::lazy_static;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, StatusCode, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use tracing::{error, info, warn};

pub const DEFAULT_SOURCES: [&str; 2] = ["out/events.json", "out/manifest.json"];
const MAX_RETRIES: u32 = 3;

lazy_static! {
    static ref REST_CLIENT: ClientWithMiddleware = ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(
            ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES)
        ))
        .build();
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid source '{0}'")]
    InvalidSource(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("server answered {0}")]
    Status(StatusCode),
    #[error("response could not be read: {0}")]
    Body(#[from] reqwest::Error),
    #[error("file could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array, found {0}")]
    NotAnArray(&'static str),
}

/// Where one candidate collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    Remote(Url),
    File(PathBuf),
}

impl EventSource {
    /// Absolute URLs are fetched as-is, other candidates are resolved against
    /// `base_url` when there is one and read from disk otherwise.
    pub fn resolve(candidate: &str, base_url: Option<&Url>) -> Result<Self, SourceError> {
        let invalid = |_| SourceError::InvalidSource(candidate.to_string());

        if candidate.starts_with("http://") || candidate.starts_with("https://") {
            return Url::parse(candidate).map(EventSource::Remote).map_err(invalid);
        }

        match base_url {
            Some(base_url) => base_url
                .join(candidate)
                .map(EventSource::Remote)
                .map_err(invalid),
            None => Ok(EventSource::File(PathBuf::from(candidate))),
        }
    }
}

impl Display for EventSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EventSource::Remote(url) => write!(f, "{}", url),
            EventSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Outcome of a load: either the records of the first working source, or
/// no records and a message for the viewer.
#[derive(Debug, Default)]
pub struct LoadedEvents {
    pub events: Vec<EventRecord>,
    pub source: Option<String>,
    pub error: Option<String>,
}

pub struct EventLoader {
    candidates: Vec<String>,
    base_url: Option<Url>,
}

impl EventLoader {
    pub fn new(candidates: Vec<String>, base_url: Option<Url>) -> Self {
        Self {
            candidates,
            base_url,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /**
    Tries every candidate in order and keeps the first one that yields a
    JSON array. Never fails: when nothing works the result carries an
    empty list and the message to show instead.
    */
    #[tracing::instrument(skip(self), fields(candidates = %self.candidates.join(",")))]
    pub async fn load(&self) -> LoadedEvents {
        for candidate in &self.candidates {
            match self.load_candidate(candidate).await {
                Ok(events) => {
                    info!("Loaded {} events from '{}'", events.len(), candidate);

                    return LoadedEvents {
                        events,
                        source: Some(candidate.to_string()),
                        error: None,
                    };
                }
                Err(err) => {
                    warn!("Skipping '{}': {}", candidate, err);
                }
            }
        }

        let message = missing_sources_message(&self.candidates);
        error!("{}", message);

        LoadedEvents {
            error: Some(message),
            ..Default::default()
        }
    }

    pub async fn load_candidate(&self, candidate: &str) -> Result<Vec<EventRecord>, SourceError> {
        let body = match EventSource::resolve(candidate, self.base_url.as_ref())? {
            EventSource::Remote(url) => fetch(url).await?,
            EventSource::File(path) => tokio::fs::read_to_string(path).await?,
        };

        parse_events(&body)
    }
}

impl Default for EventLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCES.map(str::to_string).to_vec(), None)
    }
}

async fn fetch(url: Url) -> Result<String, SourceError> {
    let response = REST_CLIENT
        .get(url)
        .header(CACHE_CONTROL, "no-store")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(SourceError::Status(response.status()));
    }

    Ok(response.text().await?)
}

/// Decodes a collection body. Anything but a top-level array is rejected;
/// inside the array each element is decoded on its own.
pub fn parse_events(body: &str) -> Result<Vec<EventRecord>, SourceError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(values) => Ok(to_models(values)),
        Value::Object(_) => Err(SourceError::NotAnArray("an object")),
        Value::String(_) => Err(SourceError::NotAnArray("a string")),
        Value::Number(_) => Err(SourceError::NotAnArray("a number")),
        Value::Bool(_) => Err(SourceError::NotAnArray("a boolean")),
        Value::Null => Err(SourceError::NotAnArray("null")),
    }
}

fn missing_sources_message(candidates: &[String]) -> String {
    if candidates.is_empty() {
        return "No event sources configured.".to_string();
    }

    format!("No {} found.", candidates.iter().join(" or "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_resolve_sources() {
        let base = Url::parse("https://events.example/site/").unwrap();

        assert_eq!(
            EventSource::resolve("out/events.json", None).unwrap(),
            EventSource::File(PathBuf::from("out/events.json"))
        );
        assert_eq!(
            EventSource::resolve("out/events.json", Some(&base)).unwrap(),
            EventSource::Remote(Url::parse("https://events.example/site/out/events.json").unwrap())
        );
        assert_eq!(
            EventSource::resolve("/out/events.json", Some(&base)).unwrap(),
            EventSource::Remote(Url::parse("https://events.example/out/events.json").unwrap())
        );
        assert_eq!(
            EventSource::resolve("http://cdn.example/all.json", Some(&base)).unwrap(),
            EventSource::Remote(Url::parse("http://cdn.example/all.json").unwrap())
        );
    }

    #[test_log::test]
    fn should_reject_broken_urls() {
        let result = EventSource::resolve("https://", None);

        assert!(matches!(result, Err(SourceError::InvalidSource(_))), "{:?}", result);
    }

    #[test_log::test]
    fn should_only_accept_arrays() {
        assert_eq!(parse_events(r#"[{"title": "A"}, {}]"#).unwrap().len(), 2);
        assert!(matches!(
            parse_events(r#"{"events": []}"#),
            Err(SourceError::NotAnArray("an object"))
        ));
        assert!(matches!(parse_events("not json"), Err(SourceError::Json(_))));
    }

    #[test_log::test]
    fn message_should_name_every_candidate() {
        let candidates = DEFAULT_SOURCES.map(str::to_string).to_vec();

        assert_eq!(
            missing_sources_message(&candidates),
            "No out/events.json or out/manifest.json found."
        );
        assert_eq!(missing_sources_message(&[]), "No event sources configured.");
    }
}
