use crate::config::model::{Config, DebugConfig};
use crate::loader::api::DEFAULT_SOURCES;
use reqwest::Url;
use std::env;

const SOURCES_SEPARATOR: char = ',';

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid config '{0}'. Expected a comma-separated list of paths or URLs.")]
    EmptySources(&'static str),
    #[error("Invalid config '{0}'. Expected an absolute URL, got '{1}'.")]
    InvalidUrl(&'static str, String),
    #[error("Invalid config '{0}'. Expected a non-negative integer number, got '{1}'.")]
    InvalidNumber(&'static str, String),
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(|name| env::var(name).ok())
}

/// Builds the config from any variable lookup, `load_config` passes the
/// process environment.
pub fn load_config_from<F>(var: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let sources = load_sources_config(&var, "EVENTS_SOURCES")?;
    let base_url = load_url_config(&var, "EVENTS_BASE_URL")?;
    let event_limit = load_usize_config(&var, "DEBUG_EVENT_LIMIT")?;

    Ok(Config {
        sources,
        base_url,
        debug_config: DebugConfig { event_limit },
    })
}

fn load_sources_config<F>(var: &F, name: &'static str) -> Result<Vec<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(DEFAULT_SOURCES.map(str::to_string).to_vec()),
        Some(value) => {
            let sources: Vec<String> = value
                .split(SOURCES_SEPARATOR)
                .map(str::trim)
                .filter(|source| !source.is_empty())
                .map(str::to_string)
                .collect();

            if sources.is_empty() {
                Err(ConfigError::EmptySources(name))
            } else {
                Ok(sources)
            }
        }
    }
}

fn load_url_config<F>(var: &F, name: &'static str) -> Result<Option<Url>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(None),
        Some(value) => {
            // Without a trailing slash `join` would replace the last segment
            let with_slash = if value.ends_with('/') {
                value.clone()
            } else {
                format!("{}/", value)
            };

            Url::parse(&with_slash)
                .map(Some)
                .map_err(|_| ConfigError::InvalidUrl(name, value))
        }
    }
}

fn load_usize_config<F>(var: &F, name: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber(name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        load_config_from(|name| vars.get(name).cloned())
    }

    #[test_log::test]
    fn should_use_defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();

        assert_eq!(config.sources, vec!["out/events.json", "out/manifest.json"]);
        assert_eq!(config.base_url, None);
        assert_eq!(config.debug_config, DebugConfig::default());
    }

    #[test_log::test]
    fn should_read_every_variable() {
        let config = load(&[
            ("EVENTS_SOURCES", " data/a.json, ,https://cdn.example/b.json "),
            ("EVENTS_BASE_URL", "https://events.example/site"),
            ("DEBUG_EVENT_LIMIT", "5"),
        ])
        .unwrap();

        assert_eq!(config.sources, vec!["data/a.json", "https://cdn.example/b.json"]);
        assert_eq!(
            config.base_url.unwrap().as_str(),
            "https://events.example/site/"
        );
        assert_eq!(config.debug_config.event_limit, Some(5));
    }

    #[test_log::test]
    fn should_reject_invalid_values() {
        assert_eq!(
            load(&[("EVENTS_SOURCES", " , ")]),
            Err(ConfigError::EmptySources("EVENTS_SOURCES"))
        );
        assert_eq!(
            load(&[("EVENTS_BASE_URL", "not a url")]),
            Err(ConfigError::InvalidUrl("EVENTS_BASE_URL", "not a url".to_string()))
        );
        assert_eq!(
            load(&[("DEBUG_EVENT_LIMIT", "-1")]),
            Err(ConfigError::InvalidNumber("DEBUG_EVENT_LIMIT", "-1".to_string()))
        );
    }
}
