use reqwest::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub sources: Vec<String>,
    pub base_url: Option<Url>,
    pub debug_config: DebugConfig,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugConfig {
    /// Caps how many cards get rendered
    pub event_limit: Option<usize>,
}
