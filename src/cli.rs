use crate::filter::config::FilterConfig;
use crate::filter::quick_range::QuickRange;
use chrono::NaiveDate;
use clap::Parser;
use std::str::FromStr;

/// Browse a static event collection from the terminal.
///
/// Without any date option only upcoming events (and undated ones) are shown.
#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "eventlobby", version, about)]
pub struct Args {
    /// Search title, description and venue
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Only events at exactly this venue (see --venues)
    #[arg(long, default_value = "")]
    pub venue: String,

    /// First day to include (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Date preset: anytime, today, weekend or next7days
    #[arg(long, value_parser = parse_quick_range, conflicts_with_all = ["from", "to"])]
    pub range: Option<QuickRange>,

    /// Only free events
    #[arg(long)]
    pub free_only: bool,

    /// Only events with an image
    #[arg(long)]
    pub with_images: bool,

    /// Print full descriptions
    #[arg(long)]
    pub expanded: bool,

    /// List the known venues and exit
    #[arg(long)]
    pub venues: bool,

    /// Render at most this many cards
    #[arg(long)]
    pub limit: Option<usize>,
}

impl Args {
    pub fn filter_config(&self, today: NaiveDate) -> FilterConfig {
        let config = FilterConfig {
            query: self.query.clone(),
            date_from: self.from,
            date_to: self.to,
            venue: self.venue.clone(),
            free_only: self.free_only,
            with_images: self.with_images,
        };

        match self.range {
            Some(range) => config.with_quick_range(range, today),
            None => config,
        }
    }
}

fn parse_quick_range(value: &str) -> Result<QuickRange, String> {
    QuickRange::from_str(value).map_err(|_| {
        format!(
            "unknown range '{}', expected anytime, today, weekend or next7days",
            value
        )
    })
}
