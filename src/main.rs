use clap::Parser;
use eventlobby::cli::Args;
use eventlobby::config::env_loader::load_config;
use eventlobby::display::card::EventCard;
use eventlobby::filter::engine::{EventListing, FilterEngine};
use eventlobby::loader::api::EventLoader;
use eventlobby::tracing::setup_tracing;
use std::process::ExitCode;
use tracing::{error, info};

const NO_MATCHES: &str = "No events match your filters.";

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let loki = setup_tracing().await;

    let exit_code = run(&args).await;

    if let Some(loki) = loki {
        loki.shutdown().await;
    }

    exit_code
}

async fn run(args: &Args) -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let loaded = EventLoader::new(config.sources, config.base_url)
        .load()
        .await;
    let engine = FilterEngine::local();
    let listing = EventListing::new(engine, loaded.events);

    if args.venues {
        listing.venues().iter().for_each(|venue| println!("{}", venue));
        return ExitCode::SUCCESS;
    }

    let filter = args.filter_config(listing.engine().today());
    let shown = listing.visible(&filter);

    info!("Showing {} of {} events", shown.len(), listing.len());

    println!("{}", filter.summary());
    println!();

    if shown.is_empty() {
        println!("{}", loaded.error.as_deref().unwrap_or(NO_MATCHES));
        return ExitCode::SUCCESS;
    }

    let limit = args
        .limit
        .or(config.debug_config.event_limit)
        .unwrap_or(shown.len());

    for event in shown.iter().take(limit) {
        let card = EventCard::new(event).expanded(args.expanded);

        println!("{}\n", card.render(listing.engine().timezone()));
    }

    ExitCode::SUCCESS
}
