use lazy_static::lazy_static;
use std::{env, io};
use tokio::task::JoinHandle;
use tracing::{info, warn, Level};
use tracing_loki::url::Url;
use tracing_loki::{BackgroundTask, BackgroundTaskController};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter, fmt};

lazy_static! {
    static ref LOKI_URL: Option<String> = env::var("LOKI_URL").ok();
}

/// Keeps the Loki shipper alive; call [`LokiHandle::shutdown`] before exiting
/// so buffered lines are flushed.
pub struct LokiHandle {
    controller: BackgroundTaskController,
    task: JoinHandle<()>,
}

impl LokiHandle {
    pub async fn shutdown(self) {
        self.controller.shutdown().await;

        if let Err(err) = self.task.await {
            warn!("Loki task did not finish cleanly: {}", err);
        }
    }
}

fn build_loki_layer(
    base_url: Url,
) -> Result<
    (
        tracing_loki::Layer,
        BackgroundTaskController,
        BackgroundTask,
    ),
    tracing_loki::Error,
> {
    tracing_loki::builder()
        .label("service", "eventlobby")?
        .build_controller_url(base_url)
}

/// Crate events down to DEBUG, dependencies only from WARN.
fn log_filter() -> filter::Targets {
    filter::Targets::new()
        .with_target("eventlobby", Level::DEBUG)
        .with_default(Level::WARN)
}

/// Logs go to stderr (stdout carries the cards) and, when `LOKI_URL` is set
/// and answers, to Loki as well.
pub async fn setup_tracing() -> Option<LokiHandle> {
    let registry = tracing_subscriber::registry()
        .with(log_filter())
        .with(fmt::layer().with_writer(io::stderr));

    let Some(base_url) = LOKI_URL.as_ref() else {
        registry.init();
        return None;
    };

    let base_url: Url = match base_url.parse() {
        Ok(url) => url,
        Err(err) => {
            registry.init();
            warn!("Invalid Loki URL '{}' ({}). Continuing without it.", base_url, err);
            return None;
        }
    };

    if reqwest::get(base_url.clone()).await.is_err() {
        registry.init();
        warn!("Couldn't connect to Loki. Continuing without it.");
        return None;
    }

    match build_loki_layer(base_url) {
        Ok((layer, controller, task)) => {
            registry.with(layer).init();
            let task = tokio::spawn(task);

            info!("Loki initialized");

            Some(LokiHandle { controller, task })
        }
        Err(err) => {
            registry.init();
            warn!("Failed setting up Loki ({}). Continuing without it.", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn crate_debug_lines_should_pass_the_filter() {
        let filter = log_filter();

        assert!(filter.would_enable("eventlobby::filter::engine", &Level::DEBUG));
        assert!(!filter.would_enable("eventlobby::loader::api", &Level::TRACE));
        assert!(!filter.would_enable("reqwest", &Level::INFO));
        assert!(filter.would_enable("reqwest", &Level::WARN));
    }
}
