//! Boot — logging init and pipeline construction.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::RunConfig;
use crate::pipeline::Pipeline;
use crate::ua::Classifier;

/// Initialise the tracing / logging subsystem. Diagnostics go to stderr so
/// stdout stays clean for the JSON output.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logsift=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the pipeline for this run. The user-agent engine is chosen here,
/// once, and never re-evaluated per line.
pub fn boot(config: &RunConfig) -> Pipeline {
    let classifier = Classifier::for_preference(config.ua_engine);
    info!(
        "Starting logsift: input={}, output={}, ua engine={}",
        config.input,
        config.output,
        classifier.engine_name()
    );
    Pipeline::new(classifier)
}
