use std::env;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Sorter crates log at info; dependencies (image decoders, config) only surface warnings.
const DEFAULT_FILTER: &str = "warn,screenshot_sorter=info,screenshot_sorter_core=info";

fn filter_directives() -> String {
    env::var("TRACING_LEVEL").unwrap_or_else(|_| DEFAULT_FILTER.to_string())
}

pub fn init_logger() -> impl Drop {
    let filter_layer = EnvFilter::new(filter_directives());

    let log_file_path = env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "./logs/screenshot-sorter.log".to_string());

    let file_appender = tracing_appender::rolling::never("./", log_file_path);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .without_time()
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    debug!("Tracing is configured for stdout and file logging.");

    guard
}
