pub mod settings;

use std::io::IsTerminal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Logger;

/// Installs the global subscriber. `log` records (sqlx statement logging) are
/// bridged into tracing by `try_init`.
///
/// `RUST_LOG` takes precedence over the configured level. When a log directory
/// is configured, output is also written to a daily rolling file; the returned
/// guard must be kept alive for the lifetime of the process so buffered lines
/// get flushed.
pub fn init_logging(logger: &Logger) -> Option<WorkerGuard> {
    let level = if logger.level.is_empty() {
        "info"
    } else {
        logger.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stdout().is_terminal());

    match &logger.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "wled-usage.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                .try_init()
                .ok();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .try_init()
                .ok();
            None
        }
    }
}
