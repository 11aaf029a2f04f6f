use anyhow::{Context, Result};
use configuration::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// Console output goes to stderr so `--json` results on stdout stay parseable.
/// `RUST_LOG` overrides `logging.level`. When `logging.directory` is set, a
/// daily-rotated JSON log is written there as well; keep the returned guard
/// alive until exit or buffered lines are lost.
pub fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("Invalid logging.level directive '{}'", settings.level))?,
    };

    let console_json = settings
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let console_text = (!settings.json).then(|| fmt::layer().with_writer(std::io::stderr));

    let (file_layer, guard) = match &settings.directory {
        Some(directory) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("journal")
                .filename_suffix("log")
                .build(directory)
                .with_context(|| format!("Failed to open log directory {}", directory.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_json)
        .with(console_text)
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}
