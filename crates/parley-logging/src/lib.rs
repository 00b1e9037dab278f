//! Structured logging for the Parley chat client
//!
//! Thin setup layer over `tracing-subscriber`: an env filter, a console
//! layer on stderr (pretty or JSONL), and an optional JSONL file layer with
//! rotation via `tracing-appender`.
//!
//! # Quick Start
//!
//! ```ignore
//! use parley_logging::{FileConfig, LogConfig, LogFormat, ParleySubscriberBuilder};
//!
//! // Keep the guard alive until exit so buffered file output is flushed
//! let mut config = LogConfig::cli("info").with_console_format(LogFormat::Json);
//! config.file = Some(FileConfig::new("./logs"));
//! let _guard = ParleySubscriberBuilder::new().with_config(config).init();
//! ```
//!
//! `RUST_LOG` takes precedence over the configured default level.

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, LogFormat, RotationStrategy};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::Layered;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Log file or directory could not be created
    #[error("failed to prepare log output: {0}")]
    Io(#[from] std::io::Error),

    /// A global subscriber is already installed
    #[error("failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Builder for configuring and initializing the Parley logging subscriber
///
/// Defaults to pretty console output at `warn` with no file output.
pub struct ParleySubscriberBuilder {
    config: LogConfig,
}

impl ParleySubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Install the subscriber globally
    ///
    /// The returned guard flushes the file writer when dropped and must be
    /// kept alive for the life of the program when file output is enabled.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.default_level));

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let jsonl = &self.config.jsonl;

        if self.config.console.format == LogFormat::Pretty {
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_ansi(self.config.console.ansi)
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .boxed(),
            );
        } else {
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(jsonl.include_spans)
                    .flatten_event(jsonl.flatten_events)
                    .with_file(jsonl.include_location)
                    .with_line_number(jsonl.include_location)
                    .with_writer(std::io::stderr)
                    .boxed(),
            );
        }

        let mut guard = None;
        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = create_file_writer(file_config)?;
            guard = Some(file_guard);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(jsonl.include_spans)
                    .flatten_event(jsonl.flatten_events)
                    .with_file(jsonl.include_location)
                    .with_line_number(jsonl.include_location)
                    .with_writer(writer)
                    .boxed(),
            );
        }

        tracing_subscriber::registry()
            .with(env_filter)
            .with(layers)
            .try_init()?;

        Ok(guard)
    }

    /// Install the subscriber globally, reporting failures on stderr
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: {}", e);
                None
            }
        }
    }
}

impl Default for ParleySubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the file writer; `Never` truncates a single file, others append
fn create_file_writer(
    file_config: &FileConfig,
) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&file_config.directory)?;

    let writer = match file_config.rotation {
        RotationStrategy::Never => {
            let file_path = file_config
                .directory
                .join(format!("{}.log", file_config.prefix));
            tracing_appender::non_blocking(File::create(&file_path)?)
        }
        RotationStrategy::Daily => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::DAILY,
            &file_config.directory,
            &file_config.prefix,
        )),
        RotationStrategy::Hourly => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::HOURLY,
            &file_config.directory,
            &file_config.prefix,
        )),
    };

    Ok(writer)
}
