//! Logging configuration
//!
//! [`LogFormat`] and [`RotationStrategy`] parse from the strings accepted on
//! the command line (`pretty`/`json`, `daily`/`hourly`/`never`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Main logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub default_level: String,
    /// Console output on stderr
    pub console: ConsoleConfig,
    /// Optional JSONL log files
    pub file: Option<FileConfig>,
    /// Shape of JSONL records, console or file
    pub jsonl: JsonlConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::cli("warn")
    }
}

impl LogConfig {
    /// Human-readable console output at `level`, no file output
    pub fn cli(level: impl Into<String>) -> Self {
        Self {
            default_level: level.into(),
            console: ConsoleConfig::default(),
            file: None,
            jsonl: JsonlConfig::default(),
        }
    }

    /// Set the console format
    pub fn with_console_format(mut self, format: LogFormat) -> Self {
        self.console.format = format;
        self.console.ansi = format == LogFormat::Pretty;
        self
    }
}

/// Console output configuration
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Record format
    pub format: LogFormat,
    /// Include ANSI colors (pretty format only)
    pub ansi: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            ansi: true,
        }
    }
}

/// Console record format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" | "jsonl" => Ok(Self::Json),
            other => Err(format!("unknown log format {other:?} (expected pretty or json)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// File output configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    /// Directory for log files
    pub directory: PathBuf,
    /// File name prefix
    pub prefix: String,
    /// Rotation strategy
    pub rotation: RotationStrategy,
}

impl FileConfig {
    /// Files named `parley.*` in `directory`, rotated daily
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: "parley".to_string(),
            rotation: RotationStrategy::default(),
        }
    }

    /// Set the rotation strategy
    pub fn with_rotation(mut self, rotation: RotationStrategy) -> Self {
        self.rotation = rotation;
        self
    }
}

/// File rotation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationStrategy {
    /// Rotate daily
    #[default]
    Daily,
    /// Rotate hourly
    Hourly,
    /// Never rotate (single file, truncated on start)
    Never,
}

impl FromStr for RotationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "hourly" => Ok(Self::Hourly),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown rotation {other:?} (expected daily, hourly or never)")),
        }
    }
}

impl fmt::Display for RotationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => f.write_str("daily"),
            Self::Hourly => f.write_str("hourly"),
            Self::Never => f.write_str("never"),
        }
    }
}

/// JSONL record configuration
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    /// Flatten event fields to root level
    pub flatten_events: bool,
    /// Include span list in events
    pub include_spans: bool,
    /// Include file/line information
    pub include_location: bool,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            flatten_events: true,
            include_spans: true,
            include_location: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config() {
        let config = LogConfig::cli("debug");
        assert_eq!(config.default_level, "debug");
        assert_eq!(config.console.format, LogFormat::Pretty);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_json_console_disables_ansi() {
        let config = LogConfig::cli("info").with_console_format(LogFormat::Json);
        assert_eq!(config.console.format, LogFormat::Json);
        assert!(!config.console.ansi);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_parse_rotation() {
        assert_eq!("hourly".parse::<RotationStrategy>(), Ok(RotationStrategy::Hourly));
        assert_eq!("never".parse::<RotationStrategy>(), Ok(RotationStrategy::Never));
        assert!("weekly".parse::<RotationStrategy>().is_err());
    }

    #[test]
    fn test_file_config_defaults() {
        let file = FileConfig::new("/var/log/parley").with_rotation(RotationStrategy::Never);
        assert_eq!(file.directory, PathBuf::from("/var/log/parley"));
        assert_eq!(file.prefix, "parley");
        assert_eq!(file.rotation, RotationStrategy::Never);
    }
}
