use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parley_logging::{FileConfig, LogConfig, LogFormat, RotationStrategy};

#[derive(Parser)]
#[command(name = "parley", about = "Parley chat client")]
pub struct Cli {
    /// Directory holding identity, contacts and conversations
    #[arg(long, env = "PARLEY_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Console log format (pretty, json)
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Also write JSONL logs to files in this directory
    #[arg(long, env = "PARLEY_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation (daily, hourly, never)
    #[arg(long, default_value = "daily", global = true)]
    pub log_rotation: RotationStrategy,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Data directory from the flag or environment, else the platform default
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Logging configuration selected by the log flags
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig::cli(&self.log_level).with_console_format(self.log_format);
        config.file = self
            .log_dir
            .as_ref()
            .map(|dir| FileConfig::new(dir).with_rotation(self.log_rotation));
        config
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in as the given user id
    Login {
        /// User id
        id: String,
    },
    /// Show the logged-in user id
    Whoami,
    /// Forget the logged-in user id
    Logout,
    /// Manage contacts
    Contacts {
        #[command(subcommand)]
        command: ContactsCommand,
    },
    /// Start an empty conversation with the given recipients
    New {
        /// Recipient ids
        #[arg(required = true)]
        recipients: Vec<String>,
    },
    /// Send a message
    Send {
        /// Recipient ids
        #[arg(long, required = true, num_args = 1..)]
        to: Vec<String>,
        /// Message text
        text: String,
    },
    /// List conversations
    List,
    /// Show one conversation's messages
    Show {
        /// Conversation index
        #[arg(default_value_t = 0)]
        index: usize,
    },
}

#[derive(Subcommand)]
pub enum ContactsCommand {
    /// Add a contact
    Add {
        /// Contact's user id
        id: String,
        /// Display name
        name: String,
    },
    /// List contacts
    List,
}

/// Platform data directory for the chat client
pub fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/parley");
        }
    }
    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("parley");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local/share/parley");
        }
    }
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("parley");
        }
    }
    PathBuf::from(".parley")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_send() {
        let cli = Cli::try_parse_from(["parley", "send", "--to", "u2", "u3", "--", "hello there"])
            .unwrap();
        match cli.command {
            Command::Send { to, text } => {
                assert_eq!(to, vec!["u2", "u3"]);
                assert_eq!(text, "hello there");
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_parse_show_defaults_to_first() {
        let cli = Cli::try_parse_from(["parley", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { index: 0 }));
    }

    #[test]
    fn test_default_logging_is_console_only() {
        let cli = Cli::try_parse_from(["parley", "list"]).unwrap();
        let config = cli.log_config();
        assert_eq!(config.default_level, "warn");
        assert_eq!(config.console.format, LogFormat::Pretty);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_log_dir_enables_file_output() {
        let cli = Cli::try_parse_from([
            "parley",
            "--log-dir",
            "/tmp/parley-logs",
            "--log-rotation",
            "hourly",
            "--log-format",
            "json",
            "whoami",
        ])
        .unwrap();
        let config = cli.log_config();
        assert_eq!(config.console.format, LogFormat::Json);
        assert_eq!(
            config.file,
            Some(FileConfig::new("/tmp/parley-logs").with_rotation(RotationStrategy::Hourly))
        );
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["parley", "--log-format", "xml", "list"]).is_err());
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let cli = Cli::try_parse_from(["parley", "--data-dir", "/tmp/parley-x", "list"]).unwrap();
        assert_eq!(cli.data_dir(), PathBuf::from("/tmp/parley-x"));
    }
}
