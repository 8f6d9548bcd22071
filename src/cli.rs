//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Planform - guided business intake and marketing plan generation
#[derive(Parser)]
#[command(
    name = "pf",
    about = "Turns a short business interview into a social media marketing plan",
    version,
    after_help = "Logs are written to: ~/.local/share/planform/logs/planform.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Launch the interactive form TUI (default)
    Tui,

    /// Run the interview at a plain terminal prompt
    Interview,

    /// Generate a plan from a saved answers file
    Run {
        /// YAML file mapping question ids to answers
        #[arg(value_name = "ANSWERS")]
        answers: PathBuf,

        /// Write the plan to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the active question set
    Questions {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show application logs
    Logs {
        /// Follow log output (like tail -f)
        #[arg(short, long)]
        follow: bool,

        /// Number of lines to show
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },
}

/// Output format for the questions command
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planform")
        .join("logs")
        .join("planform.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["pf"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_tui() {
        let cli = Cli::parse_from(["pf", "tui"]);
        assert!(matches!(cli.command, Some(Command::Tui)));
    }

    #[test]
    fn test_cli_parse_interview() {
        let cli = Cli::parse_from(["pf", "interview"]);
        assert!(matches!(cli.command, Some(Command::Interview)));
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["pf", "run", "answers.yml"]);
        if let Some(Command::Run { answers, out }) = cli.command {
            assert_eq!(answers, PathBuf::from("answers.yml"));
            assert!(out.is_none());
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_with_out() {
        let cli = Cli::parse_from(["pf", "run", "answers.yml", "-o", "plan.md"]);
        if let Some(Command::Run { out, .. }) = cli.command {
            assert_eq!(out, Some(PathBuf::from("plan.md")));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_questions() {
        let cli = Cli::parse_from(["pf", "questions"]);
        assert!(matches!(cli.command, Some(Command::Questions { .. })));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["pf", "-c", "/path/to/config.yml", "questions"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
    }
}
