//! Command-line argument parsing.
//!
//! Uses clap to drive the query pane from a terminal: launch a query, list
//! autocomplete suggestions, or toggle the DROP confirmation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use query_launch::config::Config;
use std::ops::Range;
use std::path::PathBuf;

/// Run queries against a remote engine with DROP confirmation.
#[derive(Parser, Debug)]
#[command(name = "query-launch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// State file path (buffer text, catalog, settings)
    #[arg(long, global = true, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Write logs to the log file instead of stderr
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch a query (the selection, or the whole buffer)
    Run(RunArgs),

    /// List autocomplete suggestions from the stored catalog
    Suggest(SuggestArgs),

    /// Turn the DROP confirmation prompt on or off
    DropConfirm {
        #[arg(value_enum)]
        mode: ConfirmSetting,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Query text; replaces the stored buffer. Defaults to the stored buffer.
    #[arg(value_name = "QUERY", conflicts_with = "file")]
    pub query: Option<String>,

    /// Read the buffer from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Byte range of the buffer to run instead of the whole buffer (e.g. 10..25)
    #[arg(short, long, value_name = "START..END", value_parser = parse_selection)]
    pub selection: Option<Range<usize>>,

    /// Answer the DROP confirmation prompt with this phrase
    #[arg(long, value_name = "PHRASE")]
    pub confirm: Option<String>,

    /// Engine URL (overrides config)
    #[arg(long, value_name = "URL")]
    pub engine_url: Option<String>,

    /// Use the in-memory mock engine
    #[arg(long)]
    pub mock_engine: bool,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Only show names starting with this prefix (case-insensitive)
    #[arg(value_name = "PREFIX")]
    pub prefix: Option<String>,
}

/// On/off switch for the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfirmSetting {
    On,
    Off,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config path, falling back to the platform default.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(Config::default_path)
    }
}

/// Parses `START..END` into a byte range.
fn parse_selection(s: &str) -> Result<Range<usize>, String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("Invalid selection: {s}. Expected START..END"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|e| format!("Invalid selection start '{start}': {e}"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|e| format!("Invalid selection end '{end}': {e}"))?;
    if start > end {
        return Err(format!("Selection start {start} is after end {end}"));
    }
    Ok(start..end)
}
