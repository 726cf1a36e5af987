use clap::{Parser, ValueEnum};

use crate::ua::EnginePreference;

#[derive(Parser, Debug)]
#[command(
    name = "logsift",
    version,
    about = "Parse nginx combined access logs into JSON enriched with user-agent details"
)]
pub struct Cli {
    /// Input path, or `-` for stdin
    #[arg(short = 'i', long, default_value = "-")]
    pub input: String,

    /// Output path, or `-` for stdout
    #[arg(short = 'o', long, default_value = "-")]
    pub output: String,

    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,

    /// Print a small stats report
    #[arg(long)]
    pub summary: bool,

    /// Wrap the output array with {"metadata": ..., "entries": [...]}
    #[arg(long)]
    pub wrap: bool,

    /// Exit with code 2 if any lines failed to parse
    #[arg(long)]
    pub strict: bool,

    /// Optional path to write failed lines (line number + reason)
    #[arg(long)]
    pub errors: Option<String>,

    /// Path to a TOML config file with run defaults
    #[arg(long)]
    pub config: Option<String>,

    /// User-agent engine selection
    #[arg(long, value_enum)]
    pub ua_engine: Option<UaEngineArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UaEngineArg {
    /// Profile tables when compiled in, heuristics otherwise
    Auto,
    /// Force the heuristic fallback
    Heuristic,
}

impl From<UaEngineArg> for EnginePreference {
    fn from(arg: UaEngineArg) -> Self {
        match arg {
            UaEngineArg::Auto => EnginePreference::Auto,
            UaEngineArg::Heuristic => EnginePreference::Heuristic,
        }
    }
}
