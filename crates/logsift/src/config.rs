use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::cli::Cli;
use crate::ua::EnginePreference;

const DEFAULT_SUMMARY_TOP: usize = 5;

/// Effective configuration for one run.
///
/// Priority: defaults < config file < environment variables < CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: String,
    pub output: String,
    pub pretty: bool,
    pub summary: bool,
    pub wrap: bool,
    pub strict: bool,
    pub errors_path: Option<String>,
    pub ua_engine: EnginePreference,
    pub summary_top: usize,
}

/// Run defaults loadable from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileDefaults {
    pub pretty: bool,
    pub summary: bool,
    pub summary_top: Option<usize>,
    pub ua_engine: Option<String>,
}

impl FileDefaults {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let defaults: FileDefaults = toml::from_str(&contents)?;
        Ok(defaults)
    }
}

impl RunConfig {
    /// Resolve the run configuration from CLI flags, environment and an
    /// optional config file. A configured-but-missing file is not an error.
    pub fn load(cli: Cli) -> anyhow::Result<Self> {
        let config_path = cli
            .config
            .clone()
            .or_else(|| std::env::var("LOGSIFT_CONFIG_FILE").ok());

        let file = match config_path {
            Some(path) if Path::new(&path).exists() => {
                tracing::info!("Loading configuration from: {}", path);
                FileDefaults::from_file(&path)?
            }
            Some(path) => {
                tracing::info!("Config file not found at {}, using defaults", path);
                FileDefaults::default()
            }
            None => FileDefaults::default(),
        };

        let mut ua_engine = match file.ua_engine.as_deref() {
            Some(raw) => raw.parse().map_err(anyhow::Error::msg)?,
            None => EnginePreference::default(),
        };
        if let Ok(raw) = std::env::var("LOGSIFT_UA_ENGINE") {
            ua_engine = raw.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(arg) = cli.ua_engine {
            ua_engine = arg.into();
        }

        let config = Self {
            input: cli.input,
            output: cli.output,
            pretty: cli.pretty || file.pretty,
            summary: cli.summary || file.summary,
            wrap: cli.wrap,
            strict: cli.strict,
            errors_path: cli.errors,
            ua_engine,
            summary_top: file.summary_top.unwrap_or(DEFAULT_SUMMARY_TOP),
        };
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Validate configuration values (no I/O).
    pub fn validate(&self) -> Result<(), String> {
        if self.input.is_empty() {
            return Err("input must not be empty".to_string());
        }
        if self.output.is_empty() {
            return Err("output must not be empty".to_string());
        }
        if self.summary_top == 0 {
            return Err("summary_top must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: "-".to_string(),
            output: "-".to_string(),
            pretty: false,
            summary: false,
            wrap: false,
            strict: false,
            errors_path: None,
            ua_engine: EnginePreference::default(),
            summary_top: DEFAULT_SUMMARY_TOP,
        }
    }
}
