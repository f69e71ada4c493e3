//! Optional TOML config file.
//!
//! ```toml
//! subject = "astro-ph"          # physics archive, alias `subcategory`
//! score_threshold = 1.5
//! slack_id = "https://hooks.slack.com/services/..."
//! line_token = "..."
//!
//! [keywords]
//! "dark matter" = 2.0
//! neutrino = 1.5
//! ```
//!
//! Precedence: explicit CLI flag, then config file, then built-in default.
//! Channel credentials additionally fall back to `SLACK_ID` / `LINE_TOKEN`.

use std::path::Path;

use ax_core::{Error, KeywordWeights, Result};
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_THRESHOLD: f64 = 0.0;
pub const DEFAULT_SUBCATEGORY: &str = "astro-ph";

pub const SLACK_ENV: &str = "SLACK_ID";
pub const LINE_ENV: &str = "LINE_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, alias = "subject")]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub keywords: Option<KeywordWeights>,
    #[serde(default)]
    pub score_threshold: Option<f64>,
    #[serde(default)]
    pub slack_id: Option<String>,
    #[serde(default)]
    pub line_token: Option<String>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }
}

/// Reads the config file at `path`. A missing file is not an error.
pub fn load(path: &Path) -> Result<Option<FileConfig>> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let config = FileConfig::parse(&text)?;
            info!("⚙️ Loaded config from {}", path.display());
            Ok(Some(config))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {}, using defaults", path.display());
            Ok(None)
        }
        Err(e) => Err(Error::Config(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Picks the first value present: CLI flag, config file, environment.
pub fn first_of(cli: Option<String>, file: Option<String>, env: Option<String>) -> Option<String> {
    cli.or(file).or(env).filter(|value| !value.trim().is_empty())
}
