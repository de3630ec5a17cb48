use crate::config::toml_config::TomlConfig;
use crate::config::{SessionConfig, DEFAULT_REGION};
use crate::domain::model::GeoPoint;
use crate::utils::error::{MapError, Result};
use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "event-map")]
#[command(about = "Fetch event locations and render them as map pins and a heatmap")]
pub struct CliConfig {
    /// Data source URL returning {"events": [...]}
    #[arg(long)]
    pub api_path: Option<String>,

    /// TOML file with a [session] table; only --api-path overrides it
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = "map")]
    pub container_id: String,

    #[arg(long, default_value_t = DEFAULT_REGION.lat, allow_hyphen_values = true)]
    pub initial_lat: f64,

    #[arg(long, default_value_t = DEFAULT_REGION.lng, allow_hyphen_values = true)]
    pub initial_lng: f64,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub is_political: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub show_heatmap: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub show_markers: bool,

    /// Fetch each mode separately instead of sharing one response
    #[arg(long)]
    pub separate_fetches: bool,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// Resolves the session configuration. With `--config`, the file is the
    /// base and only `--api-path` overrides it; otherwise flags are used.
    pub fn session_config(&self) -> Result<SessionConfig> {
        if let Some(path) = &self.config {
            let file = TomlConfig::from_file(path)?;
            let mut session = file.session;
            if let Some(api_path) = &self.api_path {
                session.api_path = api_path.clone();
            }
            return Ok(session);
        }

        let api_path = self.api_path.clone().ok_or_else(|| MapError::MissingConfigError {
            field: "api_path".to_string(),
        })?;

        Ok(SessionConfig {
            api_path,
            container_id: self.container_id.clone(),
            initial_region: GeoPoint::new(self.initial_lat, self.initial_lng),
            is_political: self.is_political,
            show_heatmap: self.show_heatmap,
            show_markers: self.show_markers,
            timeout_seconds: self.timeout_seconds,
            output_path: self.output_path.clone(),
        })
    }

    /// Logging flags from the command line, OR-ed with the file's.
    pub fn logging(&self) -> (bool, bool) {
        let file = self
            .config
            .as_ref()
            .and_then(|path| TomlConfig::from_file(path).ok());
        let verbose = self.verbose || file.as_ref().map(|f| f.verbose()).unwrap_or(false);
        let json = self.log_json || file.as_ref().map(|f| f.json_logs()).unwrap_or(false);
        (verbose, json)
    }
}
