use crate::log_level_wrapper::*;
use crate::rolling_appender_rotation::*;
use schematic::{Config, ConfigLoader};
use std::path::{Path, PathBuf};

const CONFIG_PATH_ENV_VAR: &str = "CONFIG_PATH";
const DEFAULT_CONFIG_FILEPATH: &str = "./config/config.yml";

#[derive(Debug, Config, serde::Serialize, serde::Deserialize)]
pub struct AppConfig {
  #[setting(env = "THANKS_REPORT_LOG_LEVEL")]
  log_level: LoggingConfigLevel,
  /// Logs are written to stderr when this isn't set.
  logging_dir: Option<PathBuf>,
  #[setting(default = "thanks_report.log")]
  logging_filename_prefix: String,
  logging_roll_appender: RollingAppenderRotation,

  /// The `api.php` endpoint of the wiki to report on.
  #[setting(
    default = "https://meta.wikimedia.org/w/api.php",
    env = "THANKS_REPORT_API_URL"
  )]
  api_url: String,
  #[setting(default = "thanks_report/0.1.0 (MediaWiki thanks log reports)")]
  user_agent: String,
  /// Log events requested per API call. `max` lets the wiki decide.
  #[setting(default = "max")]
  request_limit: String,

  #[setting(default = "file_reports")]
  file_reports_dir: String,
}

impl AppConfig {
  /// Loads the config file at `$CONFIG_PATH` (or `./config/config.yml`) if it exists,
  /// with environment variables taking precedence.
  pub fn new() -> anyhow::Result<Self> {
    Self::from_path(get_config_path())
  }

  pub fn from_path<P: AsRef<Path>>(config_path: P) -> anyhow::Result<Self> {
    let mut config_loader = ConfigLoader::<AppConfig>::new();

    config_loader.file_optional(config_path.as_ref().to_path_buf())?;

    Ok(config_loader.load()?.config)
  }

  pub fn log_level(&self) -> &LoggingConfigLevel {
    &self.log_level
  }

  pub fn logging_dir(&self) -> Option<&PathBuf> {
    self.logging_dir.as_ref()
  }

  pub fn logging_filename_prefix(&self) -> &str {
    &self.logging_filename_prefix
  }

  pub fn logging_file_roll_appender(&self) -> &RollingAppenderRotation {
    &self.logging_roll_appender
  }

  pub fn api_url(&self) -> &str {
    &self.api_url
  }

  pub fn user_agent(&self) -> &str {
    &self.user_agent
  }

  pub fn request_limit(&self) -> &str {
    &self.request_limit
  }

  pub fn file_reports_dir(&self) -> &Path {
    Path::new(&self.file_reports_dir)
  }
}

fn get_config_path() -> PathBuf {
  let Some((_, config_path)) = std::env::vars().find(|(key, _)| key == CONFIG_PATH_ENV_VAR) else {
    return PathBuf::from(DEFAULT_CONFIG_FILEPATH);
  };

  PathBuf::from(config_path)
}
