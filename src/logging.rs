use crate::errors::AppError;
use app_config::AppConfig;
use tracing_subscriber::EnvFilter;

/// Dependencies that are only worth hearing from when something goes wrong.
const QUIET_DEPENDENCIES: &str = "reqwest=warn,hyper=warn,hyper_util=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
  Off,
  Stderr,
  File,
}

/// Logs go to stderr unless a logging directory is configured, stdout is reserved for the reports.
pub fn setup_logging_config(config: &AppConfig) -> Result<LogDestination, AppError> {
  let Some(log_level) = config.log_level().directive() else {
    return Ok(LogDestination::Off);
  };

  let subscriber_builder = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::new(format!("{log_level},{QUIET_DEPENDENCIES}")))
    .with_ansi(false);

  if let Some(logging_dir) = config.logging_dir() {
    let file_appender = config
      .logging_file_roll_appender()
      .to_file_appender(logging_dir, config.logging_filename_prefix())?;

    subscriber_builder
      .with_writer(file_appender)
      .try_init()
      .map_err(|error| AppError::LoggingSetupError(error.to_string()))?;

    return Ok(LogDestination::File);
  }

  subscriber_builder
    .with_writer(std::io::stderr)
    .try_init()
    .map_err(|error| AppError::LoggingSetupError(error.to_string()))?;

  Ok(LogDestination::Stderr)
}
