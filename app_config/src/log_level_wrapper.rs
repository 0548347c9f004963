use std::str::FromStr;

#[derive(
  Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LoggingConfigLevel {
  /// Disables logging entirely.
  Off,
  Error,
  #[default]
  Warn,
  Info,
  Debug,
  Trace,
}

impl LoggingConfigLevel {
  /// Returns the filter directive for this level, or `None` if logging is turned off.
  pub fn directive(&self) -> Option<&str> {
    match self {
      LoggingConfigLevel::Off => None,
      level => Some(level.as_ref()),
    }
  }
}

impl AsRef<str> for LoggingConfigLevel {
  fn as_ref(&self) -> &str {
    match self {
      LoggingConfigLevel::Off => "off",
      LoggingConfigLevel::Error => "error",
      LoggingConfigLevel::Warn => "warn",
      LoggingConfigLevel::Debug => "debug",
      LoggingConfigLevel::Trace => "trace",
      LoggingConfigLevel::Info => "info",
    }
  }
}

/// Used when the level comes from `THANKS_REPORT_LOG_LEVEL`.
impl FromStr for LoggingConfigLevel {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.to_lowercase().trim() {
      "off" | "none" => Ok(Self::Off),
      "error" => Ok(Self::Error),
      "warn" | "warning" => Ok(Self::Warn),
      "info" => Ok(Self::Info),
      "debug" => Ok(Self::Debug),
      "trace" => Ok(Self::Trace),
      _ => Err(format!("Unknown log level: {:?}", value)),
    }
  }
}
