use anyhow::anyhow;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// How often the log file is rotated when logging to a directory.
///
/// Unknown values are kept so the error can name them once a file appender is built.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String")]
pub enum RollingAppenderRotation {
  Minutely,
  Hourly,

  #[default]
  Daily,
  Never,

  Unknown(String),
}

impl RollingAppenderRotation {
  /// Builds the appender for `<logging_dir>/<filename_prefix>.<date>`, creating the directory if needed.
  pub fn to_file_appender(
    &self,
    logging_dir: &Path,
    filename_prefix: &str,
  ) -> anyhow::Result<RollingFileAppender> {
    let file_appender = RollingFileAppender::builder()
      .rotation(self.rotation()?)
      .filename_prefix(filename_prefix)
      .build(logging_dir)?;

    Ok(file_appender)
  }

  fn rotation(&self) -> anyhow::Result<Rotation> {
    match self {
      Self::Minutely => Ok(Rotation::MINUTELY),
      Self::Hourly => Ok(Rotation::HOURLY),
      Self::Daily => Ok(Rotation::DAILY),
      Self::Never => Ok(Rotation::NEVER),
      Self::Unknown(value) => Err(anyhow!(
        "Unknown logging_roll_appender value {:?}. Expected minutely, hourly, daily or never.",
        value
      )),
    }
  }
}

impl<S> From<S> for RollingAppenderRotation
where
  S: AsRef<str>,
{
  fn from(rotation_value: S) -> Self {
    match rotation_value.as_ref().to_lowercase().trim() {
      "minutely" | "minute" => Self::Minutely,
      "hourly" | "hour" => Self::Hourly,
      "daily" | "day" => Self::Daily,
      "never" | "none" => Self::Never,
      _ => Self::Unknown(rotation_value.as_ref().to_string()),
    }
  }
}
