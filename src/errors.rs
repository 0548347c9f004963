use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("An error occurred when initializing the config: `{}`", .0)]
  ConfigError(#[from] anyhow::Error),

  #[error("Failed to set up logging. Reason: {}", .0)]
  LoggingSetupError(String),

  #[error("{}", .0)]
  IoError(#[from] std::io::Error),

  #[error("{}", .0)]
  UrlParseError(#[from] url::ParseError),

  #[error("{}", .0)]
  ReqwestError(#[from] reqwest::Error),

  #[error("{}", .0)]
  SerdeError(#[from] serde_json::Error),

  #[error("Attempted to generate a report with an invalid month of {:?}", .0)]
  InvalidMonthValue(u32),

  #[error("Attempted to generate a report with an out of range year of {:?}", .0)]
  InvalidYearValue(i32),

  #[error("Attempted to query the thanks log, but received an errored response. Status: {:?}", .0)]
  FailedToQueryThanksLog(StatusCode),

  #[error("The MediaWiki API returned an error. Code: {} | Info: {}", code, info)]
  MediaWikiApiError { code: String, info: String },

  #[error("Failed to parse the timestamp of a log event. Value: {:?}", .0)]
  InvalidLogTimestamp(String),
}
