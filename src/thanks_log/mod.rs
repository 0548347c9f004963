use crate::errors::AppError;
use crate::report_window::ReportWindow;
use chrono::{DateTime, Utc};

pub mod mediawiki;

pub use mediawiki::MediaWikiLogSource;

/// One user thanking another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThanksLogEntry {
  actor: String,
  target: String,
  timestamp: DateTime<Utc>,
}

impl ThanksLogEntry {
  pub fn new<S1, S2>(actor: S1, target: S2, timestamp: DateTime<Utc>) -> Self
  where
    S1: Into<String>,
    S2: Into<String>,
  {
    Self {
      actor: actor.into(),
      target: target.into(),
      timestamp,
    }
  }

  /// The user who sent the thanks.
  pub fn actor(&self) -> &str {
    &self.actor
  }

  /// The user who was thanked.
  pub fn target(&self) -> &str {
    &self.target
  }

  pub fn timestamp(&self) -> &DateTime<Utc> {
    &self.timestamp
  }
}

pub trait ThanksLogSource {
  /// Returns every thanks event logged within the window.
  async fn thanks_events(&self, window: &ReportWindow) -> Result<Vec<ThanksLogEntry>, AppError>;
}
