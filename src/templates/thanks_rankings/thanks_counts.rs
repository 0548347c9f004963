use crate::thanks_log::ThanksLogEntry;
use std::collections::HashMap;

/// How many thanks each user sent and received, keyed by user name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ThanksCounts {
  pub givers: HashMap<String, usize>,
  pub recipients: HashMap<String, usize>,
}

impl ThanksCounts {
  pub fn from_entries<'a, I>(entries: I) -> Self
  where
    I: IntoIterator<Item = &'a ThanksLogEntry>,
  {
    entries
      .into_iter()
      .fold(Self::default(), |mut thanks_counts, entry| {
        *thanks_counts
          .givers
          .entry(entry.actor().to_string())
          .or_default() += 1;
        *thanks_counts
          .recipients
          .entry(entry.target().to_string())
          .or_default() += 1;

        thanks_counts
      })
  }

  pub fn is_empty(&self) -> bool {
    self.givers.is_empty() && self.recipients.is_empty()
  }
}
