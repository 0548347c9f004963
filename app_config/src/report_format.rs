use std::str::FromStr;

/// The markup the ranking tables of a report are rendered with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// A MediaWiki `wikitable`, ready to be pasted onto a wiki page.
  #[default]
  Wikitext,
  Markdown,
}

impl ReportFormat {
  pub const WIKITEXT: &'static str = "wikitext";
  pub const MARKDOWN: &'static str = "markdown";
}

/// Parses the value of `--format`.
impl FromStr for ReportFormat {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.to_lowercase().trim() {
      Self::WIKITEXT | "wiki" => Ok(Self::Wikitext),
      Self::MARKDOWN | "md" => Ok(Self::Markdown),
      _ => Err(format!(
        "Unknown report format {:?}. Expected {} or {}.",
        value,
        Self::WIKITEXT,
        Self::MARKDOWN
      )),
    }
  }
}

impl AsRef<str> for ReportFormat {
  fn as_ref(&self) -> &str {
    match self {
      ReportFormat::Wikitext => Self::WIKITEXT,
      ReportFormat::Markdown => Self::MARKDOWN,
    }
  }
}

impl std::fmt::Display for ReportFormat {
  fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(formatter, "{}", self.as_ref())
  }
}
