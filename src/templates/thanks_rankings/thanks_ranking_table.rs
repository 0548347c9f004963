use super::thanks_ranking_entry::{assign_places, rank_thanks_counts, ThanksRankingEntry};
use app_config::ReportFormat;
use std::collections::HashMap;
use tabled::settings::Style;
use tabled::Table;

const WIKITABLE_OPENING: &str = r#"{| class="wikitable" style="text-align: left;""#;
const WIKITABLE_CAPTION: &str = "|+ <!-- caption -->";
const WIKITABLE_ROW_SEPARATOR: &str = "|-";
const WIKITABLE_CLOSING: &str = "|}";
const RIGHT_ALIGNED_CELL: &str = r#"align="right"|"#;

const PLACE_HEADER: &str = "#";
const USER_HEADER: &str = "User";
const THANKS_HEADER: &str = "Thanks";
/// Extra width every header is given beyond its own length.
const HEADER_PADDING: usize = 2;

/// A ranking of users by the amount of thanks they sent or received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThanksRankingTable {
  entries: Vec<ThanksRankingEntry>,
}

impl ThanksRankingTable {
  pub fn new(entries: Vec<ThanksRankingEntry>) -> Self {
    Self { entries }
  }

  pub fn from_thanks_counts(thanks_counts: &HashMap<String, usize>, minimum_actions: usize) -> Self {
    Self::new(assign_places(rank_thanks_counts(
      thanks_counts,
      minimum_actions,
    )))
  }

  pub fn entries(&self) -> &[ThanksRankingEntry] {
    &self.entries
  }

  pub fn render(&self, report_format: ReportFormat) -> String {
    match report_format {
      ReportFormat::Wikitext => self.to_wikitext(),
      ReportFormat::Markdown => self.to_markdown(),
    }
  }

  /// Renders a `wikitable` with every column padded to its widest cell, users linked
  /// through `Special:CentralAuth`.
  pub fn to_wikitext(&self) -> String {
    let rows: Vec<[String; 3]> = self
      .entries
      .iter()
      .map(|entry| {
        [
          entry.place.to_string(),
          format!("[[Special:CentralAuth/{}]]", entry.name),
          entry.thanks.to_string(),
        ]
      })
      .collect();

    let headers = [PLACE_HEADER, USER_HEADER, THANKS_HEADER];
    let mut column_widths = headers.map(|header| header.chars().count() + HEADER_PADDING);

    for row in &rows {
      for (column_width, cell) in column_widths.iter_mut().zip(row) {
        *column_width = (*column_width).max(cell.chars().count());
      }
    }

    let mut lines = vec![
      WIKITABLE_OPENING.to_string(),
      WIKITABLE_CAPTION.to_string(),
      WIKITABLE_ROW_SEPARATOR.to_string(),
      wikitable_row("!", headers, &column_widths),
    ];

    for [place, user, thanks] in &rows {
      lines.push(WIKITABLE_ROW_SEPARATOR.to_string());
      lines.push(wikitable_row(
        "|",
        [place.as_str(), user.as_str(), thanks.as_str()],
        &column_widths,
      ));
    }

    lines.push(WIKITABLE_CLOSING.to_string());

    lines.join("\n")
  }

  pub fn to_markdown(&self) -> String {
    let mut table = Table::new(self.entries.clone());

    table.with(Style::markdown());

    table.to_string()
  }
}

impl std::fmt::Display for ThanksRankingTable {
  fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(formatter, "{}", self.to_wikitext())
  }
}

/// `marker` is `!` for the header row and `|` for data rows.
/// Place and thanks are right aligned, the user is left aligned.
fn wikitable_row(marker: &str, [place, user, thanks]: [&str; 3], column_widths: &[usize; 3]) -> String {
  let [place_width, user_width, thanks_width] = *column_widths;
  let cell_separator = marker.repeat(2);

  format!(
    "{marker} {RIGHT_ALIGNED_CELL} {place:>place_width$} {cell_separator} {user:<user_width$} {cell_separator} {RIGHT_ALIGNED_CELL} {thanks:>thanks_width$}"
  )
  .trim_end()
  .to_string()
}
