use crate::errors::AppError;
use crate::report_window::ReportWindow;
use crate::thanks_log::ThanksLogSource;
use app_config::ReportFormat;
use std::collections::HashMap;
use tracing::instrument;

pub use thanks_counts::ThanksCounts;
pub use thanks_ranking_entry::{assign_places, rank_thanks_counts, ThanksRankingEntry};
pub use thanks_ranking_table::ThanksRankingTable;

mod thanks_counts;
mod thanks_ranking_entry;
mod thanks_ranking_table;

const THANK_GIVERS_TITLE: &str = "Thank givers for {DATE}";
const THANK_RECIPIENTS_TITLE: &str = "Thank recipients for {DATE}";

/// Generates the thank givers and thank recipients reports for the window.
/// Returns a list of the name and report string.
#[instrument(skip_all, fields(window = %window, minimum_actions = minimum_actions))]
pub async fn get_thanks_reports<S: ThanksLogSource>(
  thanks_log_source: &S,
  window: &ReportWindow,
  minimum_actions: usize,
  report_format: ReportFormat,
) -> Result<Vec<(&'static str, String)>, AppError> {
  let thanks_events = thanks_log_source.thanks_events(window).await?;
  let thanks_counts = ThanksCounts::from_entries(&thanks_events);

  if thanks_counts.is_empty() {
    tracing::info!("No thanks were logged during {}.", window);
  }

  Ok(build_thanks_reports(
    &thanks_counts,
    window,
    minimum_actions,
    report_format,
  ))
}

pub fn build_thanks_reports(
  thanks_counts: &ThanksCounts,
  window: &ReportWindow,
  minimum_actions: usize,
  report_format: ReportFormat,
) -> Vec<(&'static str, String)> {
  let date = window.to_string();

  vec![
    (
      "thank_givers",
      thanks_report(
        THANK_GIVERS_TITLE,
        &date,
        &thanks_counts.givers,
        minimum_actions,
        report_format,
      ),
    ),
    (
      "thank_recipients",
      thanks_report(
        THANK_RECIPIENTS_TITLE,
        &date,
        &thanks_counts.recipients,
        minimum_actions,
        report_format,
      ),
    ),
  ]
}

fn thanks_report(
  title: &str,
  date: &str,
  thanks_counts: &HashMap<String, usize>,
  minimum_actions: usize,
  report_format: ReportFormat,
) -> String {
  let table = ThanksRankingTable::from_thanks_counts(thanks_counts, minimum_actions);

  tracing::debug!(
    "{} users of {} reached the minimum of {} for {:?}.",
    table.entries().len(),
    thanks_counts.len(),
    minimum_actions,
    title
  );

  format!(
    "{}\n{}",
    title.replace("{DATE}", date),
    table.render(report_format)
  )
}
