use crate::errors::AppError;
use crate::report_window::ReportWindow;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

const REPORT_FILE_EXTENSION: &str = "txt";

/// Outputs the reports given.
///
/// Takes (report_name, report_string) and prints them to stdout, or writes each of them
/// to a file under `file_reports_dir` when one is passed in.
pub async fn write_reports<S1: AsRef<str>, S2: AsRef<str>>(
  window: &ReportWindow,
  reports: Vec<(S1, S2)>,
  file_reports_dir: Option<&Path>,
) -> Result<(), AppError> {
  for (index, (report_name, report)) in reports.into_iter().enumerate() {
    let (report_name, report) = (report_name.as_ref(), report.as_ref());

    let Some(file_reports_dir) = file_reports_dir else {
      if index > 0 {
        println!();
      }

      println!("{}", report);
      continue;
    };

    let report_path = write_report_file(file_reports_dir, window, report_name, report).await?;

    println!("Report {:?} written to {}.", report_name, report_path.display());
  }

  Ok(())
}

/// Writes the report to `<file_reports_dir>/<YYYY-MM>/<report_name>.txt`, replacing any previous report.
pub async fn write_report_file(
  file_reports_dir: &Path,
  window: &ReportWindow,
  report_name: &str,
  report: &str,
) -> Result<PathBuf, AppError> {
  let mut report_dir = file_reports_dir.to_path_buf();
  report_dir.push(format!("{:04}-{:02}", window.year(), window.month()));

  fs::create_dir_all(&report_dir).await?;

  let report_path = report_dir.join(format!("{report_name}.{REPORT_FILE_EXTENSION}"));
  let mut report_file = fs::OpenOptions::new()
    .write(true)
    .truncate(true)
    .create(true)
    .open(&report_path)
    .await?;

  report_file.write_all(report.as_bytes()).await?;
  report_file.write_all(b"\n").await?;
  report_file.flush().await?;

  tracing::info!("Wrote report {:?} to {:?}.", report_name, report_path);

  Ok(report_path)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn reports_are_written_under_their_month() {
    let file_reports_dir = tempfile::tempdir().unwrap();
    let window = ReportWindow::new(2016, 8).unwrap();

    let report_path = write_report_file(
      file_reports_dir.path(),
      &window,
      "thank_givers",
      "Thank givers for August 2016",
    )
    .await
    .unwrap();

    assert_eq!(
      report_path,
      file_reports_dir.path().join("2016-08").join("thank_givers.txt")
    );
    assert_eq!(
      fs::read_to_string(&report_path).await.unwrap(),
      "Thank givers for August 2016\n"
    );
  }

  #[tokio::test]
  async fn rewriting_a_report_replaces_it() {
    let file_reports_dir = tempfile::tempdir().unwrap();
    let window = ReportWindow::new(2016, 12).unwrap();

    write_report_file(file_reports_dir.path(), &window, "thank_recipients", "a much longer first report")
      .await
      .unwrap();
    let report_path =
      write_report_file(file_reports_dir.path(), &window, "thank_recipients", "second")
        .await
        .unwrap();

    assert_eq!(fs::read_to_string(&report_path).await.unwrap(), "second\n");
  }

  #[tokio::test]
  async fn every_report_gets_a_file() {
    let file_reports_dir = tempfile::tempdir().unwrap();
    let window = ReportWindow::new(2016, 6).unwrap();
    let reports = vec![("thank_givers", "givers"), ("thank_recipients", "recipients")];

    write_reports(&window, reports, Some(file_reports_dir.path()))
      .await
      .unwrap();

    let month_dir = file_reports_dir.path().join("2016-06");
    assert!(month_dir.join("thank_givers.txt").exists());
    assert!(month_dir.join("thank_recipients.txt").exists());
  }
}
