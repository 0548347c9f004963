use app_config::{AppConfig, CLAP_ARGS};
use thanks_report::errors::AppError;
use thanks_report::logging::{setup_logging_config, LogDestination};
use thanks_report::report_window::ReportWindow;
use thanks_report::templates::thanks_rankings::get_thanks_reports;
use thanks_report::thanks_log::MediaWikiLogSource;
use thanks_report::write_reports::write_reports;

#[tokio::main]
async fn main() {
  let (config, log_destination) = match load_config() {
    Ok(loaded_config) => loaded_config,
    Err(error) => exit_with_error(error, LogDestination::Off),
  };

  if let Err(error) = run(&config).await {
    exit_with_error(error, log_destination);
  }
}

fn load_config() -> Result<(AppConfig, LogDestination), AppError> {
  let config = AppConfig::new()?;
  let log_destination = setup_logging_config(&config)?;

  Ok((config, log_destination))
}

async fn run(config: &AppConfig) -> Result<(), AppError> {
  for argument in CLAP_ARGS.unrecognized_arguments() {
    tracing::warn!("Argument {:?} not understood; ignoring.", argument);
  }

  let window = ReportWindow::new(CLAP_ARGS.year(), CLAP_ARGS.month())?;
  let thanks_log_source = MediaWikiLogSource::new(config)?;

  tracing::info!(
    "Generating {} thanks reports for {} from {}.",
    CLAP_ARGS.report_format(),
    window,
    thanks_log_source.api_url()
  );

  let reports = get_thanks_reports(
    &thanks_log_source,
    &window,
    CLAP_ARGS.minimum_actions(),
    CLAP_ARGS.report_format(),
  )
  .await?;

  let file_reports_dir = CLAP_ARGS
    .generate_file_reports()
    .then(|| config.file_reports_dir());

  write_reports(&window, reports, file_reports_dir).await
}

/// Errors are only printed directly when the log isn't already on stderr.
fn exit_with_error(error: AppError, log_destination: LogDestination) -> ! {
  tracing::error!("Failed to generate the thanks reports. Reason: {}", error);

  if log_destination != LogDestination::Stderr {
    eprintln!("Failed to generate the thanks reports. Reason: {}", error);
  }

  std::process::exit(1);
}
