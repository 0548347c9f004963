use crate::report_format::ReportFormat;
use chrono::{Datelike, Local};
use clap::{value_parser, Arg, ArgAction, Command};
use lazy_static::lazy_static;
use std::ffi::OsString;
use std::str::FromStr;

lazy_static! {
  pub static ref CLAP_ARGS: ClapArgs = ClapArgs::new();
}

pub const DEFAULT_MINIMUM_ACTIONS: u32 = 1;

#[derive(Debug)]
pub struct ClapArgs {
  args: clap::ArgMatches,
  unrecognized_arguments: Vec<String>,
}

impl ClapArgs {
  const MINIMUM_ACTIONS: &'static str = "minimum_actions";
  const YEAR: &'static str = "year";
  const MONTH: &'static str = "month";
  const FILE_REPORTS: &'static str = "file_reports";
  const REPORT_FORMAT: &'static str = "report_format";

  pub fn new() -> Self {
    Self::try_from_args(std::env::args_os()).unwrap_or_else(|error| error.exit())
  }

  /// Parses the given arguments instead of the ones the process was started with.
  ///
  /// Arguments that don't belong to any option are set aside before parsing, so they
  /// never take the place of the options after them.
  pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
  where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
  {
    let mut command = Self::setup_args();
    command.build();

    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let (known_arguments, unrecognized_arguments) = split_unrecognized_arguments(&command, args);
    let args = command.try_get_matches_from(known_arguments)?;

    Ok(Self {
      args,
      unrecognized_arguments,
    })
  }

  /// The minimum number of thanks sent or received for a user to be listed.
  pub fn minimum_actions(&self) -> usize {
    self
      .args
      .get_one::<u32>(Self::MINIMUM_ACTIONS)
      .copied()
      .unwrap_or(DEFAULT_MINIMUM_ACTIONS) as usize
  }

  /// Defaults to the current year.
  pub fn year(&self) -> i32 {
    self
      .args
      .get_one::<i32>(Self::YEAR)
      .copied()
      .unwrap_or_else(|| Local::now().year())
  }

  /// Defaults to the current month.
  pub fn month(&self) -> u32 {
    self
      .args
      .get_one::<u32>(Self::MONTH)
      .copied()
      .unwrap_or_else(|| Local::now().month())
  }

  pub fn generate_file_reports(&self) -> bool {
    self.args.get_flag(Self::FILE_REPORTS)
  }

  pub fn report_format(&self) -> ReportFormat {
    self
      .args
      .get_one::<ReportFormat>(Self::REPORT_FORMAT)
      .copied()
      .unwrap_or_default()
  }

  /// Every argument that didn't match a known option, in the order they were given.
  pub fn unrecognized_arguments(&self) -> &[String] {
    &self.unrecognized_arguments
  }

  fn setup_args() -> Command {
    Command::new("Thanks Report")
      .about("Creates reports for thankers and thankees of a wiki for a given month.")
      .arg(
        Arg::new(Self::MINIMUM_ACTIONS)
          .short('m')
          .long("minimum")
          .action(ArgAction::Set)
          .value_parser(value_parser!(u32).range(1..))
          .help("The minimum number of thanks actions needed for inclusion in a report."),
      )
      .arg(
        Arg::new(Self::YEAR)
          .short('y')
          .long("year")
          .action(ArgAction::Set)
          .value_parser(value_parser!(i32))
          .help("The year for which to generate the report. Defaults to the current year."),
      )
      .arg(
        Arg::new(Self::MONTH)
          .short('M')
          .long("month")
          .action(ArgAction::Set)
          .value_parser(value_parser!(u32).range(1..=12))
          .help("The month (as a number) for which to generate the report. Defaults to the current month."),
      )
      .arg(
        Arg::new(Self::FILE_REPORTS)
          .short('f')
          .long("file")
          .action(ArgAction::SetTrue)
          .help("Writes the reports to files instead of printing them."),
      )
      .arg(
        Arg::new(Self::REPORT_FORMAT)
          .long("format")
          .action(ArgAction::Set)
          .value_parser(ReportFormat::from_str)
          .help("The markup used for the report tables. Either wikitext or markdown."),
      )
  }
}

/// Separates the arguments matching an option of `command` (and the values they take)
/// from everything else. The first argument is the binary name and is always kept.
fn split_unrecognized_arguments(
  command: &Command,
  args: Vec<OsString>,
) -> (Vec<OsString>, Vec<String>) {
  let mut args = args.into_iter();
  let mut known_arguments: Vec<OsString> = args.next().into_iter().collect();
  let mut unrecognized_arguments = vec![];

  while let Some(argument) = args.next() {
    let argument_value = argument.to_string_lossy().into_owned();

    let takes_next_value = if argument_value == "--" {
      unrecognized_arguments.extend(args.by_ref().map(|rest| rest.to_string_lossy().into_owned()));
      continue;
    } else if let Some(long) = argument_value.strip_prefix("--") {
      let (name, attached_value) = match long.split_once('=') {
        Some((name, _)) => (name, true),
        None => (long, false),
      };

      match command.get_arguments().find(|arg| arg.get_long() == Some(name)) {
        Some(arg) => arg.get_action().takes_values() && !attached_value,
        None => {
          unrecognized_arguments.push(argument_value);
          continue;
        }
      }
    } else if let Some(shorts) = argument_value.strip_prefix('-').filter(|shorts| !shorts.is_empty()) {
      match short_cluster_takes_next_value(command, shorts) {
        Some(takes_next_value) => takes_next_value,
        None => {
          unrecognized_arguments.push(argument_value);
          continue;
        }
      }
    } else {
      unrecognized_arguments.push(argument_value);
      continue;
    };

    known_arguments.push(argument);

    if takes_next_value {
      known_arguments.extend(args.next());
    }
  }

  (known_arguments, unrecognized_arguments)
}

/// Walks a cluster of short flags such as `-fm3`.
/// Returns `None` if any flag in it is unknown, otherwise whether the next argument is its value.
fn short_cluster_takes_next_value(command: &Command, shorts: &str) -> Option<bool> {
  let mut shorts = shorts.chars();

  while let Some(short) = shorts.next() {
    let arg = command
      .get_arguments()
      .find(|arg| arg.get_short() == Some(short))?;

    if arg.get_action().takes_values() {
      return Some(shorts.as_str().is_empty());
    }
  }

  Some(false)
}

impl Default for ClapArgs {
  fn default() -> Self {
    Self::new()
  }
}
