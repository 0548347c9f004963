use crate::errors::AppError;
use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};

/// The calendar month a report covers, as the half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
  year: i32,
  month: u32,
  start: DateTime<Utc>,
  end: DateTime<Utc>,
}

impl ReportWindow {
  pub fn new(year: i32, month: u32) -> Result<Self, AppError> {
    if month == 0 || month > 12 {
      return Err(AppError::InvalidMonthValue(month));
    }

    let Some(first_of_month) = NaiveDate::from_ymd_opt(year, month, 1) else {
      return Err(AppError::InvalidYearValue(year));
    };
    let Some(first_of_next_month) = first_of_month.checked_add_months(Months::new(1)) else {
      return Err(AppError::InvalidYearValue(year));
    };

    let start = DateTime::<Utc>::from_naive_utc_and_offset(first_of_month.and_time(NaiveTime::MIN), Utc);
    let end =
      DateTime::<Utc>::from_naive_utc_and_offset(first_of_next_month.and_time(NaiveTime::MIN), Utc);

    Ok(Self {
      year,
      month,
      start,
      end,
    })
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  pub fn month(&self) -> u32 {
    self.month
  }

  /// The first instant of the month.
  pub fn start(&self) -> DateTime<Utc> {
    self.start
  }

  /// The first instant of the following month, which is not part of the window.
  pub fn end(&self) -> DateTime<Utc> {
    self.end
  }

  pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
    self.start <= *timestamp && *timestamp < self.end
  }
}

/// Formats as the month's name followed by the year. e.g. `August 2016`
impl std::fmt::Display for ReportWindow {
  fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(formatter, "{}", self.start.format("%B %Y"))
  }
}
