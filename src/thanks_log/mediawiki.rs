use super::{ThanksLogEntry, ThanksLogSource};
use crate::errors::AppError;
use crate::report_window::ReportWindow;
use app_config::AppConfig;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::instrument;
use url::Url;

const THANKS_LOG_TYPE: &str = "thanks";
const LOG_EVENT_PROPERTIES: &str = "ids|user|title|timestamp";

/// Reads the thanks log of a wiki through its `api.php` endpoint.
pub struct MediaWikiLogSource {
  client: reqwest::Client,
  api_url: Url,
  request_limit: String,
}

#[derive(Debug, serde::Deserialize)]
struct LogEventsResponse {
  error: Option<ApiError>,
  warnings: Option<Value>,
  #[serde(rename = "continue")]
  continuation: Option<Map<String, Value>>,
  query: Option<LogEventsQuery>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiError {
  code: String,
  #[serde(default)]
  info: String,
}

#[derive(Debug, serde::Deserialize)]
struct LogEventsQuery {
  #[serde(default)]
  logevents: Vec<LogEvent>,
}

/// Suppressed log events come back without a user or title.
#[derive(Debug, serde::Deserialize)]
struct LogEvent {
  logid: Option<u64>,
  user: Option<String>,
  title: Option<String>,
  timestamp: Option<String>,
}

impl MediaWikiLogSource {
  pub fn new(config: &AppConfig) -> Result<Self, AppError> {
    let api_url = Url::parse(config.api_url())?;
    let client = reqwest::Client::builder()
      .user_agent(config.user_agent())
      .build()?;

    Ok(Self {
      client,
      api_url,
      request_limit: config.request_limit().to_string(),
    })
  }

  pub fn api_url(&self) -> &Url {
    &self.api_url
  }
}

/// A single request against the `logevents` list.
trait LogEventsPages {
  async fn fetch_page(&self, parameters: &[(String, String)]) -> Result<LogEventsResponse, AppError>;
}

impl LogEventsPages for MediaWikiLogSource {
  async fn fetch_page(&self, parameters: &[(String, String)]) -> Result<LogEventsResponse, AppError> {
    let response = self
      .client
      .get(self.api_url.clone())
      .query(parameters)
      .send()
      .await?;

    check_response_status(response.status())?;

    let response_body = response.text().await?;

    Ok(serde_json::from_str(&response_body)?)
  }
}

impl ThanksLogSource for MediaWikiLogSource {
  #[instrument(skip_all, fields(api_url = %self.api_url, window = %window))]
  async fn thanks_events(&self, window: &ReportWindow) -> Result<Vec<ThanksLogEntry>, AppError> {
    collect_thanks_events(self, window, &self.request_limit).await
  }
}

/// Requests pages until the API stops handing out continuation values.
async fn collect_thanks_events<P: LogEventsPages>(
  pages: &P,
  window: &ReportWindow,
  request_limit: &str,
) -> Result<Vec<ThanksLogEntry>, AppError> {
  let base_parameters = thanks_query_parameters(window, request_limit);
  let mut parameters = base_parameters.clone();
  let mut thanks_events = vec![];
  let mut requests = 0;

  loop {
    let page = pages.fetch_page(&parameters).await?;
    let (entries, continuation) = read_page(page, window)?;
    requests += 1;

    tracing::debug!(
      "Received {} thanks log events in request {}.",
      entries.len(),
      requests
    );

    thanks_events.extend(entries);

    let Some(continuation) = continuation else {
      break;
    };

    parameters = continue_parameters(&base_parameters, &continuation);
  }

  tracing::info!(
    "Retrieved {} thanks log events for {} in {} requests.",
    thanks_events.len(),
    window,
    requests
  );

  Ok(thanks_events)
}

fn check_response_status(status: StatusCode) -> Result<(), AppError> {
  if !status.is_success() {
    return Err(AppError::FailedToQueryThanksLog(status));
  }

  Ok(())
}

/// The API walks the log from newest to oldest, so `lestart` takes the window's end.
fn thanks_query_parameters(window: &ReportWindow, request_limit: &str) -> Vec<(String, String)> {
  [
    ("action", "query".to_string()),
    ("list", "logevents".to_string()),
    ("letype", THANKS_LOG_TYPE.to_string()),
    ("leprop", LOG_EVENT_PROPERTIES.to_string()),
    ("lelimit", request_limit.to_string()),
    ("ledir", "older".to_string()),
    ("lestart", mediawiki_timestamp(&window.end())),
    ("leend", mediawiki_timestamp(&window.start())),
    ("format", "json".to_string()),
    ("formatversion", "2".to_string()),
  ]
  .into_iter()
  .map(|(key, value)| (key.to_string(), value))
  .collect()
}

/// e.g. `2016-08-01T00:00:00Z`
fn mediawiki_timestamp(timestamp: &DateTime<Utc>) -> String {
  timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The base query with the values of the `continue` object layered on top.
fn continue_parameters(
  base_parameters: &[(String, String)],
  continuation: &Map<String, Value>,
) -> Vec<(String, String)> {
  let mut parameters: Vec<(String, String)> = base_parameters
    .iter()
    .filter(|(key, _)| !continuation.contains_key(key))
    .cloned()
    .collect();

  parameters.extend(continuation.iter().map(|(key, value)| {
    let value = match value {
      Value::String(value) => value.clone(),
      value => value.to_string(),
    };

    (key.clone(), value)
  }));

  parameters
}

/// Returns the entries of the page that fall inside of the window, along with the
/// continuation values if there's another page to request.
///
/// `lestart` and `leend` are both inclusive, so events stamped at the window's end are dropped here.
fn read_page(
  page: LogEventsResponse,
  window: &ReportWindow,
) -> Result<(Vec<ThanksLogEntry>, Option<Map<String, Value>>), AppError> {
  if let Some(error) = page.error {
    return Err(AppError::MediaWikiApiError {
      code: error.code,
      info: error.info,
    });
  }

  if let Some(warnings) = &page.warnings {
    tracing::warn!("The MediaWiki API responded with warnings: {}", warnings);
  }

  let log_events = page.query.map(|query| query.logevents).unwrap_or_default();
  let mut entries = Vec::with_capacity(log_events.len());

  for log_event in log_events {
    let log_id = log_event.logid;
    let (Some(user), Some(title), Some(timestamp)) =
      (log_event.user, log_event.title, log_event.timestamp)
    else {
      tracing::debug!("Skipping log event {:?} with hidden details.", log_id);
      continue;
    };

    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
      .map_err(|_| AppError::InvalidLogTimestamp(timestamp.clone()))?
      .with_timezone(&Utc);

    if !window.contains(&timestamp) {
      tracing::debug!("Skipping log event {:?} outside of {}.", log_id, window);
      continue;
    }

    entries.push(ThanksLogEntry::new(user, strip_namespace(&title), timestamp));
  }

  Ok((entries, page.continuation))
}

/// Thanks are logged against the recipient's user page. e.g. `User:Koavf`
fn strip_namespace(title: &str) -> &str {
  title
    .split_once(':')
    .map(|(_, user_name)| user_name)
    .unwrap_or(title)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use serde_json::json;
  use std::cell::RefCell;
  use std::collections::VecDeque;

  /// Hands out canned responses in order and remembers what each request asked for.
  struct CannedPages {
    responses: RefCell<VecDeque<Value>>,
    requests: RefCell<Vec<Vec<(String, String)>>>,
  }

  impl CannedPages {
    fn new(responses: Vec<Value>) -> Self {
      Self {
        responses: RefCell::new(responses.into()),
        requests: RefCell::new(vec![]),
      }
    }
  }

  impl LogEventsPages for CannedPages {
    async fn fetch_page(&self, parameters: &[(String, String)]) -> Result<LogEventsResponse, AppError> {
      self.requests.borrow_mut().push(parameters.to_vec());

      let response = self
        .responses
        .borrow_mut()
        .pop_front()
        .expect("requested more pages than were given");

      Ok(serde_json::from_value(response)?)
    }
  }

  fn thank(log_id: u64, user: &str, title: &str, timestamp: &str) -> Value {
    json!({
      "logid": log_id,
      "ns": 2,
      "title": title,
      "type": "thanks",
      "action": "thank",
      "user": user,
      "timestamp": timestamp
    })
  }

  fn august_2016() -> ReportWindow {
    ReportWindow::new(2016, 8).unwrap()
  }

  fn parameter<'a>(parameters: &'a [(String, String)], key: &str) -> Option<&'a str> {
    parameters
      .iter()
      .find(|(parameter_key, _)| parameter_key == key)
      .map(|(_, value)| value.as_str())
  }

  #[test]
  fn query_walks_the_window_from_newest_to_oldest() {
    let parameters = thanks_query_parameters(&august_2016(), "max");

    assert_eq!(parameter(&parameters, "letype"), Some("thanks"));
    assert_eq!(parameter(&parameters, "ledir"), Some("older"));
    assert_eq!(parameter(&parameters, "lestart"), Some("2016-09-01T00:00:00Z"));
    assert_eq!(parameter(&parameters, "leend"), Some("2016-08-01T00:00:00Z"));
    assert_eq!(parameter(&parameters, "lelimit"), Some("max"));
    assert_eq!(parameter(&parameters, "formatversion"), Some("2"));
  }

  #[test]
  fn continuation_values_replace_base_parameters() {
    let base_parameters = thanks_query_parameters(&august_2016(), "500");
    let continuation = json!({
      "lecontinue": "20160815120000|12345",
      "continue": "-||",
    });
    let Value::Object(continuation) = continuation else {
      unreachable!()
    };

    let parameters = continue_parameters(&base_parameters, &continuation);

    assert_eq!(
      parameter(&parameters, "lecontinue"),
      Some("20160815120000|12345")
    );
    assert_eq!(parameter(&parameters, "continue"), Some("-||"));
    assert_eq!(parameter(&parameters, "lestart"), Some("2016-09-01T00:00:00Z"));
    assert_eq!(parameters.len(), base_parameters.len() + 2);
  }

  #[test]
  fn page_entries_have_namespaces_stripped() {
    let page: LogEventsResponse = serde_json::from_value(json!({
      "batchcomplete": true,
      "continue": { "lecontinue": "20160802000000|2", "continue": "-||" },
      "query": {
        "logevents": [
          {
            "logid": 3,
            "ns": 2,
            "title": "User:Koavf",
            "type": "thanks",
            "action": "thank",
            "user": "Romaine",
            "timestamp": "2016-08-03T10:15:00Z"
          },
          {
            "logid": 2,
            "ns": 2,
            "title": "User:Loreen.Ruiz",
            "type": "thanks",
            "action": "thank",
            "user": "Msannakoval",
            "timestamp": "2016-08-02T08:00:00Z"
          }
        ]
      }
    }))
    .unwrap();

    let (entries, continuation) = read_page(page, &august_2016()).unwrap();

    assert_eq!(
      entries,
      vec![
        ThanksLogEntry::new(
          "Romaine",
          "Koavf",
          Utc.with_ymd_and_hms(2016, 8, 3, 10, 15, 0).unwrap()
        ),
        ThanksLogEntry::new(
          "Msannakoval",
          "Loreen.Ruiz",
          Utc.with_ymd_and_hms(2016, 8, 2, 8, 0, 0).unwrap()
        ),
      ]
    );
    assert!(continuation.unwrap().contains_key("lecontinue"));
  }

  #[test]
  fn hidden_and_out_of_window_events_are_skipped() {
    let page: LogEventsResponse = serde_json::from_value(json!({
      "query": {
        "logevents": [
          { "logid": 9, "title": "User:Ijon", "userhidden": true, "timestamp": "2016-08-20T00:00:00Z" },
          { "logid": 8, "user": "Halibutt", "actionhidden": true, "timestamp": "2016-08-19T00:00:00Z" },
          { "logid": 7, "title": "User:Ijon", "user": "Halibutt", "timestamp": "2016-09-01T00:00:00Z" },
          { "logid": 6, "title": "User:Ijon", "user": "Halibutt", "timestamp": "2016-08-01T00:00:00Z" }
        ]
      }
    }))
    .unwrap();

    let (entries, continuation) = read_page(page, &august_2016()).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].actor(), "Halibutt");
    assert_eq!(entries[0].target(), "Ijon");
    assert!(continuation.is_none());
  }

  #[test]
  fn api_errors_are_returned() {
    let page: LogEventsResponse = serde_json::from_value(json!({
      "error": {
        "code": "badvalue",
        "info": "Unrecognized value for parameter \"letype\": thanks."
      }
    }))
    .unwrap();

    let result = read_page(page, &august_2016());

    assert!(matches!(
      result,
      Err(AppError::MediaWikiApiError { code, .. }) if code == "badvalue"
    ));
  }

  #[test]
  fn unparsable_timestamps_are_errors() {
    let page: LogEventsResponse = serde_json::from_value(json!({
      "query": {
        "logevents": [
          { "logid": 1, "title": "User:Ijon", "user": "Halibutt", "timestamp": "yesterday" }
        ]
      }
    }))
    .unwrap();

    let result = read_page(page, &august_2016());

    assert!(matches!(result, Err(AppError::InvalidLogTimestamp(value)) if value == "yesterday"));
  }

  #[test]
  fn empty_query_has_no_entries() {
    let page: LogEventsResponse =
      serde_json::from_value(json!({ "batchcomplete": true, "query": { "logevents": [] } }))
        .unwrap();

    let (entries, continuation) = read_page(page, &august_2016()).unwrap();

    assert!(entries.is_empty());
    assert!(continuation.is_none());
  }

  #[test]
  fn titles_without_a_namespace_are_kept() {
    assert_eq!(strip_namespace("User:TFlanagan-WMF"), "TFlanagan-WMF");
    assert_eq!(strip_namespace("Benutzer:Léna"), "Léna");
    assert_eq!(strip_namespace("Koavf"), "Koavf");
  }

  #[tokio::test]
  async fn continuation_is_followed_until_the_last_page() {
    let pages = CannedPages::new(vec![
      json!({
        "continue": { "lecontinue": "20160815000000|5", "continue": "-||" },
        "query": { "logevents": [
          thank(7, "Romaine", "User:Koavf", "2016-08-20T00:00:00Z"),
          thank(6, "Joalpe", "User:Koavf", "2016-08-16T00:00:00Z")
        ] }
      }),
      json!({
        "batchcomplete": true,
        "query": { "logevents": [
          thank(5, "Romaine", "User:Andycyca", "2016-08-15T00:00:00Z")
        ] }
      }),
    ]);

    let entries = collect_thanks_events(&pages, &august_2016(), "2")
      .await
      .unwrap();

    let actors: Vec<&str> = entries.iter().map(ThanksLogEntry::actor).collect();
    assert_eq!(actors, ["Romaine", "Joalpe", "Romaine"]);
    assert_eq!(entries[2].target(), "Andycyca");

    let requests = pages.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert_eq!(parameter(&requests[0], "lecontinue"), None);
    assert_eq!(parameter(&requests[0], "lelimit"), Some("2"));
    assert_eq!(
      parameter(&requests[1], "lecontinue"),
      Some("20160815000000|5")
    );
    assert_eq!(parameter(&requests[1], "letype"), Some("thanks"));
  }

  #[tokio::test]
  async fn errors_on_a_later_page_stop_the_collection() {
    let pages = CannedPages::new(vec![
      json!({
        "continue": { "lecontinue": "20160815000000|5", "continue": "-||" },
        "query": { "logevents": [thank(7, "Romaine", "User:Koavf", "2016-08-20T00:00:00Z")] }
      }),
      json!({ "error": { "code": "ratelimited", "info": "You've exceeded your rate limit." } }),
    ]);

    let result = collect_thanks_events(&pages, &august_2016(), "max").await;

    assert!(matches!(
      result,
      Err(AppError::MediaWikiApiError { code, .. }) if code == "ratelimited"
    ));
    assert_eq!(pages.requests.borrow().len(), 2);
  }

  #[test]
  fn unsuccessful_responses_are_errors() {
    assert!(check_response_status(StatusCode::OK).is_ok());
    assert!(matches!(
      check_response_status(StatusCode::SERVICE_UNAVAILABLE),
      Err(AppError::FailedToQueryThanksLog(status)) if status == StatusCode::SERVICE_UNAVAILABLE
    ));
  }
}
