use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::{parse_api_timestamp, parse_date};

// Windowing-related types live here to keep aggregation free of date math.

/// Date range that gates which records are aggregated. Both forms are closed intervals.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Window {
  /// `start <= ts <= end`
  Absolute { start: DateTime<Utc>, end: DateTime<Utc> },
  /// `(now - ts).days <= max_days`
  Relative { max_days: i64 },
}

impl Window {
  /// Decide inclusion for a record timestamp. A missing timestamp is never included.
  pub fn includes(&self, ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    let Some(ts) = ts else { return false };

    match self {
      Window::Absolute { start, end } => *start <= ts && ts <= *end,
      Window::Relative { max_days } => (now - ts).num_days() <= *max_days,
    }
  }

  /// Age (in whole days) past which a newest-first PR listing holds nothing
  /// this window can use. Drives the paginator's early stop.
  pub fn stale_after_days(&self, now: DateTime<Utc>) -> i64 {
    match self {
      Window::Relative { max_days } => *max_days,
      // +1 so the boundary day itself is never cut off by truncation
      Window::Absolute { start, .. } => (now - *start).num_days().max(0) + 1,
    }
  }

  /// Lower bound for server-side `since` narrowing. There is no upper bound: the API
  /// filters on committer date, which can fall after an in-window author date.
  pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
    match self {
      Window::Absolute { start, .. } => *start,
      // `num_days` truncates, so anything younger than max_days + 1 days passes `includes`
      Window::Relative { max_days } => now - Duration::days(*max_days + 1),
    }
  }

  /// Short human label for report headers.
  pub fn label(&self) -> String {
    match self {
      Window::Absolute { start, end } => format!(
        "{} .. {}",
        start.format("%Y-%m-%dT%H:%M:%SZ"),
        end.format("%Y-%m-%dT%H:%M:%SZ")
      ),
      Window::Relative { max_days } => format!("last {} days", max_days),
    }
  }
}

/// Which end of an absolute range a bound describes; date-only bounds expand to cover the whole day.
#[derive(Copy, Clone, Debug)]
enum BoundSide {
  Start,
  End,
}

fn parse_bound(raw: &str, side: BoundSide, flag: &str) -> Result<DateTime<Utc>> {
  if let Some(ts) = parse_api_timestamp(raw) {
    return Ok(ts);
  }

  let date: NaiveDate = parse_date(raw).with_context(|| {
    format!("invalid {flag} {raw:?}: expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ")
  })?;

  let time = match side {
    BoundSide::Start => NaiveTime::MIN,
    BoundSide::End => NaiveTime::from_hms_opt(23, 59, 59).context("end-of-day time")?,
  };

  Ok(date.and_time(time).and_utc())
}

/// Build an absolute window from `--start-date` / `--end-date` values.
pub fn absolute(start: &str, end: &str) -> Result<Window> {
  let start = parse_bound(start, BoundSide::Start, "--start-date")?;
  let end = parse_bound(end, BoundSide::End, "--end-date")?;

  if start > end {
    bail!("--start-date must not be after --end-date");
  }

  Ok(Window::Absolute { start, end })
}

/// Build a relative window from `--max-days`.
pub fn relative(max_days: i64) -> Result<Window> {
  if max_days < 0 {
    bail!("--max-days must be zero or positive");
  }

  Ok(Window::Relative { max_days })
}
