// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for API timestamp parsing, "now" resolution, duration formatting, and man page rendering
// role: utilities/helpers
// inputs: Timestamp strings; optional now override; chrono Durations; clap CommandFactory
// outputs: UTC DateTimes, human duration strings, man page text
// side_effects: None
// invariants:
// - parse_api_timestamp never panics; unparseable input yields None
// - format_duration is stable and locale-independent
// errors: render_man_page surfaces IO errors from clap_mangen
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use clap::CommandFactory;

/// Wire format used by the GitHub REST API for every timestamp field.
pub const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse an API timestamp. Accepts the fixed `YYYY-MM-DDTHH:MM:SSZ` form and
/// falls back to general RFC3339 (offsets, fractional seconds).
pub fn parse_api_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(raw, API_TIMESTAMP_FORMAT)
    .map(|ndt| ndt.and_utc())
    .ok()
    .or_else(|| {
      DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
    })
}

/// Parse a calendar date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Parse a `--now-override` string into a UTC DateTime.
/// Accepts RFC3339 or a naive `%Y-%m-%dT%H:%M:%S` timestamp taken as UTC.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Utc>> {
  s.and_then(|raw| {
    parse_api_timestamp(raw).or_else(|| {
      NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|ndt| ndt.and_utc())
    })
  })
}

/// Returns the effective "now" given an optional override.
///
/// When `override_now` is `Some`, that instant is returned; otherwise
/// the current UTC time is used. Centralizes our handling of test
/// determinism without sprinkling `Utc::now()` throughout the code.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// Render a duration as `Nd Nh Nm`, keeping the sign for negative values.
pub fn format_duration(d: Duration) -> String {
  let sign = if d < Duration::zero() { "-" } else { "" };
  let secs = d.num_seconds().unsigned_abs();
  let days = secs / 86_400;
  let hours = (secs % 86_400) / 3_600;
  let minutes = (secs % 3_600) / 60;

  format!("{sign}{days}d {hours}h {minutes}m")
}

/// Render an optional duration; absent values print as `n/a`, never `0`.
pub fn format_opt_duration(d: Option<Duration>) -> String {
  d.map(format_duration).unwrap_or_else(|| "n/a".to_string())
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
