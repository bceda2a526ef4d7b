// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Quantile/mean/max/min over duration samples with an explicit "no data" result
// role: metrics/statistics
// inputs: Slices of chrono::Duration (any order, any sign)
// outputs: Option<Duration>; DurationSummary bundles p90/mean/max
// invariants:
// - Empty input yields None for every statistic, never zero
// - quantile(s, 0.0) == min(s) and quantile(s, 1.0) == max(s)
// - Linear interpolation at rank q * (n - 1) over sorted samples, millisecond resolution
// errors: None; q outside [0, 1] is clamped
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::Duration;
use serde::Serialize;

use crate::model::ser_opt_secs;

fn sorted_millis(samples: &[Duration]) -> Vec<i64> {
  let mut ms: Vec<i64> = samples.iter().map(|d| d.num_milliseconds()).collect();
  ms.sort_unstable();
  ms
}

/// Linear-interpolation quantile. `None` when there are no samples.
pub fn quantile(samples: &[Duration], q: f64) -> Option<Duration> {
  let sorted = sorted_millis(samples);

  if sorted.is_empty() {
    return None;
  }
  if sorted.len() == 1 {
    return Some(Duration::milliseconds(sorted[0]));
  }

  let q = if q.is_nan() { 0.0 } else { q.clamp(0.0, 1.0) };
  let rank = q * (sorted.len() - 1) as f64;
  let lower = rank.floor() as usize;
  let upper = rank.ceil() as usize;

  if lower == upper {
    return Some(Duration::milliseconds(sorted[lower]));
  }

  // Interpolate on the gap so exact ranks never pick up float error.
  let weight = rank - lower as f64;
  let gap = (sorted[upper] - sorted[lower]) as f64;
  let value = sorted[lower] + (gap * weight).round() as i64;

  Some(Duration::milliseconds(value))
}

/// Arithmetic mean, rounded to the millisecond.
pub fn mean(samples: &[Duration]) -> Option<Duration> {
  if samples.is_empty() {
    return None;
  }

  let total: i128 = samples.iter().map(|d| d.num_milliseconds() as i128).sum();
  let avg = (total as f64 / samples.len() as f64).round() as i64;

  Some(Duration::milliseconds(avg))
}

pub fn max(samples: &[Duration]) -> Option<Duration> {
  samples.iter().copied().max()
}

#[cfg(test)]
pub fn min(samples: &[Duration]) -> Option<Duration> {
  samples.iter().copied().min()
}

/// p90 / mean / max of one sample collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DurationSummary {
  #[serde(serialize_with = "ser_opt_secs", rename = "p90_seconds")]
  pub p90: Option<Duration>,
  #[serde(serialize_with = "ser_opt_secs", rename = "mean_seconds")]
  pub mean: Option<Duration>,
  #[serde(serialize_with = "ser_opt_secs", rename = "max_seconds")]
  pub max: Option<Duration>,
}

impl DurationSummary {
  pub fn from_samples(samples: &[Duration]) -> Self {
    Self {
      p90: quantile(samples, 0.90),
      mean: mean(samples),
      max: max(samples),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.p90.is_none() && self.mean.is_none() && self.max.is_none()
  }
}
