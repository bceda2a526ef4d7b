// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fold commits and pull requests into per-engineer counters and p90 time-to-merge
// role: metrics/engineers
// inputs: Typed Commit / PullRequest records, Window, now
// outputs: EngineerStats (login -> EngineerRecord), mutated in place
// invariants:
// - Folds only add engineers or increment counters; prior counts are never overwritten
// - Records without a login or in-window timestamp are skipped, never counted as zero
// - p90_time_to_merge is None until the engineer has a merge sample
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::{Commit, PullRequest, ser_opt_secs};
use crate::stats;
use crate::window::Window;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineerRecord {
  pub commit_count: u64,
  pub pr_opened_count: u64,
  pub pr_merged_count: u64,
  pub pr_closed_count: u64,
  #[serde(serialize_with = "ser_opt_secs", rename = "p90_time_to_merge_seconds")]
  pub p90_time_to_merge: Option<Duration>,
}

/// Per-engineer statistics for one repository run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineerStats {
  #[serde(flatten)]
  engineers: BTreeMap<String, EngineerRecord>,
  #[serde(skip)]
  merge_samples: BTreeMap<String, Vec<Duration>>,
}

impl EngineerStats {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, login: &str) -> Option<&EngineerRecord> {
    self.engineers.get(login)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &EngineerRecord)> {
    self.engineers.iter()
  }

  pub fn len(&self) -> usize {
    self.engineers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.engineers.is_empty()
  }

  fn touch(&mut self, login: &str) -> &mut EngineerRecord {
    self.engineers.entry(login.to_string()).or_default()
  }

  /// Count in-window commits per author login.
  pub fn fold_commits<'a, I>(&mut self, commits: I, window: &Window, now: DateTime<Utc>)
  where
    I: IntoIterator<Item = &'a Commit>,
  {
    for commit in commits {
      let Some(login) = commit.author_login.as_deref() else {
        tracing::debug!(sha = ?commit.sha, "skipping commit without a linked account");
        continue;
      };

      if !window.includes(commit.authored_at, now) {
        continue;
      }

      self.touch(login).commit_count += 1;
    }
  }

  /// Count opened/merged/closed PRs per creator and collect time-to-merge samples,
  /// then refresh every engineer's p90 time-to-merge.
  pub fn fold_pulls<'a, I>(&mut self, prs: I, window: &Window, now: DateTime<Utc>)
  where
    I: IntoIterator<Item = &'a PullRequest>,
  {
    for pr in prs {
      if !window.includes(pr.created_at, now) {
        continue;
      }
      let (Some(login), Some(created)) = (pr.author_login.as_deref(), pr.created_at) else {
        tracing::debug!(number = ?pr.number, "skipping pull request without a creator");
        continue;
      };

      let record = self.touch(login);
      record.pr_opened_count += 1;

      if let Some(merged) = pr.merged_at {
        record.pr_merged_count += 1;
        self
          .merge_samples
          .entry(login.to_string())
          .or_default()
          .push(merged - created);
      } else if pr.closed_at.is_some() {
        record.pr_closed_count += 1;
      }
    }

    for (login, samples) in &self.merge_samples {
      if let Some(record) = self.engineers.get_mut(login) {
        record.p90_time_to_merge = stats::quantile(samples, 0.90);
      }
    }
  }
}
