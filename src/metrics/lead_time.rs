// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Lead time for change: p90 of (PR merged_at - commit authored_at) over branch-matching merged PRs
// role: metrics/lead-time
// inputs: GithubApi (per-PR commit listings), repo, PullRequest records, branch substring, Window, now
// outputs: Option<LeadTime>; None when the repository has no qualifying commit deltas
// side_effects: Network calls via GithubApi (one paginated listing per matching PR)
// invariants:
// - Only merged, in-window PRs whose head ref contains the substring (case-insensitive) qualify
// - Commits without an authored timestamp are skipped
// - releases names only the branches whose PRs contributed at least one sample
// errors: Commit listing failures propagate (the repository is failed by the caller)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::github::api::GithubApi;
use crate::github::endpoints::list_pull_commits;
use crate::model::{PullRequest, ser_opt_secs};
use crate::stats;
use crate::window::Window;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadTime {
  pub repo: String,
  /// Lower-cased source branches of the PRs that contributed samples.
  pub releases: Vec<String>,
  pub samples: usize,
  #[serde(serialize_with = "ser_opt_secs", rename = "p90_seconds")]
  pub p90: Option<Duration>,
}

/// Query context shared by every PR of one repository.
pub struct LeadTimeQuery<'a> {
  pub org: &'a str,
  pub repo: &'a str,
  pub ref_string: &'a str,
  pub window: &'a Window,
  pub now: DateTime<Utc>,
}

pub fn lead_time_for_repo(api: &dyn GithubApi, q: &LeadTimeQuery<'_>, prs: &[PullRequest]) -> Result<Option<LeadTime>> {
  let mut deltas: Vec<Duration> = Vec::new();
  let mut releases: Vec<String> = Vec::new();

  for pr in prs {
    let (Some(number), Some(merged)) = (pr.number, pr.merged_at) else {
      continue;
    };
    if !q.window.includes(pr.created_at, q.now) || !pr.head_ref_contains(q.ref_string) {
      continue;
    }

    let head = pr.head_ref.as_deref().unwrap_or_default().to_lowercase();
    tracing::debug!(repo = q.repo, number, release = %head, "matched release branch");

    let before = deltas.len();
    for commit in list_pull_commits(api, q.org, q.repo, number)? {
      let Some(authored) = commit.authored_at else {
        tracing::debug!(repo = q.repo, number, sha = ?commit.sha, "skipping commit without a date");
        continue;
      };
      tracing::debug!(repo = q.repo, number, sha = ?commit.sha, author = ?commit.author_login, "lead time sample");
      deltas.push(merged - authored);
    }

    if deltas.len() > before {
      releases.push(head);
    }
  }

  if deltas.is_empty() {
    return Ok(None);
  }

  Ok(Some(LeadTime {
    repo: q.repo.to_string(),
    releases,
    samples: deltas.len(),
    p90: stats::quantile(&deltas, 0.90),
  }))
}
