// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Per-repository review latency: time to first response, discussion gaps, approval latency
// role: metrics/reviews
// inputs: GithubApi (per-PR comment and review listings), repo, PullRequest records
// outputs: RepoStats with p90/mean/max per collection ("no data" when empty)
// side_effects: Network calls via GithubApi (two paginated listings per PR)
// invariants:
// - Comment and review events are merged and ordered by timestamp before gaps are measured
// - Events without a timestamp and PRs without created_at contribute no samples
// - total_prs counts PRs considered, not PRs that received a response
// errors: Listing failures propagate (the repository is failed by the caller)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::github::api::GithubApi;
use crate::github::endpoints::{list_pull_comments, list_pull_reviews};
use crate::model::{Comment, PullRequest, Review};
use crate::stats::DurationSummary;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoStats {
  pub total_prs: usize,
  pub time_to_first_response: DurationSummary,
  pub discussion: DurationSummary,
  pub approval: DurationSummary,
}

/// Raw latency samples gathered across the PRs of one repository.
#[derive(Debug, Default)]
struct LatencySamples {
  ttfr: Vec<Duration>,
  discussion: Vec<Duration>,
  approval: Vec<Duration>,
}

impl LatencySamples {
  fn add_pull(&mut self, created: DateTime<Utc>, comments: &[Comment], reviews: &[Review]) {
    let mut events: Vec<DateTime<Utc>> = Vec::with_capacity(comments.len() + reviews.len());

    for comment in comments {
      match comment.created_at {
        Some(at) => events.push(at),
        None => tracing::debug!(pull = ?comment.pull_number, "skipping comment without created_at"),
      }
    }
    for review in reviews {
      match review.submitted_at {
        Some(at) => events.push(at),
        None => tracing::debug!(pull = ?review.pull_number, state = ?review.state, "skipping unsubmitted review"),
      }
    }
    events.sort();

    let mut prev: Option<DateTime<Utc>> = None;

    for at in events {
      match prev {
        None => self.ttfr.push(at - created),
        Some(p) => self.discussion.push(at - p),
      }
      prev = Some(at);
    }

    for review in reviews.iter().filter(|r| r.is_approval()) {
      if let Some(at) = review.submitted_at {
        self.approval.push(at - created);
      }
    }
  }

  fn summarize(&self, total_prs: usize) -> RepoStats {
    RepoStats {
      total_prs,
      time_to_first_response: DurationSummary::from_samples(&self.ttfr),
      discussion: DurationSummary::from_samples(&self.discussion),
      approval: DurationSummary::from_samples(&self.approval),
    }
  }
}

pub fn repo_stats(api: &dyn GithubApi, org: &str, repo: &str, prs: &[PullRequest]) -> Result<RepoStats> {
  let mut samples = LatencySamples::default();

  for pr in prs {
    let (Some(number), Some(created)) = (pr.number, pr.created_at) else {
      tracing::debug!(repo, number = ?pr.number, "skipping pull request without number or created_at");
      continue;
    };

    let comments = list_pull_comments(api, org, repo, number)?;
    let reviews = list_pull_reviews(api, org, repo, number)?;
    tracing::debug!(repo, number, comments = comments.len(), reviews = reviews.len(), "pull request discussion");

    samples.add_pull(created, &comments, &reviews);
  }

  Ok(samples.summarize(prs.len()))
}
