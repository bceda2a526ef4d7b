// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed listings over the paginator: org repos, branch commits, PRs, and per-PR commits/comments/reviews
// role: github/endpoints
// inputs: GithubApi, org/repo names, target branch, Window + now
// outputs: Vec of model records in API order
// side_effects: Network calls via GithubApi only
// invariants:
// - PR listings use the stale-page policy and request newest-first order; every other listing is exhausted
// - Records are typed once here; aggregation never touches raw JSON
// errors: Propagated from fetch_pages with the endpoint as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::github::api::GithubApi;
use crate::github::paginate::{PageRequest, StopPolicy, fetch_pages};
use crate::model::{Comment, Commit, PullRequest, Repository, Review};
use crate::window::Window;

const PER_PAGE: &str = "100";

/// PR `state` filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PullState {
  Closed,
  All,
}

impl PullState {
  fn as_str(self) -> &'static str {
    match self {
      PullState::Closed => "closed",
      PullState::All => "all",
    }
  }
}

fn iso(ts: DateTime<Utc>) -> String {
  ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Repository names in the organization. Entries without a name are skipped.
pub fn list_org_repos(api: &dyn GithubApi, org: &str) -> Result<Vec<String>> {
  let req = PageRequest::new(format!("/orgs/{org}/repos")).param("per_page", PER_PAGE);
  let set = fetch_pages(api, &req, StopPolicy::Exhaust).with_context(|| format!("listing repositories of {org}"))?;

  Ok(set.records().filter_map(|r| Repository::from_json(r).name).collect())
}

/// Commits reachable from `branch`, narrowed server-side by `since` only; `Window::includes` decides.
pub fn list_commits(
  api: &dyn GithubApi,
  org: &str,
  repo: &str,
  branch: &str,
  window: &Window,
  now: DateTime<Utc>,
) -> Result<Vec<Commit>> {
  let req = PageRequest::new(format!("/repos/{org}/{repo}/commits"))
    .param("per_page", PER_PAGE)
    .param("sha", branch)
    .param("since", iso(window.since(now)));

  let set = fetch_pages(api, &req, StopPolicy::Exhaust).with_context(|| format!("listing commits of {org}/{repo}"))?;

  Ok(set.records().map(Commit::from_json).collect())
}

/// Pull requests targeting `base`, newest first, stopping once pages fall out of the window.
pub fn list_pulls(
  api: &dyn GithubApi,
  org: &str,
  repo: &str,
  state: PullState,
  base: &str,
  window: &Window,
  now: DateTime<Utc>,
) -> Result<Vec<PullRequest>> {
  let req = PageRequest::new(format!("/repos/{org}/{repo}/pulls"))
    .param("state", state.as_str())
    .param("base", base)
    .param("sort", "created")
    .param("direction", "desc")
    .param("per_page", PER_PAGE);
  let policy = StopPolicy::StaleAfter {
    max_days: window.stale_after_days(now),
    now,
  };

  let set = fetch_pages(api, &req, policy).with_context(|| format!("listing pull requests of {org}/{repo}"))?;
  tracing::debug!(repo, pages = set.page_count(), "pull request pages");

  Ok(set.records().map(PullRequest::from_json).collect())
}

pub fn list_pull_commits(api: &dyn GithubApi, org: &str, repo: &str, number: i64) -> Result<Vec<Commit>> {
  let req = PageRequest::new(format!("/repos/{org}/{repo}/pulls/{number}/commits")).param("per_page", PER_PAGE);
  let set = fetch_pages(api, &req, StopPolicy::Exhaust).with_context(|| format!("listing commits of {org}/{repo}#{number}"))?;

  Ok(set.records().map(Commit::from_json).collect())
}

pub fn list_pull_comments(api: &dyn GithubApi, org: &str, repo: &str, number: i64) -> Result<Vec<Comment>> {
  let req = PageRequest::new(format!("/repos/{org}/{repo}/pulls/{number}/comments")).param("per_page", PER_PAGE);
  let set = fetch_pages(api, &req, StopPolicy::Exhaust).with_context(|| format!("listing comments of {org}/{repo}#{number}"))?;

  Ok(set.records().map(|r| Comment::from_json(r, number)).collect())
}

pub fn list_pull_reviews(api: &dyn GithubApi, org: &str, repo: &str, number: i64) -> Result<Vec<Review>> {
  let req = PageRequest::new(format!("/repos/{org}/{repo}/pulls/{number}/reviews")).param("per_page", PER_PAGE);
  let set = fetch_pages(api, &req, StopPolicy::Exhaust).with_context(|| format!("listing reviews of {org}/{repo}#{number}"))?;

  Ok(set.records().map(|r| Review::from_json(r, number)).collect())
}
