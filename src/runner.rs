// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate a run: resolve repositories, process each on a bounded pool, assemble the Report
// role: processing/orchestrator
// inputs: GithubApi, EffectiveConfig, now
// outputs: Report (per-repo results, lead times, failed repositories)
// side_effects: Network calls via GithubApi; tracing events per repository
// invariants:
// - Repositories are independent; a failure in one never aborts the others
// - Results keep the resolved repository order regardless of --jobs
// - Lead-time repositories without samples are omitted, not reported as zero
// errors: Listing the org's repositories or building the pool is fatal; per-repo errors land in `failed`
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;

use crate::cli::{EffectiveConfig, Mode};
use crate::github::api::GithubApi;
use crate::github::endpoints::{PullState, list_commits, list_org_repos, list_pulls};
use crate::metrics::engineers::EngineerStats;
use crate::metrics::lead_time::{LeadTime, LeadTimeQuery, lead_time_for_repo};
use crate::metrics::reviews::{RepoStats, repo_stats};
use crate::window::Window;

#[derive(Debug, Serialize)]
pub struct Report {
  pub org: String,
  pub mode: &'static str,
  pub window: Window,
  pub generated_at: DateTime<Utc>,
  pub repos: Vec<RepoReport>,
  pub lead_times: Vec<LeadTime>,
  pub failed: Vec<FailedRepo>,
}

#[derive(Debug, Serialize)]
pub struct RepoReport {
  pub repo: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub engineers: Option<EngineerStats>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reviews: Option<RepoStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRepo {
  pub repo: String,
  pub error: String,
}

/// What one repository produced.
#[derive(Debug)]
enum RepoOutcome {
  Engineers(EngineerStats),
  Reviews(RepoStats),
  LeadTime(Option<LeadTime>),
}

/// Explicit `--repo` values win over the org listing; `--exclude` applies to both.
pub fn resolve_repos(api: &dyn GithubApi, cfg: &EffectiveConfig) -> Result<Vec<String>> {
  let listed = if cfg.repos.is_empty() {
    list_org_repos(api, &cfg.org)?
  } else {
    cfg.repos.clone()
  };

  let repos: Vec<String> = listed.into_iter().filter(|r| !cfg.exclude.contains(r)).collect();
  tracing::info!(org = %cfg.org, count = repos.len(), "repositories to process");

  Ok(repos)
}

fn run_repo(api: &dyn GithubApi, cfg: &EffectiveConfig, repo: &str, now: DateTime<Utc>) -> Result<RepoOutcome> {
  let org = cfg.org.as_str();
  let branch = cfg.target_branch.as_str();
  let window = &cfg.window;

  match &cfg.mode {
    Mode::Engineers { .. } => {
      let mut stats = EngineerStats::new();
      let commits = list_commits(api, org, repo, branch, window, now)?;
      stats.fold_commits(&commits, window, now);
      let prs = list_pulls(api, org, repo, PullState::All, branch, window, now)?;
      stats.fold_pulls(&prs, window, now);
      Ok(RepoOutcome::Engineers(stats))
    }
    Mode::Reviews { ref_string } => {
      let prs: Vec<_> = list_pulls(api, org, repo, PullState::Closed, branch, window, now)?
        .into_iter()
        .filter(|pr| window.includes(pr.created_at, now))
        .filter(|pr| ref_string.as_deref().map_or(true, |needle| pr.head_ref_contains(needle)))
        .collect();
      Ok(RepoOutcome::Reviews(repo_stats(api, org, repo, &prs)?))
    }
    Mode::LeadTime { ref_string } => {
      let prs = list_pulls(api, org, repo, PullState::Closed, branch, window, now)?;
      let query = LeadTimeQuery { org, repo, ref_string: ref_string.as_str(), window, now };
      Ok(RepoOutcome::LeadTime(lead_time_for_repo(api, &query, &prs)?))
    }
  }
}

pub fn run(api: &dyn GithubApi, cfg: &EffectiveConfig, now: DateTime<Utc>) -> Result<Report> {
  let repos = resolve_repos(api, cfg)?;

  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(cfg.jobs)
    .build()
    .context("building repository worker pool")?;

  let outcomes: Vec<(String, Result<RepoOutcome>)> = pool.install(|| {
    repos
      .par_iter()
      .map(|repo| {
        tracing::info!(repo = %repo, mode = cfg.mode.name(), "processing repository");
        let res = run_repo(api, cfg, repo, now).with_context(|| format!("repository {}/{}", cfg.org, repo));
        (repo.clone(), res)
      })
      .collect()
  });

  let mut report = Report {
    org: cfg.org.clone(),
    mode: cfg.mode.name(),
    window: cfg.window.clone(),
    generated_at: now,
    repos: Vec::new(),
    lead_times: Vec::new(),
    failed: Vec::new(),
  };

  for (repo, res) in outcomes {
    match res {
      Ok(RepoOutcome::Engineers(stats)) => report.repos.push(RepoReport {
        repo,
        engineers: Some(stats),
        reviews: None,
      }),
      Ok(RepoOutcome::Reviews(stats)) => report.repos.push(RepoReport {
        repo,
        engineers: None,
        reviews: Some(stats),
      }),
      Ok(RepoOutcome::LeadTime(Some(lt))) => report.lead_times.push(lt),
      Ok(RepoOutcome::LeadTime(None)) => {
        tracing::debug!(repo = %repo, "no lead time samples; omitted");
      }
      Err(err) => {
        tracing::warn!(repo = %repo, error = %format!("{err:#}"), "repository failed");
        report.failed.push(FailedRepo {
          repo,
          error: format!("{err:#}"),
        });
      }
    }
  }

  Ok(report)
}
