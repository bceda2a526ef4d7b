// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed upstream records (repos, commits, PRs, comments, reviews) built once from API JSON
// role: model/types
// inputs: serde_json::Value records as returned by the GitHub REST API
// outputs: Structs whose identity/timestamp fields are Option; absence is a first-class state
// invariants:
// - Ingestion never fails: missing or malformed fields become None
// - No field is defaulted or fabricated (no empty-string logins, no epoch timestamps)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Duration, Utc};
use serde::Serializer;

use crate::ext::serde_json::JsonFetch;

/// Serialize an optional duration as whole seconds, `null` when absent.
pub fn ser_opt_secs<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
  match d {
    Some(d) => s.serialize_some(&d.num_seconds()),
    None => s.serialize_none(),
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
  pub name: Option<String>,
}

impl Repository {
  pub fn from_json(v: &serde_json::Value) -> Self {
    Self {
      name: v.fetch("name").to::<String>(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
  pub sha: Option<String>,
  /// Account login; GitHub omits it for commits not linked to an account.
  pub author_login: Option<String>,
  /// `commit.author.date`, i.e. when the change was authored.
  pub authored_at: Option<DateTime<Utc>>,
}

impl Commit {
  pub fn from_json(v: &serde_json::Value) -> Self {
    Self {
      sha: v.fetch("sha").to::<String>(),
      author_login: v.fetch("author.login").to::<String>(),
      authored_at: v.fetch("commit.author.date").to_timestamp(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
  pub number: Option<i64>,
  pub author_login: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
  pub merged_at: Option<DateTime<Utc>>,
  pub closed_at: Option<DateTime<Utc>>,
  /// Source branch (`head.ref`).
  pub head_ref: Option<String>,
}

impl PullRequest {
  pub fn from_json(v: &serde_json::Value) -> Self {
    Self {
      number: v.fetch("number").to::<i64>(),
      author_login: v.fetch("user.login").to::<String>(),
      created_at: v.fetch("created_at").to_timestamp(),
      merged_at: v.fetch("merged_at").to_timestamp(),
      closed_at: v.fetch("closed_at").to_timestamp(),
      head_ref: v.fetch("head.ref").to::<String>(),
    }
  }

  /// Case-insensitive substring match on the source branch. PRs without a ref never match.
  pub fn head_ref_contains(&self, needle: &str) -> bool {
    let needle = needle.to_lowercase();

    self
      .head_ref
      .as_deref()
      .map(|r| r.to_lowercase().contains(&needle))
      .unwrap_or(false)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
  pub pull_number: Option<i64>,
  pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
  /// `pull_number` comes from the request, since comment payloads only carry a URL back to the PR.
  pub fn from_json(v: &serde_json::Value, pull_number: i64) -> Self {
    Self {
      pull_number: Some(pull_number),
      created_at: v.fetch("created_at").to_timestamp(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
  pub pull_number: Option<i64>,
  /// Pending reviews have no `submitted_at`.
  pub submitted_at: Option<DateTime<Utc>>,
  pub state: Option<String>,
}

impl Review {
  pub fn from_json(v: &serde_json::Value, pull_number: i64) -> Self {
    Self {
      pull_number: Some(pull_number),
      submitted_at: v.fetch("submitted_at").to_timestamp(),
      state: v.fetch("state").to::<String>(),
    }
  }

  pub fn is_approval(&self) -> bool {
    self
      .state
      .as_deref()
      .map(|s| s.eq_ignore_ascii_case("APPROVED"))
      .unwrap_or(false)
  }
}
