// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub REST transport (one page per call), Link-header cursor parsing, and token discovery
// role: github/api
// inputs: API base URL; relative paths or absolute next-page URLs; env GITHUB_ACCESS_TOKEN/GITHUB_TOKEN/GH_TOKEN; optional `gh` CLI
// outputs: Page values (JSON array records + optional next URL)
// side_effects: Network calls to the configured API host; spawns `gh` subprocess for token fallback
// invariants:
// - Transport errors, non-2xx statuses, undecodable bodies and non-array bodies are all errors (never "no next page")
// - Token discovery prefers GITHUB_ACCESS_TOKEN, then GITHUB_TOKEN, GH_TOKEN, `gh auth token`; blank values are ignored
// errors: anyhow with the request URL as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;

use crate::github::paginate::Page;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Token environment variables, in precedence order.
const TOKEN_VARS: [&str; 3] = ["GITHUB_ACCESS_TOKEN", "GITHUB_TOKEN", "GH_TOKEN"];

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn get_github_token() -> Option<String> {
  for var in TOKEN_VARS {
    if let Ok(t) = std::env::var(var) {
      if !t.trim().is_empty() {
        return Some(t.trim().to_string());
      }
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header.
pub fn parse_next_link(header: &str) -> Option<String> {
  static RE_LINK: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r#"<([^>]+)>\s*;\s*rel="([^"]+)""#).unwrap());

  RE_LINK.captures_iter(header).find_map(|c| {
    let url = c.get(1)?.as_str();
    let rel = c.get(2)?.as_str();

    rel
      .split_whitespace()
      .any(|r| r.eq_ignore_ascii_case("next"))
      .then(|| url.to_string())
  })
}

fn json_kind(v: &serde_json::Value) -> &'static str {
  match v {
    serde_json::Value::Null => "null",
    serde_json::Value::Bool(_) => "a boolean",
    serde_json::Value::Number(_) => "a number",
    serde_json::Value::String(_) => "a string",
    serde_json::Value::Array(_) => "an array",
    serde_json::Value::Object(_) => "an object",
  }
}

// --- Trait seam for GitHub API ---
/// One paginated GET. `url` is either a path relative to the API root (first page)
/// or an absolute URL taken from a previous page's next link.
pub trait GithubApi: Send + Sync {
  fn get_page(&self, url: &str, query: &[(String, String)]) -> Result<Page>;
}

pub struct GithubHttpApi {
  agent: ureq::Agent,
  base_url: String,
  token: String,
}

impl GithubHttpApi {
  pub fn new(base_url: &str, token: String, timeout: Duration) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(timeout))
      .build()
      .into();

    Self {
      agent,
      base_url: base_url.trim_end_matches('/').to_string(),
      token,
    }
  }

  fn resolve(&self, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
      url.to_string()
    } else {
      format!("{}/{}", self.base_url, url.trim_start_matches('/'))
    }
  }
}

impl GithubApi for GithubHttpApi {
  fn get_page(&self, url: &str, query: &[(String, String)]) -> Result<Page> {
    let full = self.resolve(url);

    let mut req = self
      .agent
      .get(full.as_str())
      .header("Accept", "application/vnd.github+json")
      .header("X-GitHub-Api-Version", "2022-11-28")
      .header("User-Agent", "eng-metrics")
      .header("Authorization", &format!("Bearer {}", self.token));

    for (k, v) in query {
      req = req.query(k, v);
    }

    let mut resp = req.call().with_context(|| format!("GET {full}"))?;

    let next = resp
      .headers()
      .get("link")
      .and_then(|h| h.to_str().ok())
      .and_then(parse_next_link);

    let body: serde_json::Value = resp
      .body_mut()
      .read_json()
      .with_context(|| format!("decoding JSON from {full}"))?;

    let records = match body {
      serde_json::Value::Array(items) => items,
      other => bail!("expected a JSON array from {full}, got {}", json_kind(&other)),
    };

    tracing::debug!(url = %full, records = records.len(), has_next = next.is_some(), "fetched page");

    Ok(Page { records, next })
  }
}
