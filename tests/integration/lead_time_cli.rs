use predicates::prelude::*;
use test_support::{MockServer, Route, cmd_bin};

const NOW: &str = "2024-01-20T00:00:00Z";

fn routes() -> Vec<Route> {
  vec![
    Route::json("/orgs/acme/repos", r#"[{"name":"api"},{"name":"web"},{"name":"docs"}]"#),
    Route::json(
      "/repos/acme/api/pulls",
      r#"[{
        "number": 4,
        "user": {"login": "alice"},
        "created_at": "2024-01-09T00:00:00Z",
        "merged_at": "2024-01-10T00:00:00Z",
        "closed_at": "2024-01-10T00:00:00Z",
        "head": {"ref": "Release/1.0"}
      }]"#,
    ),
    Route::json(
      "/repos/acme/api/pulls/4/commits",
      r#"[{"sha": "a1", "author": {"login": "alice"}, "commit": {"author": {"date": "2024-01-07T00:00:00Z"}}}]"#,
    ),
    Route::json(
      "/repos/acme/web/pulls",
      r#"[{
        "number": 9,
        "created_at": "2024-01-12T00:00:00Z",
        "merged_at": "2024-01-13T00:00:00Z",
        "head": {"ref": "feature/login"}
      }]"#,
    ),
  ]
}

fn lead_time_args(server: &MockServer) -> Vec<String> {
  [
    "lead-time", "--ref-string", "release", "-o", "acme", "-t", "main", "--max-days", "30", "-e", "docs", "--now-override", NOW,
    "--api-url",
  ]
  .iter()
  .map(|s| s.to_string())
  .chain([server.url()])
  .collect()
}

#[test]
fn lead_time_json_reports_matching_repositories_only() {
  let server = MockServer::start(routes());

  let out = cmd_bin("eng-metrics")
    .args(lead_time_args(&server))
    .args(["--format", "json"])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["mode"], "lead-time");
  assert_eq!(v["window"]["max_days"], 30);
  assert_eq!(v["lead_times"].as_array().unwrap().len(), 1);
  assert_eq!(v["lead_times"][0]["repo"], "api");
  assert_eq!(v["lead_times"][0]["p90_seconds"], 3 * 86_400);
  assert_eq!(v["lead_times"][0]["releases"][0], "release/1.0");
  assert_eq!(v["failed"], serde_json::json!([]));

  let seen = server.requests();
  let pulls = seen.iter().find(|r| r.starts_with("/repos/acme/api/pulls?")).unwrap();
  assert!(pulls.contains("state=closed"), "{pulls}");
  assert!(pulls.contains("base=main"), "{pulls}");
  assert!(pulls.contains("sort=created"), "{pulls}");
  assert!(!seen.iter().any(|r| r.contains("/docs/")), "excluded repo was fetched");
  assert!(!seen.iter().any(|r| r.contains("/pulls/9/")), "non-matching PR was fetched");
}

#[test]
fn lead_time_text_summary() {
  let server = MockServer::start(routes());

  cmd_bin("eng-metrics")
    .args(lead_time_args(&server))
    .env("GITHUB_ACCESS_TOKEN", "t")
    .assert()
    .success()
    .stdout(predicate::str::contains("Results:"))
    .stdout(predicate::str::contains("---repo: api, lead_time (p90): 3d 0h 0m"))
    .stdout(predicate::str::contains("web").not());
}
