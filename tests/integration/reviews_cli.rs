use predicates::prelude::*;
use test_support::{MockServer, Route, cmd_bin};

const NOW: &str = "2024-01-20T00:00:00Z";

fn routes() -> Vec<Route> {
  vec![
    Route::json(
      "/repos/acme/api/pulls",
      r#"[
        {"number": 7, "created_at": "2024-01-10T00:00:00Z", "closed_at": "2024-01-11T00:00:00Z", "head": {"ref": "release/7"}},
        {"number": 8, "created_at": "2024-01-12T00:00:00Z", "closed_at": "2024-01-12T06:00:00Z", "head": {"ref": "feature/y"}}
      ]"#,
    ),
    Route::json(
      "/repos/acme/api/pulls/7/comments",
      r#"[{"created_at": "2024-01-10T01:00:00Z"}, {"created_at": "2024-01-10T05:00:00Z"}]"#,
    ),
    Route::json(
      "/repos/acme/api/pulls/7/reviews",
      r#"[{"state": "APPROVED", "submitted_at": "2024-01-10T03:00:00Z"}]"#,
    ),
    Route::json("/repos/acme/api/pulls/8/comments", "[]"),
    Route::json("/repos/acme/api/pulls/8/reviews", "[]"),
  ]
}

fn args(server: &MockServer) -> Vec<String> {
  ["reviews", "-o", "acme", "-t", "main", "-r", "api", "--start-date", "2024-01-01", "--end-date", "2024-01-15", "--api-url"]
    .iter()
    .map(|s| s.to_string())
    .chain([server.url(), "--now-override".to_string(), NOW.to_string()])
    .collect()
}

#[test]
fn reviews_json_latencies() {
  let server = MockServer::start(routes());

  let out = cmd_bin("eng-metrics")
    .args(args(&server))
    .args(["--format", "json"])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["window"]["kind"], "absolute");
  let r = &v["repos"][0]["reviews"];
  assert_eq!(r["total_prs"], 2);
  // #7: events at +1h, +3h (approval), +5h; #8 has none
  assert_eq!(r["time_to_first_response"]["max_seconds"], 3_600);
  assert_eq!(r["discussion"]["max_seconds"], 7_200);
  assert_eq!(r["discussion"]["mean_seconds"], 7_200);
  assert_eq!(r["approval"]["p90_seconds"], 3 * 3_600);
}

#[test]
fn reviews_branch_filter_and_text() {
  let server = MockServer::start(routes());

  cmd_bin("eng-metrics")
    .args(args(&server))
    .args(["--ref-string", "release"])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .assert()
    .success()
    .stdout(predicate::str::contains("---repo: api, prs: 1"))
    .stdout(predicate::str::contains("time to first response: p90 0d 1h 0m"))
    .stdout(predicate::str::contains("approval: p90 0d 3h 0m"));

  assert!(!server.requests().iter().any(|r| r.contains("/pulls/8/")));
}

#[test]
fn reviews_without_discussion_print_na() {
  let server = MockServer::start(vec![
    Route::json("/repos/acme/api/pulls", r#"[{"number": 8, "created_at": "2024-01-12T00:00:00Z", "head": {"ref": "x"}}]"#),
    Route::json("/repos/acme/api/pulls/8/comments", "[]"),
    Route::json("/repos/acme/api/pulls/8/reviews", "[]"),
  ]);

  cmd_bin("eng-metrics")
    .args(args(&server))
    .env("GITHUB_ACCESS_TOKEN", "t")
    .assert()
    .success()
    .stdout(predicate::str::contains("discussion: no data"));
}
