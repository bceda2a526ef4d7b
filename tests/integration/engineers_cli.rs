use predicates::prelude::*;
use test_support::{MockServer, Route, cmd_bin};

const NOW: &str = "2024-02-15T00:00:00Z";

fn routes() -> Vec<Route> {
  vec![
    Route::json(
      "/repos/acme/api/commits",
      r#"[
        {"sha": "1", "author": {"login": "alice"}, "commit": {"author": {"date": "2024-02-01T10:00:00Z"}}},
        {"sha": "2", "author": {"login": "alice"}, "commit": {"author": {"date": "2024-02-02T10:00:00Z"}}},
        {"sha": "3", "author": null, "commit": {"author": {"date": "2024-02-03T10:00:00Z"}}},
        {"sha": "4", "author": {"login": "bob"}, "commit": {"author": {"date": "2024-02-04T10:00:00Z"}}}
      ]"#,
    )
    .next_page("/repos/acme/api/commits?page=2"),
    Route::json(
      "/repos/acme/api/commits?page=2",
      r#"[{"sha": "5", "author": {"login": "bob"}, "commit": {"author": {"date": "2024-02-05T10:00:00Z"}}}]"#,
    ),
    Route::json(
      "/repos/acme/api/pulls",
      r#"[
        {"number": 3, "user": {"login": "alice"}, "created_at": "2024-02-10T00:00:00Z", "closed_at": "2024-02-11T00:00:00Z"},
        {"number": 2, "user": {"login": "bob"}, "created_at": "2024-02-03T00:00:00Z", "merged_at": "2024-02-08T00:00:00Z", "closed_at": "2024-02-08T00:00:00Z"}
      ]"#,
    )
    .next_page("/repos/acme/api/pulls?page=2"),
    Route::json(
      "/repos/acme/api/pulls?page=2",
      r#"[
        {"number": 1, "user": {"login": "alice"}, "created_at": "2024-02-02T00:00:00Z", "merged_at": "2024-02-04T00:00:00Z", "closed_at": "2024-02-04T00:00:00Z"},
        {"number": 0, "user": {"login": "carol"}, "created_at": "2024-01-06T00:00:00Z", "merged_at": "2024-01-07T00:00:00Z"}
      ]"#,
    )
    .next_page("/repos/acme/api/pulls?page=3"),
    Route::json(
      "/repos/acme/api/pulls?page=3",
      r#"[{"number": -1, "user": {"login": "dave"}, "created_at": "2023-12-01T00:00:00Z"}]"#,
    ),
  ]
}

fn args(server: &MockServer) -> Vec<String> {
  [
    "engineers", "-o", "acme", "-t", "main", "-r", "api", "-r", "ghost", "--max-days", "30", "--jobs", "2", "--now-override", NOW,
    "--api-url",
  ]
  .iter()
  .map(|s| s.to_string())
  .chain([server.url()])
  .collect()
}

#[test]
fn engineers_json_counts_and_time_to_merge() {
  let server = MockServer::start(routes());

  let out = cmd_bin("eng-metrics")
    .args(args(&server))
    .args(["--format", "json"])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["repos"][0]["repo"], "api");
  let eng = &v["repos"][0]["engineers"];

  assert_eq!(eng["alice"]["commit_count"], 2);
  assert_eq!(eng["alice"]["pr_opened_count"], 2);
  assert_eq!(eng["alice"]["pr_merged_count"], 1);
  assert_eq!(eng["alice"]["pr_closed_count"], 1);
  assert_eq!(eng["alice"]["p90_time_to_merge_seconds"], 2 * 86_400);

  assert_eq!(eng["bob"]["commit_count"], 2);
  assert_eq!(eng["bob"]["p90_time_to_merge_seconds"], 5 * 86_400);

  // carol's PR is 40 days old: outside the window, and its page ends the listing
  assert!(eng.get("carol").is_none());
  assert!(eng.get("dave").is_none());
  assert!(!server.requests().iter().any(|r| r.contains("pulls?page=3")));

  // unknown repository answers 404 and is reported without failing the run
  assert_eq!(v["failed"][0]["repo"], "ghost");
}

#[test]
fn engineers_text_and_result_method_warning() {
  let server = MockServer::start(routes());

  cmd_bin("eng-metrics")
    .args(args(&server))
    .args(["--result-method", "percentile90"])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .assert()
    .success()
    .stdout(predicate::str::contains("---repo: api, engineers: 2"))
    .stdout(predicate::str::contains("bob: commits 2, prs opened 1, merged 1, closed 0, p90 time to merge 5d 0h 0m"))
    .stdout(predicate::str::contains("Failed:"))
    .stderr(predicate::str::contains("--result-method"));
}

#[test]
fn commit_authored_in_window_counts_even_when_committed_after_it() {
  // authored on the last day of the window, landed on the branch three days later
  let server = MockServer::start(vec![
    Route::json(
      "/repos/acme/api/commits",
      r#"[{"sha": "9", "author": {"login": "erin"},
           "commit": {"author": {"date": "2024-01-30T12:00:00Z"}, "committer": {"date": "2024-02-03T09:00:00Z"}}}]"#,
    ),
    Route::json("/repos/acme/api/pulls", "[]"),
  ]);

  let out = cmd_bin("eng-metrics")
    .args(["engineers", "-o", "acme", "-t", "main", "-r", "api"])
    .args(["--start-date", "2024-01-01", "--end-date", "2024-01-31", "--now-override", NOW, "--format", "json"])
    .args(["--api-url", &server.url()])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["repos"][0]["engineers"]["erin"]["commit_count"], 1);

  let commit_requests: Vec<String> = server.requests().into_iter().filter(|r| r.contains("/commits")).collect();
  assert_eq!(commit_requests.len(), 1);
  assert!(commit_requests[0].contains("since="), "{}", commit_requests[0]);
  assert!(!commit_requests[0].contains("until="), "{}", commit_requests[0]);
}
