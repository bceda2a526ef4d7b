use predicates::prelude::*;
use test_support::{MockServer, Route, cmd_bin};

const NOW: &str = "2024-01-20T00:00:00Z";

#[test]
fn missing_window_fails_before_any_fetch() {
  let server = MockServer::start(vec![Route::json("/orgs/acme/repos", "[]")]);

  cmd_bin("eng-metrics")
    .args(["engineers", "-o", "acme", "-t", "main", "--api-url", &server.url()])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--max-days"));

  assert!(server.requests().is_empty());
}

#[test]
fn ambiguous_window_is_rejected() {
  cmd_bin("eng-metrics")
    .args([
      "engineers", "-o", "acme", "-t", "main", "--max-days", "7", "--start-date", "2024-01-01", "--end-date", "2024-01-31",
    ])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Ambiguous"));
}

#[test]
fn missing_org_is_rejected() {
  cmd_bin("eng-metrics")
    .args(["reviews", "-t", "main", "--max-days", "7"])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--org"));
}

#[test]
fn invalid_result_method_is_rejected() {
  cmd_bin("eng-metrics")
    .args(["engineers", "--result-method", "median", "-o", "acme", "-t", "main", "--max-days", "7"])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--result-method"));
}

#[test]
fn invalid_date_names_the_flag() {
  cmd_bin("eng-metrics")
    .args(["engineers", "-o", "acme", "-t", "main", "--start-date", "01/02/2024", "--end-date", "2024-01-31"])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--start-date"));
}

#[cfg(unix)]
#[test]
fn missing_token_fails_before_any_fetch() {
  let server = MockServer::start(vec![Route::json("/orgs/acme/repos", "[]")]);
  let bin_dir = tempfile::tempdir().unwrap();
  test_support::fake_gh(bin_dir.path(), "", 1);

  cmd_bin("eng-metrics")
    .args(["engineers", "-o", "acme", "-t", "main", "--max-days", "7", "--api-url", &server.url(), "--now-override", NOW])
    .env("PATH", bin_dir.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("Missing token"));

  assert!(server.requests().is_empty());
}

#[test]
fn org_listing_failure_is_fatal() {
  let server = MockServer::start(vec![Route::status("/orgs/acme/repos", 403, r#"{"message":"Forbidden"}"#)]);

  cmd_bin("eng-metrics")
    .args(["engineers", "-o", "acme", "-t", "main", "--max-days", "7", "--api-url", &server.url(), "--now-override", NOW])
    .env("GITHUB_ACCESS_TOKEN", "t")
    .assert()
    .failure()
    .stderr(predicate::str::contains("listing repositories of acme"));
}
