// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render a Report as a human text summary or pretty JSON
// role: output/render
// inputs: Report, OutputFormat
// outputs: String destined for stdout
// invariants:
// - Missing statistics render as "no data" / "n/a" (text) or null (JSON), never as zero
// - Repository order follows the Report
// errors: Serialization / formatting errors propagate
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use std::fmt::Write;

use crate::cli::OutputFormat;
use crate::runner::Report;
use crate::stats::DurationSummary;
use crate::util::format_opt_duration;

const RULE_WIDTH: usize = 30;

pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
  match format {
    OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(report)?)),
    OutputFormat::Text => render_text(report),
  }
}

fn summary_line(label: &str, s: &DurationSummary) -> String {
  if s.is_empty() {
    return format!("  {label}: no data");
  }
  format!(
    "  {label}: p90 {}, mean {}, max {}",
    format_opt_duration(s.p90),
    format_opt_duration(s.mean),
    format_opt_duration(s.max)
  )
}

fn render_text(report: &Report) -> Result<String> {
  let mut out = String::new();

  writeln!(out, "{} for {} ({})", report.mode, report.org, report.window.label())?;
  writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
  writeln!(out, "Results:")?;

  for lt in &report.lead_times {
    writeln!(
      out,
      "---repo: {}, lead_time (p90): {}, samples: {}, releases: {}",
      lt.repo,
      format_opt_duration(lt.p90),
      lt.samples,
      lt.releases.join(", ")
    )?;
  }

  for repo in &report.repos {
    if let Some(engineers) = &repo.engineers {
      writeln!(out, "---repo: {}, engineers: {}", repo.repo, engineers.len())?;
      if engineers.is_empty() {
        writeln!(out, "  no activity in window")?;
      }
      for (login, rec) in engineers.iter() {
        writeln!(
          out,
          "  {login}: commits {}, prs opened {}, merged {}, closed {}, p90 time to merge {}",
          rec.commit_count,
          rec.pr_opened_count,
          rec.pr_merged_count,
          rec.pr_closed_count,
          format_opt_duration(rec.p90_time_to_merge)
        )?;
      }
    }

    if let Some(reviews) = &repo.reviews {
      writeln!(out, "---repo: {}, prs: {}", repo.repo, reviews.total_prs)?;
      writeln!(out, "{}", summary_line("time to first response", &reviews.time_to_first_response))?;
      writeln!(out, "{}", summary_line("discussion", &reviews.discussion))?;
      writeln!(out, "{}", summary_line("approval", &reviews.approval))?;
    }
  }

  if report.lead_times.is_empty() && report.repos.is_empty() {
    writeln!(out, "(no data)")?;
  }

  if !report.failed.is_empty() {
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "Failed:")?;
    for f in &report.failed {
      writeln!(out, "---repo: {}, error: {}", f.repo, f.error)?;
    }
  }

  Ok(out)
}
