// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Command-line surface (clap derive) and normalization into an EffectiveConfig
// role: config/cli
// inputs: Process arguments
// outputs: EffectiveConfig with a validated Window, Mode, and transport settings
// invariants:
// - Exactly one window selection: --max-days, or --start-date together with --end-date
// - --org and --target-branch are required for every mode
// - --result-method is validated even though it does not change the output
// errors: bail! with the offending flag named; nothing is fetched before normalize succeeds
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::github::api::DEFAULT_API_URL;
use crate::window::{self, Window};

#[derive(Parser, Debug)]
#[command(
    name = "eng-metrics",
    version,
    about = "Engineering productivity metrics from GitHub (lead time, per-engineer activity, review latency)",
    long_about = None
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  /// GitHub organization that owns the repositories
  #[arg(long, short = 'o', global = true)]
  pub org: Option<String>,

  /// Only process these repositories (repeatable; default: every repository in the org)
  #[arg(long = "repo", short = 'r', global = true)]
  pub repos: Vec<String>,

  /// Skip these repositories (repeatable)
  #[arg(long, short = 'e', global = true)]
  pub exclude: Vec<String>,

  /// Base branch that PRs target and commits are listed from
  #[arg(long, short = 't', global = true)]
  pub target_branch: Option<String>,

  /// Relative window: records at most this many whole days old
  #[arg(long, global = true)]
  pub max_days: Option<i64>,

  /// Absolute window start (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ); must be paired with --end-date
  #[arg(long, global = true)]
  pub start_date: Option<String>,

  /// Absolute window end, inclusive; a bare date covers the whole day
  #[arg(long, global = true)]
  pub end_date: Option<String>,

  /// Repositories processed concurrently
  #[arg(long, default_value_t = 1, global = true)]
  pub jobs: usize,

  /// Report format on stdout
  #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
  pub format: OutputFormat,

  /// GitHub REST base URL
  #[arg(long, default_value = DEFAULT_API_URL, global = true)]
  pub api_url: String,

  /// Per-request timeout in seconds
  #[arg(long, default_value_t = 30, global = true)]
  pub timeout_secs: u64,

  /// Log matched branches, considered commits, and page fetches
  #[arg(long, short = 'v', global = true)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant for relative windows (hidden; tests only)
  #[arg(long = "now-override", hide = true, global = true)]
  pub now_override: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
  /// p90 lead time for change over merged PRs whose source branch matches --ref-string
  LeadTime {
    /// Case-insensitive substring of the PR source branch (e.g. "release")
    #[arg(long)]
    ref_string: String,
  },
  /// Per-engineer commit and PR counts with p90 time to merge
  Engineers {
    /// Aggregation hint: "mean" or "percentileNN"
    #[arg(long)]
    result_method: Option<String>,
  },
  /// Review latency: time to first response, discussion gaps, approval latency
  Reviews {
    /// Only consider PRs whose source branch contains this substring
    #[arg(long)]
    ref_string: Option<String>,
  },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  Text,
  Json,
}

/// Accepted `--result-method` values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResultMethod {
  Mean,
  Percentile(u8),
}

static PERCENTILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^percentile(\d{2})$").expect("percentile regex"));

impl FromStr for ResultMethod {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    if s == "mean" {
      return Ok(ResultMethod::Mean);
    }
    if let Some(caps) = PERCENTILE_RE.captures(s) {
      let n: u8 = caps[1].parse()?;
      return Ok(ResultMethod::Percentile(n));
    }
    bail!("invalid --result-method {s:?}: expected \"mean\" or \"percentileNN\" (e.g. percentile90)")
  }
}

impl fmt::Display for ResultMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ResultMethod::Mean => write!(f, "mean"),
      ResultMethod::Percentile(n) => write!(f, "percentile{n:02}"),
    }
  }
}

/// Validated mode with its mode-specific options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
  LeadTime { ref_string: String },
  Engineers { result_method: Option<ResultMethod> },
  Reviews { ref_string: Option<String> },
}

impl Mode {
  pub fn name(&self) -> &'static str {
    match self {
      Mode::LeadTime { .. } => "lead-time",
      Mode::Engineers { .. } => "engineers",
      Mode::Reviews { .. } => "reviews",
    }
  }
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub mode: Mode,
  pub org: String,
  pub repos: Vec<String>,
  pub exclude: Vec<String>,
  pub target_branch: String,
  pub window: Window,
  pub jobs: usize,
  pub format: OutputFormat,
  pub api_url: String,
  pub timeout: Duration,
  pub now_override: Option<String>,
}

fn non_blank(flag: &str, value: Option<String>) -> Result<String> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v),
    _ => bail!("{flag} is required"),
  }
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let Some(command) = cli.command else {
    bail!("Choose a mode: lead-time | engineers | reviews");
  };

  let org = non_blank("--org", cli.org)?;
  let target_branch = non_blank("--target-branch", cli.target_branch)?;

  // Validate window selection
  let window = match (cli.max_days, &cli.start_date, &cli.end_date) {
    (Some(days), None, None) => window::relative(days)?,
    (None, Some(s), Some(e)) => window::absolute(s, e)?,
    (None, None, None) => bail!("Provide one of --max-days or (--start-date AND --end-date)"),
    (None, Some(_), None) | (None, None, Some(_)) => {
      bail!("--start-date and --end-date must be given together")
    }
    _ => bail!("Ambiguous time selection: choose only one of --max-days | --start-date/--end-date"),
  };

  if cli.jobs == 0 {
    bail!("--jobs must be at least 1");
  }

  let mode = match command {
    Command::LeadTime { ref_string } => Mode::LeadTime {
      ref_string: non_blank("--ref-string", Some(ref_string))?,
    },
    Command::Engineers { result_method } => Mode::Engineers {
      result_method: result_method.as_deref().map(ResultMethod::from_str).transpose()?,
    },
    Command::Reviews { ref_string } => Mode::Reviews {
      ref_string: ref_string.filter(|s| !s.trim().is_empty()),
    },
  };

  Ok(EffectiveConfig {
    mode,
    org,
    repos: cli.repos,
    exclude: cli.exclude,
    target_branch,
    window,
    jobs: cli.jobs,
    format: cli.format,
    api_url: cli.api_url,
    timeout: Duration::from_secs(cli.timeout_secs),
    now_override: cli.now_override,
  })
}
