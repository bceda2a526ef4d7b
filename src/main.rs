use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod ext;
mod github;
mod metrics;
mod model;
mod render;
mod runner;
mod stats;
mod util;
mod window;

use crate::cli::{Cli, Mode, normalize};
use crate::github::api::{GithubHttpApi, get_github_token};

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  // stdout carries only the report
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  init_tracing(cli.verbose);

  // Phase 1: normalize CLI and credentials; nothing is fetched until both succeed
  let cfg = normalize(cli)?;

  let Some(token) = get_github_token() else {
    bail!("Missing token. Set GITHUB_ACCESS_TOKEN (or GITHUB_TOKEN / GH_TOKEN), or log in with `gh auth login`");
  };

  if let Mode::Engineers { result_method: Some(method) } = &cfg.mode {
    tracing::warn!(%method, "--result-method is accepted but does not change the reported statistics");
  }

  // Phase 2: resolve now and fetch
  let now = util::effective_now(util::parse_now_override(cfg.now_override.as_deref()));
  let api = GithubHttpApi::new(&cfg.api_url, token, cfg.timeout);
  let report = runner::run(&api, &cfg, now)?;

  // Phase 3: render
  print!("{}", render::render(&report, cfg.format)?);

  Ok(())
}
