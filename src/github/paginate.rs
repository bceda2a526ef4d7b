// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Walk Link-header pagination into an ordered PageSet, with an optional stale-page early stop for PR listings
// role: github/pagination
// inputs: GithubApi, first-page request (path + query), StopPolicy
// outputs: PageSet (pages in API order, page count)
// side_effects: Network calls via GithubApi only
// invariants:
// - A page without a next cursor is terminal; every page before it is returned, in order
// - StaleAfter never inspects the first page; the stale boundary page is kept and nothing after it is requested
// - A failed page fetch fails the whole query
// - A next cursor that was already followed fails the query instead of looping
// errors: anyhow with query URL and page number as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashSet;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

use crate::ext::serde_json::JsonFetch;
use crate::github::api::GithubApi;

/// One chunk of a paginated listing.
#[derive(Debug, Clone, Default)]
pub struct Page {
  pub records: Vec<serde_json::Value>,
  /// Absolute URL of the next page; `None` on the terminal page.
  pub next: Option<String>,
}

/// All pages fetched for one logical query, in API order.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
  pages: Vec<Page>,
}

impl PageSet {
  pub fn page_count(&self) -> usize {
    self.pages.len()
  }

  #[cfg(test)]
  pub fn pages(&self) -> &[Page] {
    &self.pages
  }

  /// Records across all pages, preserving page order.
  pub fn records(&self) -> impl Iterator<Item = &serde_json::Value> {
    self.pages.iter().flat_map(|p| p.records.iter())
  }
}

/// First-page request: API path plus query parameters. Later pages come from next links.
#[derive(Debug, Clone)]
pub struct PageRequest {
  pub url: String,
  pub query: Vec<(String, String)>,
}

impl PageRequest {
  pub fn new(url: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      query: Vec::new(),
    }
  }

  pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
    self.query.push((key.to_string(), value.into()));
    self
  }
}

#[derive(Debug, Clone, Copy)]
pub enum StopPolicy {
  /// Follow next links until the terminal page.
  Exhaust,
  /// Newest-first listings: stop once a page's last record is at least `max_days` old.
  StaleAfter { max_days: i64, now: DateTime<Utc> },
}

impl StopPolicy {
  /// Whether `page` is the stale boundary. Empty pages and undated last records never are.
  fn is_boundary(&self, page: &Page) -> bool {
    match self {
      StopPolicy::Exhaust => false,
      StopPolicy::StaleAfter { max_days, now } => page
        .records
        .last()
        .and_then(|r| r.fetch("created_at").to_timestamp())
        .map(|created| (*now - created).num_days() >= *max_days)
        .unwrap_or(false),
    }
  }
}

/// Fetch every page of `request`, following next links in order.
pub fn fetch_pages(api: &dyn GithubApi, request: &PageRequest, policy: StopPolicy) -> Result<PageSet> {
  let first = api
    .get_page(&request.url, &request.query)
    .with_context(|| format!("fetching page 1 of {}", request.url))?;

  let mut next = first.next.clone();
  let mut pages = vec![first];
  let mut seen: HashSet<String> = HashSet::new();

  while let Some(cursor) = next.take() {
    let page_no = pages.len() + 1;
    if !seen.insert(cursor.clone()) {
      bail!("pagination of {} repeated cursor {cursor} at page {page_no}", request.url);
    }
    let page = api
      .get_page(&cursor, &[])
      .with_context(|| format!("fetching page {page_no} of {}", request.url))?;

    let boundary = policy.is_boundary(&page);
    next = page.next.clone();
    pages.push(page);

    if boundary {
      tracing::debug!(url = %request.url, pages = pages.len(), "stopping at stale page");
      break;
    }
  }

  Ok(PageSet { pages })
}
