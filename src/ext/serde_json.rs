// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path lookups on serde_json::Value with typed, optional extraction (strings, ints, API timestamps)
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper
// invariants: No panics; missing paths, JSON null, and type mismatches all yield None
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::util::parse_api_timestamp;

/// Wrapper around a JSON location to allow typed extraction via a clear second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  /// Attempt to deserialize the fetched value as `T`.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self
      .inner
      .filter(|v| !v.is_null())
      .and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  /// Borrow the value as a string slice without allocating.
  pub fn as_str(&self) -> Option<&'a str> {
    self.inner.and_then(|v| v.as_str())
  }

  /// Parse the value as an API timestamp (`YYYY-MM-DDTHH:MM:SSZ`).
  pub fn to_timestamp(&self) -> Option<DateTime<Utc>> {
    self.as_str().and_then(parse_api_timestamp)
  }
}

/// Extension to fetch nested values via dotted paths like "user.login".
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      match cur.get(key) {
        Some(next) => cur = next,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}
