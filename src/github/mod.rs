// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the GitHub data source (transport, pagination, typed listings)
// role: github/namespace
// outputs: Public submodules api, paginate, endpoints
// invariants: Only this namespace performs network IO
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod endpoints;
pub mod paginate;
