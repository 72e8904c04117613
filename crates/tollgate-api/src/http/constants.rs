//! Shared HTTP constants (headers, problem URIs, defaults).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const PROBLEM_INTERNAL: &str = "https://tollgate.dev/problems/internal";
pub(crate) const PROBLEM_FORBIDDEN: &str = "https://tollgate.dev/problems/forbidden";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://tollgate.dev/problems/bad-request";
pub(crate) const PROBLEM_CONFIG_INVALID: &str = "https://tollgate.dev/problems/config-invalid";
pub(crate) const PROBLEM_NOT_FOUND: &str = "https://tollgate.dev/problems/not-found";

pub(crate) const DEFAULT_PRUNE_LIMIT: i64 = 1000;
