pub const APP_NAME: &str = "modplan";

/// Default bound on the depth of the dependency traversal.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Environment variable overriding [`DEFAULT_MAX_DEPTH`].
pub const MAX_DEPTH_ENV: &str = "MODPLAN_MAX_DEPTH";

/// Length of the truncated plan fingerprint.
pub const PLAN_HASH_PREFIX_LEN: usize = 20;

/// Deepest `!` / parenthesis nesting accepted in predicate text.
pub const MAX_PREDICATE_NESTING: usize = 256;
