pub const DEFAULT_STRATEGY: &str = "in-place";
pub const DEFAULT_VERBOSITY: &str = "3";
