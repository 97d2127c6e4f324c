pub const INVALID_INPUT: &str = "invalid_input";
pub const TOO_LARGE: &str = "too_large";
pub const UNSUPPORTED_FORMAT: &str = "unsupported_format";
pub const ENCRYPTED: &str = "encrypted";
pub const PARSE_FAILED: &str = "parse_failed";
pub const INTERNAL_ERROR: &str = "internal_error";
