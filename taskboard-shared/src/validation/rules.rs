/// Custom field rules
///
/// Each function follows the `validator` custom-rule signature and reports a
/// stable error code that the [`Validator`](super::Validator) registry maps to
/// a [`ValidationKind`](super::ValidationKind).

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

use crate::models::task::TaskStatus;

/// Error code for [`validate_int_string`]
pub const INT_STRING: &str = "int_string";

/// Error code for [`validate_tag`]
pub const TAG: &str = "tag";

/// Error code for [`validate_task_status`]
pub const TASK_STATUS: &str = "task_status";

/// Error code used for non-empty checks (`length(min = 1, code = "required")`)
pub const REQUIRED: &str = "required";

fn tag_pattern() -> &'static Regex {
    static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();
    TAG_PATTERN.get_or_init(|| Regex::new(r"^#[a-z0-9_\-]+$").expect("tag pattern is valid"))
}

/// Parses a base-10 identifier string
///
/// Accepts an optional sign, like any Rust integer literal parse; values
/// outside the 32-bit identifier range are rejected.
pub fn parse_int_string(value: &str) -> Option<i32> {
    value.parse::<i32>().ok()
}

/// Field must parse as a base-10 integer
///
/// Empty values pass so that a missing field is reported as required rather
/// than malformed.
pub fn validate_int_string(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_int_string(value).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new(INT_STRING))
    }
}

/// Field must be `#` followed by lowercase alphanumerics, `_` or `-`
pub fn validate_tag(value: &str) -> Result<(), ValidationError> {
    if tag_pattern().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(TAG))
    }
}

/// Field must be one of `new`, `in_progress`, `done`
///
/// Empty values pass; pair with a required check where the field is mandatory.
pub fn validate_task_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<TaskStatus>().is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new(TASK_STATUS))
    }
}
