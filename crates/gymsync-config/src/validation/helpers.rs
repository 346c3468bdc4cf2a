//! Shared validation helpers used by the section validators.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error unless `value` is an absolute http(s) URL.
pub(crate) fn validate_http_url(errors: &mut Vec<String>, name: &str, value: &str) {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        errors.push(format!("{name} = {value:?} must start with http:// or https://"));
    }
}

/// Push an error if `value` is blank or longer than `max_chars`.
pub(crate) fn validate_label(errors: &mut Vec<String>, name: &str, value: &str, max_chars: usize) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    } else if value.chars().count() > max_chars {
        errors.push(format!("{name} is longer than {max_chars} characters"));
    }
}
