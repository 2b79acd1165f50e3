/// `m:ss` for a duration in seconds; absent or zero renders as `--`.
#[must_use]
pub fn format_time(seconds: Option<u64>) -> String {
    match seconds {
        None | Some(0) => MISSING.to_owned(),
        Some(total) => format!("{}:{:02}", total / 60, total % 60),
    }
}

/// Placeholder shown wherever a value is missing.
pub const MISSING: &str = "--";
