//! Timestamp formatting for SDK `DateTime` values

use aws_smithy_types::date_time::Format;
use aws_smithy_types::DateTime;

/// Format an SDK timestamp as RFC 3339, falling back to epoch seconds
pub fn format_date_time(dt: &DateTime) -> String {
    dt.fmt(Format::DateTime)
        .unwrap_or_else(|_| dt.secs().to_string())
}

/// Optional variant for the many SDK getters returning `Option<&DateTime>`
pub fn format_opt(dt: Option<&DateTime>) -> Option<String> {
    dt.map(format_date_time)
}
