//! Utility modules
//!
//! Formatting helpers shared by the service snippets and the CLI.

pub mod text;
pub mod time;

pub use text::{mask, preview_bytes, truncate_str};
pub use time::{format_date_time, format_opt};
