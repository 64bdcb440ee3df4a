//! Error handling module
//!
//! Every snippet returns [`SnippetError`]; SDK errors convert into it with `?`.

pub mod types;

pub use types::{Result, ServiceErrorKind, SnippetError};
