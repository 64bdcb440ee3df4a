//! Printing snippet results to stdout
//!
//! Writes go through a locked stdout handle so a closed pipe
//! (`aws-snippets ... | head`) surfaces as an I/O error instead of a panic.

use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};

pub use crate::config::OutputFormat;
use crate::error::Result;

/// Writes results in the selected format
#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print a single result
    pub fn emit<T: Serialize + Display>(&self, value: &T) -> Result<()> {
        print_line(&self.render(value)?)
    }

    /// Print a list of results, one per line in text mode
    pub fn emit_list<T: Serialize + Display>(&self, items: &[T]) -> Result<()> {
        print_line(&self.render_list(items)?)
    }

    /// Print raw JSON values (DynamoDB items) regardless of mode
    pub fn emit_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Text => serde_json::to_string(value)?,
        };
        print_line(&rendered)
    }

    /// Confirmation for calls that return nothing of interest
    pub fn done(&self, message: &str) -> Result<()> {
        match self.format {
            OutputFormat::Text => print_line(message),
            OutputFormat::Json => print_line(&serde_json::to_string_pretty(
                &serde_json::json!({ "status": "ok", "message": message }),
            )?),
        }
    }

    /// Print a fragment of streamed text without a newline
    pub fn stream_text(&self, text: &str) -> Result<()> {
        write_fragment(&mut io::stdout().lock(), text)
    }

    /// Terminate a run of [`Output::stream_text`] fragments
    pub fn end_stream(&self) -> Result<()> {
        print_line("")
    }

    pub fn render<T: Serialize + Display>(&self, value: &T) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Text => value.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
        })
    }

    pub fn render_list<T: Serialize + Display>(&self, items: &[T]) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Text if items.is_empty() => "(none)".to_string(),
            OutputFormat::Text => items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => serde_json::to_string_pretty(items)?,
        })
    }
}

fn print_line(text: &str) -> Result<()> {
    write_line(&mut io::stdout().lock(), text)
}

fn write_line(out: &mut impl Write, text: &str) -> Result<()> {
    writeln!(out, "{text}")?;
    Ok(())
}

fn write_fragment(out: &mut impl Write, text: &str) -> Result<()> {
    write!(out, "{text}")?;
    out.flush()?;
    Ok(())
}
