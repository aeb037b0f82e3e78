//! Output formatters for request listings.
//!
//! - **Text**: whitespace-padded column table for terminals
//! - **HTML**: static page with a single `<table>`
//!
//! # Example
//!
//! ```ignore
//! use gitreq_format::{build_formatter, FormatArgs};
//! use gitreq_core::OutputFormat;
//!
//! let formatter = build_formatter(OutputFormat::Text, FormatArgs::new(requests))?;
//! print!("{}", formatter);
//! ```

pub mod html;
pub mod text;

pub use html::HtmlTable;
pub use text::TextTable;

use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use gitreq_core::{OutputFormat, Request, Result};

/// A rendered listing. Its `Display` output is the final document.
pub trait Formatter: fmt::Display {}

/// What a formatter needs to render its output.
#[derive(Debug, Clone, Default)]
pub struct FormatArgs {
    /// Requests in display order
    pub requests: Vec<Request>,
    /// Timezone for timestamps; `None` keeps them in UTC
    pub timezone: Option<Tz>,
}

impl FormatArgs {
    pub fn new(requests: Vec<Request>) -> Self {
        Self {
            requests,
            timezone: None,
        }
    }

    pub fn with_timezone(mut self, timezone: Option<Tz>) -> Self {
        self.timezone = timezone;
        self
    }
}

/// Build the formatter for `format`.
pub fn build_formatter(format: OutputFormat, args: FormatArgs) -> Result<Box<dyn Formatter>> {
    tracing::debug!(format = ?format, requests = args.requests.len(), "Building formatter");

    Ok(match format {
        OutputFormat::Text => Box::new(TextTable::new(args)),
        OutputFormat::Html => Box::new(HtmlTable::new(args)?),
    })
}

/// Render a timestamp with a strftime pattern, converted to `timezone` if set.
pub(crate) fn format_timestamp(at: &DateTime<Utc>, timezone: Option<Tz>, pattern: &str) -> String {
    match timezone {
        Some(tz) => at.with_timezone(&tz).format(pattern).to_string(),
        None => at.format(pattern).to_string(),
    }
}
