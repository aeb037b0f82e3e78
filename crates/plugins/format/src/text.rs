//! Plain text table renderer.

use std::fmt;

use chrono_tz::Tz;
use gitreq_core::Request;

use crate::{format_timestamp, FormatArgs, Formatter};

const HEADER: [&str; 5] = ["Repository", "Name", "URL", "Created", "Updated"];

/// Unix `date` style, e.g. `Fri Jan  5 10:00:00 UTC 2024`.
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Z %Y";

/// Left-aligned column table.
///
/// Each column is as wide as its longest cell (counted in characters,
/// header included); columns are separated by one space and every row,
/// the last one too, ends with a newline.
pub struct TextTable {
    requests: Vec<Request>,
    timezone: Option<Tz>,
}

impl TextTable {
    pub fn new(args: FormatArgs) -> Self {
        Self {
            requests: args.requests,
            timezone: args.timezone,
        }
    }

    fn rows(&self) -> Vec<[String; 5]> {
        let header = HEADER.map(str::to_string);
        let body = self.requests.iter().map(|r| {
            [
                r.repository.clone(),
                r.name.clone(),
                r.url.clone(),
                format_timestamp(&r.created, self.timezone, TIMESTAMP_FORMAT),
                format_timestamp(&r.updated, self.timezone, TIMESTAMP_FORMAT),
            ]
        });

        std::iter::once(header).chain(body).collect()
    }
}

impl fmt::Display for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();

        let mut widths = [0usize; 5];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        for row in &rows {
            for (i, (cell, width)) in row.iter().zip(widths).enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{:<width$}", cell, width = width)?;
            }
            f.write_str("\n")?;
        }

        Ok(())
    }
}

impl Formatter for TextTable {}
