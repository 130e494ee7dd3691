//! Extraction of named sections from AWStats database files.
//!
//! An AWStats history file is a sequence of sections:
//!
//! ```text
//! BEGIN_TIME 24
//! 0 1200 3400 567890 12 40 1024
//! ...
//! END_TIME
//! ```
//!
//! Each section holds one whitespace-separated row per line. Sections are
//! read by streaming the file line by line; only the requested one is kept.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

/// Section names read by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// `key value` summary rows (`TotalVisits`, `TotalUnique`, ...)
    General,
    /// One row per hour of the day
    Time,
    /// One row per day of the month
    Day,
    /// One row per page URL
    Sider,
    /// One row per URL answered with 404
    Sider404,
}

impl Block {
    pub fn as_str(&self) -> &'static str {
        match self {
            Block::General => "GENERAL",
            Block::Time => "TIME",
            Block::Day => "DAY",
            Block::Sider => "SIDER",
            Block::Sider404 => "SIDER_404",
        }
    }
}

/// Check whether a trimmed line opens section `name` (`BEGIN_<name> <digits>`).
fn is_begin_marker(line: &str, name: &str) -> bool {
    let Some(rest) = line
        .strip_prefix("BEGIN_")
        .and_then(|r| r.strip_prefix(name))
    else {
        return false;
    };

    // `BEGIN_SIDER_404` must not open `SIDER`
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }

    let count = rest.trim();
    !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit())
}

/// Return the trimmed, non-empty rows of section `name` in `path`.
///
/// Collection starts after the `BEGIN_<name> <n>` line and stops at the
/// first line equal to `END_<name>`. A missing end marker returns every
/// remaining line; a missing begin marker, an empty path or an unreadable
/// file return an empty list.
pub fn block_lines(name: &str, path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Vec::new();
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot open data file");
            return Vec::new();
        }
    };

    let end_marker = format!("END_{}", name);
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut rows = Vec::new();
    let mut inside = false;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(path = %path.display(), error = %e, "read error, keeping rows so far");
                break;
            }
        }

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim();

        if !inside {
            inside = is_begin_marker(line, name);
            continue;
        }

        if line == end_marker {
            break;
        }

        if !line.is_empty() {
            rows.push(line.to_string());
        }
    }

    rows
}
