//! Line-level parsing of Prometheus exposition text
//!
//! Only the shape used by API server request counters is understood:
//!
//! ```text
//! # HELP apiserver_request_count Counter of apiserver requests
//! # TYPE apiserver_request_count counter
//! apiserver_request_count{client="kubectl",resource="pods",verb="GET"} 42
//! ```
//!
//! Label values are taken literally. Quotes are kept and nothing is
//! unescaped, so a value containing `,` or `}` is mis-split.

use std::num::ParseIntError;
use thiserror::Error;

pub(crate) const HELP_MARKER: &str = "# HELP";
const TYPE_MARKER: &str = "# TYPE";

/// Classification of a single line of scrape text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only line
    Blank,
    /// `# TYPE ...` line
    Type,
    /// Any line starting with `# HELP`; a metric section boundary
    Help,
    /// Any other `#` line
    Comment,
    /// A sample line, to be handed to [`parse_sample`]
    Sample(&'a str),
}

/// Classify a raw line without parsing its sample body
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with(TYPE_MARKER) {
        return LineKind::Type;
    }
    if line.starts_with(HELP_MARKER) {
        return LineKind::Help;
    }
    if line.starts_with('#') {
        return LineKind::Comment;
    }
    LineKind::Sample(line)
}

/// One parsed sample line
///
/// `client_name` is empty when the line carried no `client` label; such
/// records are discarded by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricRecord {
    pub client_name: String,
    pub request_count: u64,
    pub resources: Vec<String>,
    pub verbs: Vec<String>,
}

impl MetricRecord {
    /// A record is usable only if it names a client
    pub fn has_client(&self) -> bool {
        !self.client_name.is_empty()
    }
}

/// Why a sample line could not be parsed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("missing metrics object delimiter '}}'")]
    MissingClosingBrace,

    #[error("missing metrics object delimiter '{{'")]
    MissingOpeningBrace,

    #[error("missing counter value after '}}'")]
    MissingCounter,

    #[error("counter value '{value}' is not an integer: {source}")]
    InvalidCounter {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Parse a sample line into a [`MetricRecord`]
///
/// The line is split at its last `}`; the trimmed remainder is the counter.
/// The label body runs from the first `{` up to that split point and is
/// split on `,`, each field on its first `=`. Only the `client`, `resource`
/// and `verb` labels are kept; a repeated label overwrites the earlier one.
pub fn parse_sample(line: &str) -> Result<MetricRecord, LineError> {
    let (head, tail) = line
        .rsplit_once('}')
        .ok_or(LineError::MissingClosingBrace)?;

    let value = tail.trim();
    if value.is_empty() {
        return Err(LineError::MissingCounter);
    }
    let request_count = value
        .parse::<u64>()
        .map_err(|source| LineError::InvalidCounter {
            value: value.to_string(),
            source,
        })?;

    let (_, labels) = head
        .split_once('{')
        .ok_or(LineError::MissingOpeningBrace)?;

    let mut record = MetricRecord {
        request_count,
        ..MetricRecord::default()
    };

    for field in labels.split(',') {
        let Some((key, value)) = field.split_once('=') else {
            continue;
        };
        match key {
            "client" => record.client_name = value.to_string(),
            "resource" => record.resources = vec![value.to_string()],
            "verb" => record.verbs = vec![value.to_string()],
            _ => {}
        }
    }

    Ok(record)
}
