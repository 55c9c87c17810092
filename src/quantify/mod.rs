//! Extraction and ranking of API server request counters
//!
//! A scrape is processed in three steps: lines are classified and parsed
//! ([`parser`]), samples are folded per client ([`aggregate`]), and the
//! clients are ordered by request volume ([`rank`]).

pub mod aggregate;
pub mod parser;
pub mod rank;

pub use aggregate::{AggregatedClient, Aggregator, aggregate};
pub use parser::{LineError, LineKind, MetricRecord, classify_line, parse_sample};
pub use rank::rank;

/// Aggregate and rank one scrape body
pub fn quantify(text: &str, family: &str) -> Vec<AggregatedClient> {
    rank(aggregate(text, family))
}
