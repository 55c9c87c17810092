//! Per-client aggregation of a single scrape

use super::parser::{HELP_MARKER, LineKind, MetricRecord, classify_line, parse_sample};
use std::collections::HashMap;
use std::ops::ControlFlow;

/// Request totals for one client within one scrape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedClient {
    pub client_name: String,
    pub total_request_count: u64,
    /// Resource labels in order of appearance, duplicates kept
    pub resources: Vec<String>,
    /// Verb labels in order of appearance, duplicates kept
    pub verbs: Vec<String>,
}

impl AggregatedClient {
    fn absorb(&mut self, record: MetricRecord) {
        self.total_request_count = self
            .total_request_count
            .saturating_add(record.request_count);
        self.resources.extend(record.resources);
        self.verbs.extend(record.verbs);
    }
}

impl From<MetricRecord> for AggregatedClient {
    fn from(record: MetricRecord) -> Self {
        Self {
            client_name: record.client_name,
            total_request_count: record.request_count,
            resources: record.resources,
            verbs: record.verbs,
        }
    }
}

/// Where the scan is relative to the target metric section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionState {
    Searching,
    Recording,
    Ended,
}

/// Folds scrape lines into per-client totals
///
/// Lines are consumed in order. Samples are only recorded after a line
/// starting with `# HELP <family>`, so `# HELP <family>_total` opens the
/// section too. Once recording, the next line starting with `# HELP` ends
/// the scan for good.
#[derive(Debug)]
pub struct Aggregator<'f> {
    family: &'f str,
    opening: String,
    state: SectionState,
    clients: Vec<AggregatedClient>,
    index: HashMap<String, usize>,
    accepted: usize,
    discarded: usize,
}

impl<'f> Aggregator<'f> {
    pub fn new(family: &'f str) -> Self {
        Self {
            family,
            opening: format!("{HELP_MARKER} {family}"),
            state: SectionState::Searching,
            clients: Vec::new(),
            index: HashMap::new(),
            accepted: 0,
            discarded: 0,
        }
    }

    /// Feed one line; `Break` means the target section has ended
    pub fn feed(&mut self, line: &str) -> ControlFlow<()> {
        if self.state == SectionState::Ended {
            return ControlFlow::Break(());
        }

        match classify_line(line) {
            LineKind::Blank | LineKind::Type | LineKind::Comment => {}
            LineKind::Help => {
                if self.state == SectionState::Recording {
                    self.state = SectionState::Ended;
                    return ControlFlow::Break(());
                }
                if line.starts_with(&self.opening) {
                    self.state = SectionState::Recording;
                }
            }
            LineKind::Sample(sample) => {
                if self.state == SectionState::Recording {
                    self.record_sample(sample);
                }
            }
        }

        ControlFlow::Continue(())
    }

    fn record_sample(&mut self, line: &str) {
        let record = match parse_sample(line) {
            Ok(record) if record.has_client() => record,
            Ok(_) => {
                self.discarded += 1;
                tracing::warn!(line = %line, "Discarding metrics line without a client label");
                return;
            }
            Err(e) => {
                self.discarded += 1;
                tracing::warn!(line = %line, error = %e, "Discarding malformed metrics line");
                return;
            }
        };

        self.accepted += 1;
        match self.index.get(&record.client_name) {
            Some(&slot) => self.clients[slot].absorb(record),
            None => {
                self.index
                    .insert(record.client_name.clone(), self.clients.len());
                self.clients.push(record.into());
            }
        }
    }

    /// Number of sample lines that contributed to a client
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Number of sample lines that were malformed or had no client
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Clients in order of first appearance
    pub fn finish(self) -> Vec<AggregatedClient> {
        tracing::debug!(
            family = %self.family,
            accepted_lines = self.accepted,
            discarded_lines = self.discarded,
            clients = self.clients.len(),
            "Aggregated scrape"
        );
        self.clients
    }
}

/// Aggregate a whole scrape body for the given metric family
pub fn aggregate(text: &str, family: &str) -> Vec<AggregatedClient> {
    let mut aggregator = Aggregator::new(family);
    for line in text.lines() {
        if aggregator.feed(line).is_break() {
            break;
        }
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAMILY: &str = "apiserver_request_count";

    #[test]
    fn test_single_client_accumulates() {
        let text = "# HELP apiserver_request_count foo\n\
                    # TYPE apiserver_request_count counter\n\
                    apiserver_request_count{client=\"a\",resource=\"pods\",verb=\"get\"} 3\n\
                    apiserver_request_count{client=\"a\",resource=\"nodes\",verb=\"list\"} 2\n";

        let clients = aggregate(text, FAMILY);

        assert_eq!(
            clients,
            vec![AggregatedClient {
                client_name: "\"a\"".to_string(),
                total_request_count: 5,
                resources: vec!["\"pods\"".to_string(), "\"nodes\"".to_string()],
                verbs: vec!["\"get\"".to_string(), "\"list\"".to_string()],
            }]
        );
    }

    #[test]
    fn test_duplicate_labels_are_kept() {
        let text = "# HELP apiserver_request_count foo\n\
                    apiserver_request_count{client=\"a\",resource=\"pods\",verb=\"get\"} 1\n\
                    apiserver_request_count{client=\"a\",resource=\"pods\",verb=\"get\"} 1\n";

        let clients = aggregate(text, FAMILY);
        assert_eq!(clients[0].resources, vec!["\"pods\"", "\"pods\""]);
        assert_eq!(clients[0].verbs, vec!["\"get\"", "\"get\""]);
    }

    #[test]
    fn test_clients_keep_first_appearance_order() {
        let text = "# HELP apiserver_request_count foo\n\
                    apiserver_request_count{client=\"b\"} 1\n\
                    apiserver_request_count{client=\"a\"} 1\n\
                    apiserver_request_count{client=\"b\"} 1\n\
                    apiserver_request_count{client=\"c\"} 1\n";

        let names: Vec<_> = aggregate(text, FAMILY)
            .into_iter()
            .map(|c| c.client_name)
            .collect();
        assert_eq!(names, vec!["\"b\"", "\"a\"", "\"c\""]);
    }

    #[test]
    fn test_lines_before_section_are_ignored() {
        let text = "# HELP other_metric foo\n\
                    other_metric{client=\"x\"} 100\n\
                    # HELP apiserver_request_count foo\n\
                    apiserver_request_count{client=\"a\"} 1\n";

        let clients = aggregate(text, FAMILY);
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].client_name, "\"a\"");
    }

    #[test]
    fn test_next_help_ends_scan_even_if_target_reappears() {
        let text = "# HELP apiserver_request_count foo\n\
                    apiserver_request_count{client=\"a\"} 1\n\
                    # HELP etcd_object_count bar\n\
                    apiserver_request_count{client=\"b\"} 10\n\
                    # HELP apiserver_request_count foo\n\
                    apiserver_request_count{client=\"c\"} 100\n";

        let clients = aggregate(text, FAMILY);
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].total_request_count, 1);
    }

    #[test]
    fn test_feed_reports_section_end() {
        let mut aggregator = Aggregator::new(FAMILY);
        assert!(aggregator.feed("# HELP apiserver_request_count foo").is_continue());
        assert!(aggregator.feed("apiserver_request_count{client=\"a\"} 1").is_continue());
        assert!(aggregator.feed("# HELP other foo").is_break());
        assert!(aggregator.feed("apiserver_request_count{client=\"a\"} 1").is_break());
        assert_eq!(aggregator.finish()[0].total_request_count, 1);
    }

    #[test]
    fn test_family_prefix_opens_section() {
        let text = "# HELP apiserver_request_count_total Counter\n\
                    apiserver_request_count_total{client=\"a\"} 5\n";

        let clients = aggregate(text, FAMILY);
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].client_name, "\"a\"");
        assert_eq!(clients[0].total_request_count, 5);
    }

    #[test]
    fn test_any_help_prefixed_line_ends_section() {
        let text = "# HELP apiserver_request_count foo\n\
                    apiserver_request_count{client=\"a\"} 1\n\
                    # HELPER note\n\
                    apiserver_request_count{client=\"b\"} 2\n";

        let clients = aggregate(text, FAMILY);
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].client_name, "\"a\"");
    }

    #[test]
    fn test_unrelated_help_does_not_open_section() {
        let text = "# HELP apiserver_request_latencies foo\n\
                    apiserver_request_count{client=\"a\"} 1\n";
        assert!(aggregate(text, FAMILY).is_empty());
    }

    #[test]
    fn test_missing_client_and_malformed_lines_are_skipped() {
        let text = "# HELP apiserver_request_count foo\n\
                    apiserver_request_count{client=\"a\"} 4\n\
                    apiserver_request_count{resource=\"pods\",verb=\"get\"} 50\n\
                    apiserver_request_count{client=\"a\"} not-a-number\n\
                    garbage\n\
                    \n\
                    apiserver_request_count{client=\"b\"} 6\n";

        let mut aggregator = Aggregator::new(FAMILY);
        for line in text.lines() {
            let _ = aggregator.feed(line);
        }
        assert_eq!(aggregator.accepted(), 2);
        assert_eq!(aggregator.discarded(), 3);

        let clients = aggregator.finish();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].total_request_count, 4);
        assert_eq!(clients[1].total_request_count, 6);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate("", FAMILY).is_empty());
    }

    #[test]
    fn test_totals_saturate() {
        let text = format!(
            "# HELP apiserver_request_count foo\n\
             apiserver_request_count{{client=\"a\"}} {max}\n\
             apiserver_request_count{{client=\"a\"}} 1\n",
            max = u64::MAX
        );
        assert_eq!(aggregate(&text, FAMILY)[0].total_request_count, u64::MAX);
    }
}
