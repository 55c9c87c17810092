//! Ordering of aggregated clients for display

use super::aggregate::AggregatedClient;

/// Sort clients by total request count, busiest first
///
/// The sort is stable, so clients with equal totals keep the order they
/// were handed in. [`super::aggregate`] yields first-appearance order,
/// which makes the ranking reproducible for identical scrape text.
pub fn rank(mut clients: Vec<AggregatedClient>) -> Vec<AggregatedClient> {
    clients.sort_by(|a, b| b.total_request_count.cmp(&a.total_request_count));
    clients
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, total: u64) -> AggregatedClient {
        AggregatedClient {
            client_name: name.to_string(),
            total_request_count: total,
            resources: Vec::new(),
            verbs: Vec::new(),
        }
    }

    #[test]
    fn test_descending_by_total() {
        let ranked = rank(vec![client("a", 1), client("b", 30), client("c", 7)]);
        let totals: Vec<_> = ranked.iter().map(|c| c.total_request_count).collect();
        assert_eq!(totals, vec![30, 7, 1]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(vec![
            client("first", 5),
            client("top", 9),
            client("second", 5),
            client("third", 5),
        ]);
        let names: Vec<_> = ranked.iter().map(|c| c.client_name.as_str()).collect();
        assert_eq!(names, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_empty() {
        assert!(rank(Vec::new()).is_empty());
    }
}
