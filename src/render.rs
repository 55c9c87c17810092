//! Plain-text rendering of the report
//!
//! ```text
//! [ "INFO(not metrics): Master node uptime" ]
//!   - up 3 days, 4 hours
//!
//! [ "kubelet" ]
//!   - Total Requests: 5
//!   - Resources: ["pods" "nodes"]
//!   - Verbs: ["get" "list"]
//!
//! ```

use crate::quantify::AggregatedClient;
use crate::uptime::{SideFetchOutcome, UptimeError};
use std::fmt::Write;

pub const UPTIME_HEADER: &str = r#"[ "INFO(not metrics): Master node uptime" ]"#;
pub const UPTIME_TIMEOUT: &str = "timed out fetching uptime information";
pub const UPTIME_DROPPED: &str = "uptime lookup ended without reporting a result";

/// Header plus one line describing how the uptime lookup ended
pub fn uptime_section(outcome: &SideFetchOutcome<Result<String, UptimeError>>) -> String {
    let detail = match outcome {
        SideFetchOutcome::Completed(Ok(uptime)) => uptime.clone(),
        SideFetchOutcome::Completed(Err(e)) => format!("error fetching uptime info: {}", e),
        SideFetchOutcome::TimedOut => UPTIME_TIMEOUT.to_string(),
        SideFetchOutcome::Dropped => UPTIME_DROPPED.to_string(),
    };
    format!("{}\n  - {}\n\n", UPTIME_HEADER, detail)
}

/// One block per client, followed by a blank line
pub fn client_section(client: &AggregatedClient) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "[ {} ]", client.client_name);
    let _ = writeln!(out, "  - Total Requests: {}", client.total_request_count);
    let _ = writeln!(out, "  - Resources: {}", list(&client.resources));
    let _ = writeln!(out, "  - Verbs: {}", list(&client.verbs));
    out.push('\n');
    out
}

fn list(items: &[String]) -> String {
    format!("[{}]", items.join(" "))
}
