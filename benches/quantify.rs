//! Scrape processing benchmarks
//!
//! Measures the non-I/O part of a report: line parsing, aggregation and
//! ranking over synthetic scrapes of increasing size.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use quant::quantify::{aggregate, parse_sample, quantify};
use std::hint::black_box;

const FAMILY: &str = "apiserver_request_count";
const CLIENTS: [&str; 6] = [
    "kubelet/v1.11.0",
    "kube-scheduler/v1.11.0",
    "kube-controller-manager/v1.11.0",
    "openshift/v1.11.0",
    "kubectl/v1.11.0",
    "Go-http-client/2.0",
];
const RESOURCES: [&str; 5] = ["pods", "nodes", "services", "endpoints", "configmaps"];
const VERBS: [&str; 4] = ["GET", "LIST", "WATCH", "PATCH"];

/// Build a scrape with `lines` samples in the target family followed by
/// an unrelated family that the aggregator must not read
fn synthetic_scrape(lines: usize) -> String {
    let mut text = String::from(
        "# HELP apiserver_request_count Counter of apiserver requests.\n\
         # TYPE apiserver_request_count counter\n",
    );
    for i in 0..lines {
        text.push_str(&format!(
            "apiserver_request_count{{client=\"{}\",code=\"200\",contentType=\"application/json\",resource=\"{}\",scope=\"cluster\",verb=\"{}\"}} {}\n",
            CLIENTS[i % CLIENTS.len()],
            RESOURCES[i % RESOURCES.len()],
            VERBS[i % VERBS.len()],
            i * 7 + 1
        ));
    }
    text.push_str("# HELP apiserver_request_latencies Latency.\n");
    for i in 0..lines {
        text.push_str(&format!(
            "apiserver_request_latencies_bucket{{le=\"{}\"}} {}\n",
            i, i
        ));
    }
    text
}

fn bench_parse_sample(c: &mut Criterion) {
    let line = "apiserver_request_count{client=\"kubelet/v1.11.0\",code=\"200\",contentType=\"application/vnd.kubernetes.protobuf\",resource=\"nodes\",scope=\"cluster\",subresource=\"\",verb=\"GET\"} 1234";

    c.bench_function("parse_sample", |b| {
        b.iter(|| parse_sample(black_box(line)));
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for lines in [100, 1_000, 10_000] {
        let text = synthetic_scrape(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &text, |b, text| {
            b.iter(|| aggregate(black_box(text), FAMILY));
        });
    }

    group.finish();
}

fn bench_quantify(c: &mut Criterion) {
    let text = synthetic_scrape(5_000);

    c.bench_function("quantify_5000_lines", |b| {
        b.iter(|| quantify(black_box(&text), FAMILY));
    });
}

criterion_group!(benches, bench_parse_sample, bench_aggregate, bench_quantify);
criterion_main!(benches);
