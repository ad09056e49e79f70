//! Benchmarks for conflict detection and automatic resolution.
//!
//! Performance-critical paths:
//! - `detect_conflicts`: grouping proposals by path and comparing content
//! - `resolve_automatically`: pooling, merging and replaying hunks

#![allow(missing_docs)]

use changeset_engine::{
    ChangeBuilder, Proposal, ProposerId, detect_conflicts, resolve_automatically,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::collections::BTreeMap;

fn base_file(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Each proposer rewrites its own band of lines in every file.
fn proposals(proposers: usize, files: usize, lines: usize) -> BTreeMap<ProposerId, Proposal> {
    let builder = ChangeBuilder::default();
    let base = base_file(lines);
    (0..proposers)
        .map(|p| {
            let after: String = base
                .split('\n')
                .enumerate()
                .map(|(i, line)| {
                    if i % proposers == p {
                        format!("{line} by {p}")
                    } else {
                        line.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            let changes = (0..files)
                .map(|f| builder.diff_texts(&format!("src/file{f}.ts"), Some(&base), &after))
                .collect();
            let proposal =
                Proposal::new(changes).with_timestamp(format!("2024-01-01T00:00:{p:02}Z"));
            (ProposerId::new(format!("agent-{p}")), proposal)
        })
        .collect()
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflict_merge/detect");

    for proposers in [2usize, 4, 8] {
        let input = proposals(proposers, 20, 200);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{proposers}_proposers")),
            &input,
            |b, input| b.iter(|| detect_conflicts(black_box(input))),
        );
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflict_merge/resolve_automatically");

    for lines in [100usize, 1000] {
        let input = proposals(3, 5, lines);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{lines}_lines")),
            &input,
            |b, input| b.iter(|| resolve_automatically(black_box(input))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_detect, bench_resolve);
criterion_main!(benches);
