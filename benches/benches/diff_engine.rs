//! Benchmarks for the edit-script engine and hunk builder.
//!
//! Performance-critical paths:
//! - `diff`: Myers shortest edit script over line slices
//! - `build_hunks`: splitting, diffing and anchoring hunks
//! - `tag_hunks`: structure detection over the post-edit text

#![allow(missing_docs)]

use changeset_engine::{HunkBuilder, SemanticGrouper, build_hunks, diff};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// Generates a source-like file with `functions` small functions.
fn source_file(functions: usize) -> String {
    (0..functions)
        .map(|i| format!("function f{i}(x) {{\n  const y = x + {i};\n  return y;\n}}\n"))
        .collect()
}

/// Rewrites every `stride`-th function body.
fn edit_every(text: &str, stride: usize) -> String {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| {
            if (i / 4) % stride == 0 && line.contains("return") {
                line.replace("return y", "return y * 2")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_diff_similar(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_engine/diff_similar");

    for functions in [10usize, 100, 1000] {
        let before = source_file(functions);
        let after = edit_every(&before, 10);
        let (old, new): (Vec<&str>, Vec<&str>) = (before.split('\n').collect(), after.split('\n').collect());

        group.throughput(Throughput::Elements(old.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_lines", old.len())),
            &(old, new),
            |b, (old, new)| b.iter(|| diff(black_box(old), black_box(new))),
        );
    }

    group.finish();
}

fn bench_diff_disjoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_engine/diff_disjoint");

    // Worst case: no common lines, edit distance equals total length
    for lines in [50usize, 200, 500] {
        let before: Vec<String> = (0..lines).map(|i| format!("left {i}")).collect();
        let after: Vec<String> = (0..lines).map(|i| format!("right {i}")).collect();
        let old: Vec<&str> = before.iter().map(String::as_str).collect();
        let new: Vec<&str> = after.iter().map(String::as_str).collect();

        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| diff(black_box(&old), black_box(&new)));
        });
    }

    group.finish();
}

fn bench_build_hunks(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_engine/build_hunks");

    for (name, stride) in [("sparse", 25usize), ("dense", 2)] {
        let before = source_file(500);
        let after = edit_every(&before, stride);
        group.throughput(Throughput::Bytes(before.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| build_hunks(black_box(&before), black_box(&after)));
        });
    }

    group.finish();
}

fn bench_tag_hunks(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_engine/tag_hunks");

    let builder = HunkBuilder::default();
    let grouper = SemanticGrouper::default();
    for functions in [100usize, 1000] {
        let before = source_file(functions);
        let after = edit_every(&before, 5);
        let hunks = builder.build(&before, &after);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{functions}_functions")),
            &hunks,
            |b, hunks| {
                b.iter(|| {
                    let mut tagged = hunks.clone();
                    grouper.tag(&mut tagged, black_box(&after));
                    tagged
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_diff_similar,
    bench_diff_disjoint,
    bench_build_hunks,
    bench_tag_hunks
);
criterion_main!(benches);
