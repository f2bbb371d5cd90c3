//! Batch diff benchmarks
//!
//! Diffing is linear in the batch size; these runs keep it honest for the
//! largest batches the editor loads.
//!
//! Run with: cargo bench --bench diff_benchmarks

use batchgrid::diff;
use batchgrid::experiment::{RowRecord, SampleCode, SampleId};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn persisted(n: usize) -> RowRecord {
    RowRecord::builder()
        .sample_id(SampleId::new(format!("id-{n}")))
        .sample_code(SampleCode::new(format!("Q{n:07}")))
        .sample_name(format!("sample-{n}"))
        .build()
}

/// Every third row changed, every fifth removed, 5% added
fn edit(original: &[RowRecord]) -> Vec<RowRecord> {
    let mut edited: Vec<RowRecord> = original
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 5 != 0)
        .map(|(i, row)| {
            let mut row = row.clone();
            if i % 3 == 0 {
                row.set_comment(Some("edited".to_string()));
            }
            row
        })
        .collect();
    for n in 0..original.len() / 20 {
        edited.push(RowRecord::builder().sample_name(format!("new-{n}")).build());
    }
    edited
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_diff");

    for size in SIZES {
        let original: Vec<RowRecord> = (0..size).map(persisted).collect();
        let edited = edit(&original);
        group.bench_with_input(
            BenchmarkId::new("mixed_edit", size),
            &(original.clone(), edited),
            |b, (original, edited)| {
                b.iter(|| diff(black_box(original), black_box(edited)));
            },
        );
        group.bench_with_input(BenchmarkId::new("unchanged", size), &original, |b, rows| {
            b.iter(|| diff(black_box(rows), black_box(rows)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_diff);
criterion_main!(benches);
