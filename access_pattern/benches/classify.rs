//! Classification of long segments.
//!
//! Read-only segments with a leading account read additionally pay for the
//! normalization.

use access_pattern::{classify, testing_utils::segment, Segment, TraceKind::*};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

fn write(len: usize) -> Segment {
    segment(
        [ReadZeroST, ReadNonZeroST, InsertionST, UpdateST, DeletionST]
            .into_iter()
            .cycle()
            .take(len)
            .chain([UpdateWS]),
    )
}

fn redeploy(len: usize) -> Segment {
    segment(
        [ReadNonZeroST, ReadZeroST]
            .into_iter()
            .cycle()
            .take(len / 2)
            .chain([DeletionWS])
            .chain([InsertionST, ReadZeroST].into_iter().cycle().take(len / 2))
            .chain([InsertionWS]),
    )
}

fn read_first(len: usize) -> Segment {
    segment(
        [ReadNonZeroWS]
            .into_iter()
            .chain([ReadZeroST, ReadNonZeroST].into_iter().cycle().take(len)),
    )
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for len in [16, 256, 4096] {
        for (name, build) in [
            ("write", write as fn(usize) -> Segment),
            ("redeploy", redeploy),
            ("read-first", read_first),
        ] {
            let input = build(len);
            group.bench_function(format!("{name}, {len} storage traces"), |b| {
                b.iter_batched(
                    || input.clone(),
                    |mut segment| classify(&mut segment).unwrap(),
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish()
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = criterion_benchmark);
criterion_main!(benches);
