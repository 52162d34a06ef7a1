//! Performance benchmarks for the decoding pipeline
//!
//! Covers candidate construction, distance pruning and a full single-pass
//! and two-phase decode over synthetic documents of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use discourse_core::decoding::{build_candidates, prune_by_distance, TracingSink};
use discourse_core::{
    decode, Datapack, DecodingMode, Edu, EduId, LocalDecoder, MaxDistTable, Models, SentenceComposer,
    StructuralDecoder, Team,
};

/// Chain-shaped document of `n` units, four per sentence, with every ordered
/// pair of units as a pairing
fn create_test_document(n: usize) -> Datapack {
    let name = |i: usize| if i == 0 { "ROOT".to_string() } else { format!("e{}", i) };
    let edus = (1..=n)
        .map(|i| Edu::new(name(i), i, format!("s{}", (i - 1) / 4), "doc"))
        .collect();

    let mut pairings = Vec::new();
    let mut gold = Vec::new();
    for target in 1..=n {
        for source in 0..=n {
            if source == target {
                continue;
            }
            pairings.push((EduId::from(name(source)), EduId::from(name(target))));
            let label = match (source + 1 == target, source) {
                (true, 0) => "ROOT",
                (true, _) => "elaboration",
                (false, _) => "UNRELATED",
            };
            gold.push(label.to_string());
        }
    }
    Datapack::new(edus, pairings, Vec::new(), gold).expect("valid synthetic document")
}

/// Benchmark 1: candidate construction
fn bench_build_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_candidates");
    let team = Team::oracle();

    for size in [10, 40, 80] {
        let dpack = create_test_document(size);
        group.throughput(Throughput::Elements(dpack.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &dpack, |b, dpack| {
            b.iter(|| build_candidates(black_box(dpack), &team, DecodingMode::Joint, None, &TracingSink))
        });
    }
    group.finish();
}

/// Benchmark 2: distance pruning
fn bench_prune(c: &mut Criterion) {
    let mut group = c.benchmark_group("prune_by_distance");
    let mut table = MaxDistTable::new();
    table.insert("elaboration", 3, 8);

    for size in [10, 40, 80] {
        let dpack = create_test_document(size);
        let cands = build_candidates(&dpack, &Team::oracle(), DecodingMode::Joint, None, &TracingSink)
            .expect("oracle candidates");
        group.throughput(Throughput::Elements(cands.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &cands, |b, cands| {
            b.iter(|| prune_by_distance(&dpack, black_box(cands.clone()), Some(&table), &TracingSink))
        });
    }
    group.finish();
}

/// Benchmark 3: full decode, single pass vs sentence then document
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let models = Models::from(Team::oracle());
    let decoders = [
        ("vanilla", StructuralDecoder::whole(LocalDecoder::new(0.5))),
        ("intra_inter", StructuralDecoder::intra_inter(SentenceComposer::new(LocalDecoder::new(0.5)))),
    ];

    for size in [10, 40] {
        let dpack = create_test_document(size);
        for (name, decoder) in &decoders {
            group.bench_with_input(BenchmarkId::new(*name, size), &dpack, |b, dpack| {
                b.iter(|| decode(black_box(dpack), &models, decoder, DecodingMode::PostLabel, None))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_build_candidates, bench_prune, bench_decode);
criterion_main!(benches);
