//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use active_regions::*;

fn stream_contig(reference: &ReferenceSegment, depth: u64) -> usize {
    let mut store = IndelBuffer::new();
    let sample_id = store.register_sample("bench");
    let mut detector = ActiveRegionDetector::with_max_indel_size(reference, &mut store, 50)
        .expect("valid configuration");
    let contig_len = reference.len() as Pos;
    let mut regions = 0;

    for pos in 0..contig_len {
        for align_id in 0..depth {
            if pos % 97 == 0 && align_id % 2 == 1 {
                detector.insert_mismatch(align_id, pos, b'T').expect("insert");
            } else {
                detector.insert_match(align_id, pos).expect("insert");
            }
        }
        if pos % 301 == 0 {
            let key = IndelKey::deletion(pos, 3);
            for align_id in 0..depth / 2 {
                let observation = IndelObservation::new(key.clone(), IndelObservationData::tier1(align_id));
                detector.insert_indel(sample_id, &observation).expect("insert");
            }
        }
        regions += detector
            .update_end_position(pos, pos + 1 == contig_len)
            .expect("finalize")
            .len();
        detector.update_start_position(pos - 150).expect("evict");
    }
    regions
}

fn benchmark_detector(c: &mut Criterion) {
    let reference = ReferenceSegment::new("chrBench", 0, vec![b'A'; 10_000]);

    c.bench_function("detector_10kb_depth30", |b| {
        b.iter(|| black_box(stream_contig(&reference, 30)));
    });
}

fn benchmark_interval_set(c: &mut Criterion) {
    c.bench_function("interval_set_clustered_inserts", |b| {
        b.iter(|| {
            let mut set = IntervalSet::new();
            for i in 0..10_000i64 {
                let begin = (i / 10) * 40 + (i % 10) * 3;
                set.add(PosRange::new(begin, begin + 4));
                if i % 500 == 0 {
                    set.remove_to_pos(begin - 200);
                }
            }
            black_box(set.len())
        });
    });
}

criterion_group!(benches, benchmark_detector, benchmark_interval_set);
criterion_main!(benches);
