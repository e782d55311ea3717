#![allow(dead_code)]

use active_regions::{
    ActiveRegion, ActiveRegionDetector, IndelBuffer, IndelKey, IndelObservation, IndelObservationData, Pos,
    SampleId,
};

/// Reads are laid over `start..end`; odd alignments carry `alt_base` at every
/// position in `snv_positions`, all others match the reference.
pub fn feed_alternating_snvs(
    detector: &mut ActiveRegionDetector<'_, IndelBuffer>,
    depth: u64,
    start: Pos,
    end: Pos,
    snv_positions: &[Pos],
    alt_base: u8,
) {
    for align_id in 0..depth {
        for pos in start..end {
            if align_id % 2 == 1 && snv_positions.contains(&pos) {
                detector
                    .insert_mismatch(align_id, pos, alt_base)
                    .expect("mismatch accepted");
            } else {
                detector.insert_match(align_id, pos).expect("match accepted");
            }
        }
    }
}

/// Record `key` as observed by `support` tier-1 reads.
pub fn feed_indel(
    detector: &mut ActiveRegionDetector<'_, IndelBuffer>,
    sample_id: SampleId,
    key: &IndelKey,
    support: u64,
) {
    for align_id in 0..support {
        let observation = IndelObservation::new(key.clone(), IndelObservationData::tier1(align_id));
        detector
            .insert_indel(sample_id, &observation)
            .expect("indel accepted");
    }
}

/// Finalize `start..end`, flagging the last position as end of input when
/// `flush` is set. Returns the regions closed along the way.
pub fn finalize_through(
    detector: &mut ActiveRegionDetector<'_, IndelBuffer>,
    start: Pos,
    end: Pos,
    flush: bool,
) -> Vec<ActiveRegion> {
    let mut closed = Vec::new();
    for pos in start..end {
        closed.extend(
            detector
                .update_end_position(pos, flush && pos + 1 == end)
                .expect("finalization in order"),
        );
    }
    closed
}

/// Store with one registered sample.
pub fn single_sample_store() -> (IndelBuffer, SampleId) {
    let mut store = IndelBuffer::new();
    let sample_id = store.register_sample("sample");
    (store, sample_id)
}
