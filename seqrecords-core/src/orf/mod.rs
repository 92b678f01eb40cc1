//! Forward open reading frame detection.
//!
//! Each frame is scanned codon window by codon window. Start and stop windows
//! are paired greedily: the earliest unused start closes on the earliest stop
//! that lies after it, and only the start is consumed, so several starts may
//! close on the same stop. This is a matching policy over codon positions, not
//! a claim about which ORFs are biologically meaningful.

pub mod frame;
pub mod types;


pub use frame::{forward_frame_tables, ReadingFrame, ReadingFrameTable, CODON_LENGTH};
pub use types::{CodonIndexPair, CodonSet, OrfCandidate, OrfConfig, OrfsByFrame};

use crate::seq::location::IndexPair;
use tracing::trace;

/// Find ORF candidates of `seq` in the frame described by `table`.
pub fn find_orfs_in_frame(
    seq: &[u8],
    table: &ReadingFrameTable,
    config: &OrfConfig,
) -> Vec<OrfCandidate> {
    let mut starts: Vec<CodonIndexPair> = Vec::new();
    let mut stops: Vec<CodonIndexPair> = Vec::new();

    for window in table.windows() {
        let codon = window.slice(seq);
        if config.starts.contains(codon) {
            starts.push(window);
        } else if config.stops.contains(codon) {
            stops.push(window);
        }
    }

    let orfs = pair_codons(&starts, &stops);
    trace!(
        frame = table.frame().number(),
        starts = starts.len(),
        stops = stops.len(),
        orfs = orfs.len(),
        "scanned reading frame"
    );
    orfs
}

/// Find ORF candidates of `seq` in all three forward frames.
pub fn find_forward_orfs(seq: &[u8], config: &OrfConfig) -> OrfsByFrame {
    find_orfs_with_tables(seq, &forward_frame_tables(seq.len()), config)
}

/// Like [`find_forward_orfs`] but reusing tables the caller already built.
pub fn find_orfs_with_tables(
    seq: &[u8],
    tables: &[ReadingFrameTable],
    config: &OrfConfig,
) -> OrfsByFrame {
    let mut out = OrfsByFrame::default();
    for table in tables {
        out.insert(table.frame(), find_orfs_in_frame(seq, table, config));
    }
    out
}

/// Greedy two-cursor pairing of ordered start and stop windows.
fn pair_codons(starts: &[CodonIndexPair], stops: &[CodonIndexPair]) -> Vec<OrfCandidate> {
    // stops before the first start can never close an ORF
    let mut stop_idx = match starts.first() {
        Some(first) => stops.partition_point(|stop| stop.start() < first.start()),
        None => 0,
    };
    let mut start_idx = 0usize;
    let mut orfs = Vec::new();

    while start_idx < starts.len() && stop_idx < stops.len() {
        let start = starts[start_idx];
        let stop = stops[stop_idx];
        if start.start() < stop.start() {
            orfs.push(IndexPair::new_unchecked(start.start(), stop.end()));
            start_idx += 1;
        } else {
            stop_idx += 1;
        }
    }

    orfs
}
