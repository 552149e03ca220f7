//! Row packing for pileup display
//!
//! Greedy interval-graph coloring: reads are swept in start order and dropped
//! into the first display row whose span is still free, so overlapping reads
//! never share a row. For interval graphs this first-fit sweep is optimal —
//! the row count equals the deepest pileup over any reference position.

use bitvec::prelude::*;
use std::ops::Range;

use crate::types::{MappedRead, RefPos};

/// Errors that can occur during row packing
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Mapped read span {start}..{end} exceeds reference length {ref_len}")]
    SpanOutOfBounds {
        start: usize,
        end: usize,
        ref_len: usize,
    },
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Occupancy record for one display row, one bit per reference position.
///
/// Built fresh per [`pack`] call and discarded with the layout; nothing is
/// retained across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    occupied: BitVec,
}

impl Row {
    fn new(ref_len: usize) -> Self {
        Self {
            occupied: bitvec![0; ref_len],
        }
    }

    /// Whether the half-open span is entirely unclaimed in this row.
    pub fn is_free(&self, span: Range<RefPos>) -> bool {
        self.occupied[span].not_any()
    }

    fn claim(&mut self, span: Range<RefPos>) {
        self.occupied[span].fill(true);
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }
}

/// A mapped read assigned to a display row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub read: MappedRead,
    pub row: usize,
}

/// The non-overlapping row layout for a set of mapped reads.
///
/// Placements are in packing order (start ascending, longer reads first among
/// equal starts). Unmapped reads have no position to stack at and are
/// reported separately in `unplaced`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub placements: Vec<Placement>,
    pub rows: Vec<Row>,
    pub unplaced: Vec<MappedRead>,
}

impl Layout {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Pack `mapped_reads` into the minimum number of non-overlapping rows over a
/// reference of length `ref_len`.
///
/// Never fails to place a mapped read; worst case each read gets its own row.
/// A span overrunning the reference is a broken upstream invariant and is
/// reported as an error.
pub fn pack(mapped_reads: &[MappedRead], ref_len: usize) -> LayoutResult<Layout> {
    let mut layout = Layout::default();
    let mut to_place: Vec<&MappedRead> = Vec::with_capacity(mapped_reads.len());

    for mapped in mapped_reads {
        match mapped.span() {
            Some(span) if span.end > ref_len => {
                return Err(LayoutError::SpanOutOfBounds {
                    start: span.start,
                    end: span.end,
                    ref_len,
                });
            }
            Some(_) => to_place.push(mapped),
            None => layout.unplaced.push(mapped.clone()),
        }
    }

    // Sweep order: start ascending, longer reads first among equal starts
    to_place.sort_by(|a, b| {
        a.map_pos
            .cmp(&b.map_pos)
            .then(b.read.len().cmp(&a.read.len()))
    });

    for mapped in to_place {
        // Partitioned above, every read here has a span
        let Some(span) = mapped.span() else { continue };

        let row_index = match layout.rows.iter().position(|row| row.is_free(span.clone())) {
            Some(index) => index,
            None => {
                // All existing rows are taken over this span, open a new one
                layout.rows.push(Row::new(ref_len));
                layout.rows.len() - 1
            }
        };

        layout.rows[row_index].claim(span);
        layout.placements.push(Placement {
            read: mapped.clone(),
            row: row_index,
        });
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage;
    use crate::types::Read;

    fn mapped(bases: &str, pos: usize) -> MappedRead {
        MappedRead::mapped(Read::from(bases), pos, Vec::new())
    }

    #[test]
    fn overlapping_reads_need_two_rows() {
        // Spans [0,4) and [2,6) overlap at positions 2 and 3
        let reads = vec![mapped("AAAA", 0), mapped("CCCC", 2)];
        let layout = pack(&reads, 8).unwrap();
        assert_eq!(layout.row_count(), 2);
    }

    #[test]
    fn adjacent_reads_share_a_row() {
        // Spans [0,2) and [2,4) touch but do not overlap
        let reads = vec![mapped("AA", 0), mapped("CC", 2)];
        let layout = pack(&reads, 6).unwrap();
        assert_eq!(layout.row_count(), 1);
    }

    #[test]
    fn no_row_holds_overlapping_reads() {
        let reads = vec![
            mapped("AAAA", 0),
            mapped("CC", 1),
            mapped("GGG", 3),
            mapped("TT", 3),
            mapped("AA", 6),
        ];
        let layout = pack(&reads, 8).unwrap();

        for a in &layout.placements {
            for b in &layout.placements {
                if std::ptr::eq(a, b) || a.row != b.row {
                    continue;
                }
                let (sa, sb) = (a.read.span().unwrap(), b.read.span().unwrap());
                assert!(
                    sa.end <= sb.start || sb.end <= sa.start,
                    "row {} holds overlapping spans {:?} and {:?}",
                    a.row,
                    sa,
                    sb
                );
            }
        }
    }

    #[test]
    fn row_count_equals_max_pileup_depth() {
        let reads = vec![
            mapped("AAAAA", 0),
            mapped("CCC", 1),
            mapped("GG", 2),
            mapped("TTTT", 4),
            mapped("AA", 8),
        ];
        let layout = pack(&reads, 10).unwrap();

        let profile = coverage::accumulate(&reads, 10).unwrap();
        assert_eq!(layout.row_count(), coverage::max_depth(&profile) as usize);
    }

    #[test]
    fn input_order_does_not_change_row_count() {
        let mut reads = vec![
            mapped("AAAA", 2),
            mapped("CC", 0),
            mapped("GGG", 5),
            mapped("TT", 3),
        ];
        let baseline = pack(&reads, 9).unwrap().row_count();

        reads.reverse();
        assert_eq!(pack(&reads, 9).unwrap().row_count(), baseline);
        reads.swap(0, 2);
        assert_eq!(pack(&reads, 9).unwrap().row_count(), baseline);
    }

    #[test]
    fn longer_read_is_placed_first_among_equal_starts() {
        let reads = vec![mapped("AA", 0), mapped("AAAA", 0)];
        let layout = pack(&reads, 6).unwrap();

        assert_eq!(layout.placements[0].read.read.len(), 4);
        assert_eq!(layout.placements[0].row, 0);
        assert_eq!(layout.placements[1].row, 1);
    }

    #[test]
    fn unmapped_reads_are_reported_separately() {
        let reads = vec![
            mapped("ACGT", 0),
            MappedRead::unmapped(Read::from("TTTTTTTTTT")),
        ];
        let layout = pack(&reads, 8).unwrap();
        assert_eq!(layout.placements.len(), 1);
        assert_eq!(layout.unplaced.len(), 1);
        assert_eq!(layout.row_count(), 1);
    }

    #[test]
    fn overrunning_span_is_rejected() {
        let reads = vec![mapped("AAAA", 6)];
        assert!(matches!(
            pack(&reads, 8),
            Err(LayoutError::SpanOutOfBounds { start: 6, end: 10, ref_len: 8 })
        ));
    }

    #[test]
    fn empty_input_yields_empty_layout() {
        let layout = pack(&[], 4).unwrap();
        assert_eq!(layout.row_count(), 0);
        assert!(layout.placements.is_empty());
        assert!(layout.unplaced.is_empty());
    }
}
