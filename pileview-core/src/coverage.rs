//! Coverage accumulation
//!
//! Folds a set of mapped reads into a per-position depth array over the
//! reference. Pure functions over immutable inputs; the profile is rebuilt
//! from scratch whenever the mapped-read set changes.

use crate::types::MappedRead;

/// Per-position read depth, one entry per reference position.
pub type CoverageProfile = Vec<u32>;

/// Errors that can occur while accumulating coverage
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    #[error("Mapped read span {start}..{end} exceeds reference length {ref_len}")]
    SpanOutOfBounds {
        start: usize,
        end: usize,
        ref_len: usize,
    },
}

pub type CoverageResult<T> = Result<T, CoverageError>;

/// Accumulate the depth profile of `mapped_reads` over a reference of length
/// `ref_len`.
///
/// Unmapped reads carry no position and are skipped; folding them in would
/// corrupt the array. A mapped span that overruns the reference is a broken
/// upstream invariant and is surfaced as an error instead of being clipped.
pub fn accumulate(mapped_reads: &[MappedRead], ref_len: usize) -> CoverageResult<CoverageProfile> {
    let mut coverage = vec![0u32; ref_len];

    for mapped in mapped_reads {
        let Some(span) = mapped.span() else {
            continue;
        };
        if span.end > ref_len {
            return Err(CoverageError::SpanOutOfBounds {
                start: span.start,
                end: span.end,
                ref_len,
            });
        }
        for depth in &mut coverage[span] {
            *depth += 1;
        }
    }

    Ok(coverage)
}

/// The deepest pileup anywhere on the profile.
pub fn max_depth(coverage: &[u32]) -> u32 {
    coverage.iter().copied().max().unwrap_or(0)
}

/// Mean depth across the whole profile, 0.0 for an empty reference.
pub fn mean_depth(coverage: &[u32]) -> f64 {
    if coverage.is_empty() {
        return 0.0;
    }
    coverage.iter().map(|&d| d as u64).sum::<u64>() as f64 / coverage.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Read;

    fn mapped(bases: &str, pos: usize) -> MappedRead {
        MappedRead::mapped(Read::from(bases), pos, Vec::new())
    }

    #[test]
    fn counts_every_covered_position() {
        let reads = vec![mapped("ACGT", 0), mapped("GTAC", 2), mapped("AC", 6)];
        let coverage = accumulate(&reads, 8).unwrap();
        assert_eq!(coverage, vec![1, 1, 2, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn matches_brute_force_membership_count() {
        let reads = vec![mapped("AAA", 1), mapped("AAAAA", 0), mapped("AA", 4)];
        let coverage = accumulate(&reads, 6).unwrap();

        for (pos, &depth) in coverage.iter().enumerate() {
            let expected = reads
                .iter()
                .filter(|r| r.span().is_some_and(|s| s.contains(&pos)))
                .count() as u32;
            assert_eq!(depth, expected, "depth mismatch at position {}", pos);
        }
    }

    #[test]
    fn unmapped_reads_are_skipped() {
        let reads = vec![
            mapped("ACG", 0),
            MappedRead::unmapped(Read::from("TTTT")),
            mapped("CG", 1),
        ];
        let coverage = accumulate(&reads, 4).unwrap();
        assert_eq!(coverage, vec![1, 2, 2, 0]);
    }

    #[test]
    fn no_reads_yields_all_zeroes() {
        let coverage = accumulate(&[], 5).unwrap();
        assert_eq!(coverage, vec![0; 5]);
    }

    #[test]
    fn overrunning_span_is_rejected() {
        let reads = vec![mapped("ACGT", 3)];
        let err = accumulate(&reads, 5).unwrap_err();
        assert!(matches!(
            err,
            CoverageError::SpanOutOfBounds { start: 3, end: 7, ref_len: 5 }
        ));
    }

    #[test]
    fn depth_summaries() {
        let reads = vec![mapped("AAAA", 0), mapped("AA", 1)];
        let coverage = accumulate(&reads, 4).unwrap();
        assert_eq!(max_depth(&coverage), 2);
        assert!((mean_depth(&coverage) - 1.5).abs() < 1e-9);
        assert_eq!(max_depth(&[]), 0);
        assert_eq!(mean_depth(&[]), 0.0);
    }
}
