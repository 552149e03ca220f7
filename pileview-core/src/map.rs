//! Approximate read mapping
//!
//! Brute-force bounded-mismatch substring search: every candidate start on the
//! reference is scored by its full mismatch set, the best candidate wins, and
//! ties are broken uniformly at random through the injected RNG. Sequencing
//! ambiguity is modeled on purpose; a fixed seed makes it reproducible.

use rand::Rng;

use crate::types::{MappedRead, Read, RefPos, Sequence};

/// Errors that can occur during mapping
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Reference sequence is empty")]
    EmptyReference,
}

pub type MapResult<T> = Result<T, MapError>;

/// Parameters for read mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapParams {
    /// Per-candidate mismatch budget. A candidate position whose mismatch
    /// count exceeds the budget is excluded from selection entirely; with a
    /// budget set, a read can come back unmapped even though it fits on the
    /// reference. `None` disables filtering.
    pub max_mismatches: Option<usize>,
}

/// Map `read` against `reference`.
///
/// Scans every candidate start position in `[0, ref_len - read_len]` and
/// records the offsets where the read disagrees with the reference. The
/// candidate with the fewest mismatches wins; equally good candidates are
/// resolved with one uniform draw from `rng` (two-phase: deterministic
/// grouping first, then the draw — never a randomized sort comparator).
///
/// A read longer than the reference is a normal outcome, not an error: it
/// yields the unmapped result, as does exhausting every candidate under
/// [`MapParams::max_mismatches`].
pub fn map_read<R: Rng>(
    read: &Read,
    reference: &Sequence,
    params: &MapParams,
    rng: &mut R,
) -> MapResult<MappedRead> {
    if reference.is_empty() {
        return Err(MapError::EmptyReference);
    }
    if read.len() > reference.len() {
        return Ok(MappedRead::unmapped(read.clone()));
    }

    let ref_bytes = reference.as_bytes();
    let read_bytes = read.as_bytes();

    // Phase 1: score every candidate start position.
    let mut candidates: Vec<(RefPos, Vec<usize>)> = Vec::new();
    for start in 0..=ref_bytes.len() - read_bytes.len() {
        let mut mismatches = Vec::new();
        let mut over_budget = false;

        for (offset, (&r, &q)) in ref_bytes[start..start + read_bytes.len()]
            .iter()
            .zip(read_bytes)
            .enumerate()
        {
            if r != q {
                mismatches.push(offset);
                // The candidate is already dead, no point counting further
                if params.max_mismatches.is_some_and(|max| mismatches.len() > max) {
                    over_budget = true;
                    break;
                }
            }
        }

        if !over_budget {
            candidates.push((start, mismatches));
        }
    }

    if candidates.is_empty() {
        return Ok(MappedRead::unmapped(read.clone()));
    }

    // Phase 2: keep the minimum-mismatch group, draw one member uniformly.
    let best = candidates
        .iter()
        .map(|(_, mismatches)| mismatches.len())
        .min()
        .unwrap_or(0);
    let tied: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, (_, mismatches))| mismatches.len() == best)
        .map(|(idx, _)| idx)
        .collect();

    let chosen = tied[rng.gen_range(0..tied.len())];
    let (map_pos, mismatches) = candidates.swap_remove(chosen);

    Ok(MappedRead::mapped(read.clone(), map_pos, mismatches))
}
