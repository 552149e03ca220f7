//! Read sampling
//!
//! Draws random substrings from a source sequence to emulate a short-read
//! sequencing experiment. All randomness comes from a caller-provided RNG so
//! a fixed seed reproduces the same read set.

use rand::Rng;

use crate::types::{Read, Sequence};

/// Errors that can occur while sampling reads
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("Invalid sampling parameters: {0}")]
    InvalidParams(String),
}

pub type SampleResult<T> = Result<T, SampleError>;

/// Read-length bounds for sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleParams {
    /// Minimum read length, inclusive
    pub min_len: usize,
    /// Maximum read length, inclusive
    pub max_len: usize,
}

impl Default for SampleParams {
    fn default() -> Self {
        // Demo-scale defaults: a few letters per read
        Self {
            min_len: 3,
            max_len: 7,
        }
    }
}

impl SampleParams {
    fn validate(&self, source_len: usize) -> SampleResult<()> {
        if source_len == 0 {
            return Err(SampleError::InvalidParams("source sequence is empty".to_string()));
        }
        if self.min_len == 0 {
            return Err(SampleError::InvalidParams("min_len must be positive".to_string()));
        }
        if self.min_len > self.max_len {
            return Err(SampleError::InvalidParams(format!(
                "min_len ({}) exceeds max_len ({})",
                self.min_len, self.max_len
            )));
        }
        if self.max_len > source_len {
            return Err(SampleError::InvalidParams(format!(
                "max_len ({}) exceeds source length ({})",
                self.max_len, source_len
            )));
        }
        Ok(())
    }
}

/// Draw `count` reads from `source`.
///
/// Each draw picks a length uniformly in `[min_len, max_len]`, then a start
/// offset uniformly among the positions where a read of that length still
/// fits, so every read is a full-length substring of the source.
pub fn sample_reads<R: Rng>(
    source: &Sequence,
    count: usize,
    params: &SampleParams,
    rng: &mut R,
) -> SampleResult<Vec<Read>> {
    params.validate(source.len())?;

    let mut reads = Vec::with_capacity(count);
    for _ in 0..count {
        let len = rng.gen_range(params.min_len..=params.max_len);
        let start = rng.gen_range(0..=source.len() - len);

        // In bounds by construction of `start`
        let read = source
            .subsequence(start..start + len)
            .ok_or_else(|| SampleError::InvalidParams("sampled read out of bounds".to_string()))?;
        reads.push(read);
    }

    Ok(reads)
}

/// How many reads to draw so the expected mean depth reaches
/// `mean_coverage`: `ceil(source_len * coverage / avg_read_len)`.
///
/// A caller-level convenience, not a core invariant; the raw count overload of
/// [`sample_reads`] is always available.
pub fn reads_for_coverage(source_len: usize, mean_coverage: f64, params: &SampleParams) -> usize {
    let avg_read_len = (params.min_len + params.max_len) as f64 / 2.0;
    (source_len as f64 * mean_coverage / avg_read_len).ceil() as usize
}
