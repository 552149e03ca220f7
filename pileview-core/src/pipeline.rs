//! End-to-end pileup pipeline
//!
//! Wires the core together: sample reads from a source sequence, map each one
//! against the reference, accumulate the coverage profile, and pack the mapped
//! reads into display rows. One master seed makes the whole run reproducible;
//! each invocation builds fresh outputs with no shared state, so independent
//! pipelines can run side by side.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::coverage::{self, CoverageError, CoverageProfile};
use crate::layout::{self, Layout, LayoutError};
use crate::map::{map_read, MapError, MapParams};
use crate::sample::{reads_for_coverage, sample_reads, SampleError, SampleParams};
use crate::types::{MappedRead, Sequence};

/// Errors that can occur while running the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Sampling failed: {0}")]
    Sample(#[from] SampleError),

    #[error("Mapping failed: {0}")]
    Map(#[from] MapError),

    #[error("Coverage accumulation failed: {0}")]
    Coverage(#[from] CoverageError),

    #[error("Row packing failed: {0}")]
    Layout(#[from] LayoutError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// How many reads to draw from the source sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadCount {
    /// Draw exactly this many reads
    Exact(usize),
    /// Derive the count from a target mean depth over the source
    MeanCoverage(f64),
}

/// Parameters for a full pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineParams {
    pub read_count: ReadCount,
    pub sample: SampleParams,
    pub map: MapParams,
    /// Master seed; sampling and every per-read tie-break derive from it
    pub seed: u64,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            read_count: ReadCount::MeanCoverage(50.0),
            sample: SampleParams::default(),
            map: MapParams::default(),
            seed: 42,
        }
    }
}

/// Everything the rendering layer consumes for one simulated experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct Pileup {
    /// Every sampled read with its mapping outcome, in sampling order
    pub reads: Vec<MappedRead>,
    pub coverage: CoverageProfile,
    pub layout: Layout,
}

// SplitMix64 increment, used to spread per-read RNG seeds apart
const SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// Run the full pipeline: sample from `source`, map against `reference`,
/// accumulate coverage, pack rows.
pub fn run(
    reference: &Sequence,
    source: &Sequence,
    params: &PipelineParams,
) -> PipelineResult<Pileup> {
    let count = match params.read_count {
        ReadCount::Exact(n) => n,
        ReadCount::MeanCoverage(depth) => reads_for_coverage(source.len(), depth, &params.sample),
    };
    log::debug!(
        "Sampling {} reads of {}..={} bp from a {} bp source",
        count,
        params.sample.min_len,
        params.sample.max_len,
        source.len()
    );

    let mut rng = StdRng::seed_from_u64(params.seed);
    let reads = sample_reads(source, count, &params.sample, &mut rng)?;

    // Each read gets its own RNG derived from the master seed and its index,
    // so the mapping step stays bit-identical no matter how rayon schedules it.
    let mapped = reads
        .par_iter()
        .enumerate()
        .map(|(index, read)| {
            let tie_seed = params.seed ^ (index as u64 + 1).wrapping_mul(SEED_MIX);
            let mut read_rng = StdRng::seed_from_u64(tie_seed);
            map_read(read, reference, &params.map, &mut read_rng)
        })
        .collect::<Result<Vec<MappedRead>, MapError>>()?;

    let coverage = coverage::accumulate(&mapped, reference.len())?;
    let layout = layout::pack(&mapped, reference.len())?;

    let placed = layout.placements.len();
    log::info!(
        "Mapped {}/{} reads, mean depth {:.2}, max depth {}, {} rows",
        placed,
        mapped.len(),
        coverage::mean_depth(&coverage),
        coverage::max_depth(&coverage),
        layout.row_count()
    );

    Ok(Pileup {
        reads: mapped,
        coverage,
        layout,
    })
}
