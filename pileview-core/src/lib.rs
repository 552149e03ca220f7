//! Pileview Core Library
//!
//! Read sampling, approximate mapping, coverage profiles, and row layout for
//! Pileview. The rendering layer consumes the structures produced here; it
//! never reaches back into the core, and every pipeline run builds fresh
//! outputs from explicit inputs.

pub mod types;
pub mod sample;
pub mod map;
pub mod coverage;
pub mod layout;
pub mod pipeline;
pub mod record;

// Re-export commonly used types and functions
pub use types::{MappedRead, Read, RefPos, Sequence};
pub use sample::{reads_for_coverage, sample_reads, SampleError, SampleParams};
pub use map::{map_read, MapError, MapParams};
pub use coverage::{accumulate, max_depth, mean_depth, CoverageError, CoverageProfile};
pub use layout::{pack, Layout, LayoutError, Placement, Row};
pub use pipeline::{run, Pileup, PipelineError, PipelineParams, ReadCount};
pub use record::{read_records, write_records, ReadRecord, RecordError};

/// Version information for the Pileview core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
