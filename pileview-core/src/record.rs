//! Fixture records
//!
//! A small JSON record format for persisting mapped reads and their row
//! assignments as reproducible test fixtures. The field names (`read`,
//! `mapPos`, `mismatches`, `row`) and the `-1` unmapped sentinel follow the
//! rendering layer's convention; inside the core the unmapped state is
//! `map_pos == None`. No versioning guarantees.

use serde::{Deserialize, Serialize};
use std::io;

use crate::layout::Layout;
use crate::types::{MappedRead, Read};

/// Errors that can occur reading or writing fixture records
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

pub type RecordResult<T> = Result<T, RecordError>;

/// One mapped read as stored in a fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRecord {
    pub read: String,
    /// Reference offset, `-1` for an unmapped read
    #[serde(rename = "mapPos")]
    pub map_pos: i64,
    pub mismatches: Vec<usize>,
    /// Display row, absent when no layout was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl ReadRecord {
    pub fn new(mapped: &MappedRead, row: Option<usize>) -> Self {
        Self {
            read: mapped.read.to_string(),
            map_pos: mapped.map_pos.map_or(-1, |pos| pos as i64),
            mismatches: mapped.mismatches.clone(),
            row,
        }
    }

    /// Convert back into a core [`MappedRead`], validating the invariants the
    /// serialized form cannot express.
    pub fn to_mapped_read(&self) -> RecordResult<MappedRead> {
        let read = Read::from(self.read.as_str());

        if self.map_pos < -1 {
            return Err(RecordError::InvalidRecord(format!(
                "mapPos {} is neither a reference offset nor the -1 sentinel",
                self.map_pos
            )));
        }
        if self.map_pos == -1 {
            if !self.mismatches.is_empty() {
                return Err(RecordError::InvalidRecord(
                    "unmapped record carries mismatch offsets".to_string(),
                ));
            }
            return Ok(MappedRead::unmapped(read));
        }

        if self.mismatches.iter().any(|&m| m >= read.len()) {
            return Err(RecordError::InvalidRecord(format!(
                "mismatch offset out of range for a {} bp read",
                read.len()
            )));
        }
        if self.mismatches.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RecordError::InvalidRecord(
                "mismatch offsets must be strictly ascending".to_string(),
            ));
        }

        Ok(MappedRead {
            read,
            map_pos: Some(self.map_pos as usize),
            mismatches: self.mismatches.clone(),
        })
    }
}

/// Snapshot a layout as records, placed reads first, unplaced after.
pub fn records_from_layout(layout: &Layout) -> Vec<ReadRecord> {
    layout
        .placements
        .iter()
        .map(|p| ReadRecord::new(&p.read, Some(p.row)))
        .chain(layout.unplaced.iter().map(|r| ReadRecord::new(r, None)))
        .collect()
}

pub fn write_records<W: io::Write>(writer: W, records: &[ReadRecord]) -> RecordResult<()> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

pub fn read_records<R: io::Read>(reader: R) -> RecordResult<Vec<ReadRecord>> {
    let records: Vec<ReadRecord> = serde_json::from_reader(reader)?;
    // Surface invariant violations at load time, not at first use
    for record in &records {
        record.to_mapped_read()?;
    }
    Ok(records)
}
