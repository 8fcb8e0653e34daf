//! Offset calibration against records with known field values.
//!
//! The tail of an InventoryItem is a densely packed run of fixed-width fields
//! whose order is not documented and shifts between game updates. For each
//! field we know the value for a handful of items (anchors). A candidate
//! offset, measured from each record's own tail start, is accepted when every
//! anchor reads back its expected value there.
//!
//! Candidates are tried in ascending order and the first fully agreeing one
//! wins. With too few distinct anchor values a smaller, unrelated offset can
//! agree by accident, so each target should cover both zero and non-zero
//! cases.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info, warn};

use crate::binary::ReadBytes;
use crate::error::{Error, Result};
use crate::profile::AnchorSet;
use crate::record::{RecordStore, tail_start};
use crate::reference::ReferenceTable;

/// How a candidate field is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum FieldReader {
    /// Little-endian signed 32-bit integer
    #[strum(serialize = "i32")]
    I32,
    /// Single byte (booleans)
    #[strum(serialize = "byte")]
    Byte,
}

impl FieldReader {
    pub fn read(self, raw: &[u8], offset: usize) -> Result<i64> {
        match self {
            FieldReader::I32 => raw.read_i32(offset).map(i64::from),
            FieldReader::Byte => raw.read_u8(offset).map(i64::from),
        }
    }
}

/// Half-open candidate range `start..end` visited every `step` bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRange {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl SearchRange {
    pub fn new(start: usize, end: usize, step: usize) -> Self {
        Self { start, end, step }
    }

    /// Candidates in ascending order
    pub fn candidates(&self) -> impl Iterator<Item = usize> {
        (self.start..self.end).step_by(self.step.max(1))
    }
}

impl fmt::Display for SearchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} step {}", self.start, self.end, self.step.max(1))
    }
}

/// One field to locate inside the record tail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationTarget {
    /// Name used in logs and errors
    pub field: String,
    pub anchors: AnchorSet,
    pub search: SearchRange,
    pub reader: FieldReader,
}

impl CalibrationTarget {
    /// Anchors cover at least two distinct values. Without this a constant
    /// byte elsewhere in the tail can agree with every anchor.
    pub fn is_discriminating(&self) -> bool {
        self.anchors.distinct_values() >= 2
    }
}

/// Tail-relative offsets discovered for the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibratedOffsets {
    pub max_stack: usize,
    pub tool: usize,
}

/// Anchor record prepared for repeated probing
struct AnchorProbe<'a> {
    index: u32,
    raw: &'a [u8],
    tail: Option<usize>,
    expected: i64,
}

pub struct OffsetCalibrator<'a> {
    references: &'a ReferenceTable,
    records: &'a RecordStore,
}

impl<'a> OffsetCalibrator<'a> {
    pub fn new(references: &'a ReferenceTable, records: &'a RecordStore) -> Self {
        Self {
            references,
            records,
        }
    }

    /// Find the lowest candidate offset at which every anchor agrees
    pub fn calibrate(&self, target: &CalibrationTarget) -> Result<usize> {
        if target.anchors.is_empty() {
            return Err(Error::NoAnchors(target.field.clone()));
        }
        if !target.is_discriminating() {
            warn!(
                "{} anchors all expect the same value; the calibrated offset may be a false match",
                target.field
            );
        }
        let probes = self.prepare_anchors(target)?;
        debug!(
            "Calibrating {} with {} anchors over {} ({} reader)",
            target.field,
            probes.len(),
            target.search,
            target.reader
        );

        for candidate in target.search.candidates() {
            if probes
                .iter()
                .all(|probe| Self::agrees_at(probe, candidate, target.reader))
            {
                info!(
                    "Calibrated {} offset: +{} from fixed data start",
                    target.field, candidate
                );
                return Ok(candidate);
            }
        }

        Err(Error::CalibrationFailed {
            field: target.field.clone(),
            range: target.search.to_string(),
        })
    }

    /// Calibrate both item fields
    pub fn calibrate_items(
        &self,
        max_stack: &CalibrationTarget,
        tool: &CalibrationTarget,
    ) -> Result<CalibratedOffsets> {
        Ok(CalibratedOffsets {
            max_stack: self.calibrate(max_stack)?,
            tool: self.calibrate(tool)?,
        })
    }

    fn prepare_anchors(&self, target: &CalibrationTarget) -> Result<Vec<AnchorProbe<'a>>> {
        target
            .anchors
            .iter()
            .map(|(index, expected)| {
                let raw = self
                    .references
                    .get(index)
                    .and_then(|path_id| self.records.get(path_id))
                    .ok_or_else(|| {
                        Error::StructuralAnchorMissing(format!(
                            "{} calibration item {} does not resolve to an item record",
                            target.field, index
                        ))
                    })?;
                let tail = match tail_start(raw) {
                    Ok(tail) => Some(tail),
                    Err(e) => {
                        debug!("Anchor item {} has an unreadable header: {}", index, e);
                        None
                    }
                };
                Ok(AnchorProbe {
                    index,
                    raw,
                    tail,
                    expected,
                })
            })
            .collect()
    }

    fn agrees_at(probe: &AnchorProbe<'_>, candidate: usize, reader: FieldReader) -> bool {
        let Some(tail) = probe.tail else {
            return false;
        };
        match reader.read(probe.raw, tail + candidate) {
            Ok(value) => value == probe.expected,
            Err(_) => {
                debug!(
                    "Anchor item {} too short for candidate +{}",
                    probe.index, candidate
                );
                false
            }
        }
    }
}
