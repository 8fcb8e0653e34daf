//! # dinkum-items
//!
//! Item data extraction for Dinkum.
//!
//! This crate provides:
//! - Bounds-checked parsing of variable-length InventoryItem records
//! - Item name recovery from the I2 Localization term table
//! - Offset auto-calibration against items with known field values
//! - Assembly, validation and JSON export of the item database
//!
//! Reading Unity containers is delegated to a [`ContainerLoader`]; the
//! built-in [`DumpLoader`] works on raw object dumps.

pub mod binary;
pub mod calibrate;
pub mod error;
pub mod export;
pub mod extract;
pub mod extractor;
pub mod names;
pub mod profile;
pub mod record;
pub mod reference;
pub mod source;
pub mod validate;

pub use binary::{ReadBytes, align4};
pub use calibrate::{
    CalibratedOffsets, CalibrationTarget, FieldReader, OffsetCalibrator, SearchRange,
};
pub use error::{Error, Result};
pub use export::{ExtractionMeta, ItemDatabase, ItemEntry, TOOL_VERSION, assemble, max_durability};
pub use extract::{FieldExtraction, ItemFields, extract_fields};
pub use extractor::{
    ExtractionReport, Extractor, GameFiles, ItemData, collect_records, find_localization_data,
    find_script_id,
};
pub use names::{NameTable, scan_name_table, strip_placeholders};
pub use profile::{
    Anchor, AnchorSet, DurabilityOverride, ExtractionProfile, OverrideTable, ValidationLimits,
};
pub use record::{RecordStore, script_path_id, tail_start};
pub use reference::{ReferenceProbe, ReferenceTable, resolve_reference_table};
pub use source::{
    AssetContainer, AssetObject, ContainerLoader, DumpContainer, DumpLoader, MemoryContainer,
    ObjectType, locate_game_file,
};
pub use validate::{ValidationWarning, validate};
