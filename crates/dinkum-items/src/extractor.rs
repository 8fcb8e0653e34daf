//! Extraction pipeline for a Dinkum install.
//!
//! This module chains the phases over the game's asset containers:
//! - Phase 1: item names from the I2 Localization data in `resources.assets`
//! - Phase 2: InventoryItem records from `globalgamemanagers.assets` and
//!   `sharedassets0.assets`, the index -> record table from `level0`
//! - Phase 3: offset calibration, field extraction, assembly and validation
//!
//! ## Example
//!
//! ```ignore
//! use dinkum_items::{DumpLoader, ExtractionProfile, Extractor, GameFiles};
//!
//! let profile = ExtractionProfile::default();
//! let files = GameFiles::locate("/games/Dinkum".as_ref(), &profile)?;
//! let report = Extractor::new(&DumpLoader, &profile).run(&files)?;
//! report.database.save("data/items.json".as_ref())?;
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;
use memchr::memmem;
use tracing::{debug, info};

use crate::binary::ReadBytes;
use crate::calibrate::{CalibratedOffsets, OffsetCalibrator};
use crate::error::{Error, Result};
use crate::export::{ItemDatabase, assemble};
use crate::extract::{FieldExtraction, extract_fields};
use crate::names::{NameTable, scan_name_table};
use crate::profile::ExtractionProfile;
use crate::record::{RecordStore, script_path_id};
use crate::reference::{ReferenceProbe, ReferenceTable, resolve_reference_table};
use crate::source::{AssetObject, ContainerLoader, ObjectType, locate_game_file};
use crate::validate::{ValidationWarning, validate};

/// Container paths for one game install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFiles {
    pub resources: PathBuf,
    pub global_game_managers: PathBuf,
    pub shared_assets: PathBuf,
    pub level: PathBuf,
}

impl GameFiles {
    pub fn locate(game_dir: &Path, profile: &ExtractionProfile) -> Result<Self> {
        if !game_dir.exists() {
            return Err(Error::SourceNotFound(format!(
                "game directory not found: {}",
                game_dir.display()
            )));
        }
        let find = |name: &str| locate_game_file(game_dir, &profile.data_dir, name);
        Ok(Self {
            resources: find("resources.assets")?,
            global_game_managers: find("globalgamemanagers.assets")?,
            shared_assets: find("sharedassets0.assets")?,
            level: find("level0")?,
        })
    }
}

/// Item records with their names and index mapping, ready for calibration
#[derive(Debug, Clone)]
pub struct ItemData {
    pub names: NameTable,
    pub records: RecordStore,
    pub references: ReferenceTable,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub database: ItemDatabase,
    pub offsets: CalibratedOffsets,
    pub fields: FieldExtraction,
    pub warnings: Vec<ValidationWarning>,
}

/// First MonoBehaviour containing the localization marker
pub fn find_localization_data<'o>(objects: &'o [AssetObject], marker: &str) -> Result<&'o [u8]> {
    let finder = memmem::Finder::new(marker.as_bytes());
    objects
        .iter()
        .filter(|o| o.is(ObjectType::MonoBehaviour))
        .find(|o| finder.find(&o.data).is_some())
        .map(|o| o.data.as_slice())
        .ok_or_else(|| {
            Error::StructuralAnchorMissing(format!("no localization data containing '{}'", marker))
        })
}

/// Path id of the MonoScript whose class name is `class_name`
pub fn find_script_id(objects: &[AssetObject], class_name: &str) -> Result<i64> {
    let needle = class_name.as_bytes();
    objects
        .iter()
        .filter(|o| o.is(ObjectType::MonoScript))
        .filter(|o| memmem::find(&o.data, needle).is_some())
        .find(|o| {
            o.data
                .as_slice()
                .read_string(0)
                .is_ok_and(|(name, _)| name == class_name)
        })
        .map(|o| o.path_id)
        .ok_or_else(|| {
            Error::StructuralAnchorMissing(format!("{} MonoScript not found", class_name))
        })
}

/// MonoBehaviours whose script reference is `script_id`
pub fn collect_records(objects: Vec<AssetObject>, script_id: i64) -> RecordStore {
    objects
        .into_iter()
        .filter(|o| o.is(ObjectType::MonoBehaviour))
        .filter(|o| script_path_id(&o.data) == Some(script_id))
        .map(|o| (o.path_id, o.data))
        .collect()
}

pub struct Extractor<'a, L: ContainerLoader> {
    loader: &'a L,
    profile: &'a ExtractionProfile,
}

impl<'a, L: ContainerLoader> Extractor<'a, L> {
    pub fn new(loader: &'a L, profile: &'a ExtractionProfile) -> Self {
        Self { loader, profile }
    }

    /// Phase 1: item id -> name
    pub fn extract_names(&self, resources: &Path) -> Result<NameTable> {
        let objects = self.loader.open(resources)?.objects()?;
        let raw = find_localization_data(&objects, &self.profile.localization_marker)?;
        let names = scan_name_table(raw, &self.profile.key_namespace)?;
        info!("Extracted {} item names", names.len());
        Ok(names)
    }

    /// Phase 2a: all InventoryItem records keyed by path id
    pub fn load_records(&self, global_game_managers: &Path, shared_assets: &Path) -> Result<RecordStore> {
        let scripts = self.loader.open(global_game_managers)?.objects()?;
        let script_id = find_script_id(&scripts, &self.profile.record_class)?;
        debug!("{} MonoScript path id: {}", self.profile.record_class, script_id);

        let objects = self.loader.open(shared_assets)?.objects()?;
        let records = collect_records(objects, script_id);
        info!("Found {} {} objects", records.len(), self.profile.record_class);
        Ok(records)
    }

    /// Phase 2b: item index -> record path id
    pub fn resolve_references(
        &self,
        level: &Path,
        records: &RecordStore,
        item_count: usize,
    ) -> Result<ReferenceTable> {
        let objects = self.loader.open(level)?.objects()?;
        let probe = ReferenceProbe {
            expected_count: item_count,
            window: self.profile.reference_probe_window,
            file_ids: &self.profile.reference_file_ids,
        };
        let candidates = objects
            .iter()
            .filter(|o| o.is(ObjectType::MonoBehaviour))
            .map(|o| o.data.as_slice());
        resolve_reference_table(candidates, &probe, records)
    }

    /// Phases 1 and 2
    pub fn load(&self, files: &GameFiles) -> Result<ItemData> {
        info!("Phase 1: Extracting item names...");
        let names = self.extract_names(&files.resources)?;

        info!("Phase 2: Extracting tool and stack data...");
        let records = self.load_records(&files.global_game_managers, &files.shared_assets)?;
        let references = self.resolve_references(&files.level, &records, names.len())?;

        Ok(ItemData {
            names,
            records,
            references,
        })
    }

    /// Discover the tail offsets of both item fields
    pub fn calibrate(&self, data: &ItemData) -> Result<CalibratedOffsets> {
        OffsetCalibrator::new(&data.references, &data.records)
            .calibrate_items(&self.profile.max_stack, &self.profile.tool)
    }

    /// Calibrate, extract, assemble and validate already loaded data
    pub fn process(&self, data: &ItemData) -> Result<ExtractionReport> {
        let offsets = self.calibrate(data)?;
        let fields = extract_fields(data.names.len(), &data.references, &data.records, &offsets);
        info!(
            "Found {} tools, extracted maxStack for {} items",
            fields.tool_count(),
            fields.fields.len()
        );

        info!("Phase 3: Building output...");
        let database = assemble(
            &data.names,
            &fields,
            &self.profile.durability_overrides,
            Utc::now(),
        );

        let mut warnings: Vec<ValidationWarning> = data
            .names
            .duplicates()
            .iter()
            .map(|&index| ValidationWarning::DuplicateNameKey { index })
            .collect();
        warnings.extend(validate(
            &database,
            &self.profile.max_stack.anchors,
            &self.profile.durability_overrides,
            &self.profile.limits,
        ));

        Ok(ExtractionReport {
            database,
            offsets,
            fields,
            warnings,
        })
    }

    /// Full run; any fatal condition stops before output is produced
    pub fn run(&self, files: &GameFiles) -> Result<ExtractionReport> {
        let data = self.load(files)?;
        self.process(&data)
    }
}
