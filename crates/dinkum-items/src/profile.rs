//! Extraction profile: the static domain configuration for one data source.
//!
//! Calibration anchors, durability overrides and validation limits are plain
//! data passed into each phase. [`ExtractionProfile::default`] carries the
//! values for the current Dinkum release; a TOML file can replace any part.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calibrate::{CalibrationTarget, FieldReader, SearchRange};

/// One known-good value used to test candidate offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub index: u32,
    pub expected: i64,
}

/// Item index -> expected raw field value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Anchor>", into = "Vec<Anchor>")]
pub struct AnchorSet(BTreeMap<u32, i64>);

impl AnchorSet {
    pub fn get(&self, index: u32) -> Option<i64> {
        self.0.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Anchors in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (u32, i64)> + '_ {
        self.0.iter().map(|(&index, &expected)| (index, expected))
    }

    /// Number of distinct expected values
    pub fn distinct_values(&self) -> usize {
        let mut values: Vec<i64> = self.0.values().copied().collect();
        values.sort_unstable();
        values.dedup();
        values.len()
    }
}

impl From<Vec<Anchor>> for AnchorSet {
    fn from(anchors: Vec<Anchor>) -> Self {
        Self(anchors.into_iter().map(|a| (a.index, a.expected)).collect())
    }
}

impl From<AnchorSet> for Vec<Anchor> {
    fn from(set: AnchorSet) -> Self {
        set.iter()
            .map(|(index, expected)| Anchor { index, expected })
            .collect()
    }
}

impl FromIterator<(u32, i64)> for AnchorSet {
    fn from_iter<I: IntoIterator<Item = (u32, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Manually confirmed durability for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurabilityOverride {
    pub index: u32,
    pub durability: i32,
}

/// Items whose durability is not stored in maxStack (watering cans track
/// water level, tele items track uses)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DurabilityOverride>", into = "Vec<DurabilityOverride>")]
pub struct OverrideTable(BTreeMap<u32, i32>);

impl OverrideTable {
    pub fn get(&self, index: u32) -> Option<i32> {
        self.0.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, i32)> + '_ {
        self.0.iter().map(|(&index, &durability)| (index, durability))
    }
}

impl From<Vec<DurabilityOverride>> for OverrideTable {
    fn from(overrides: Vec<DurabilityOverride>) -> Self {
        Self(
            overrides
                .into_iter()
                .map(|o| (o.index, o.durability))
                .collect(),
        )
    }
}

impl From<OverrideTable> for Vec<DurabilityOverride> {
    fn from(table: OverrideTable) -> Self {
        table
            .iter()
            .map(|(index, durability)| DurabilityOverride { index, durability })
            .collect()
    }
}

impl FromIterator<(u32, i32)> for OverrideTable {
    fn from_iter<I: IntoIterator<Item = (u32, i32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Thresholds for post-hoc sanity checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Fewer items than this suggests the name scan lost entries
    pub min_items: usize,
    pub min_durability_items: usize,
    pub max_durability_items: usize,
    /// Durability above this is treated as a misread field
    pub max_durability: i32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_items: 1000,
            min_durability_items: 50,
            max_durability_items: 200,
            max_durability: 100_000,
        }
    }
}

/// Static configuration for one extraction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionProfile {
    /// Localization key prefix; the numeric item id follows it
    pub key_namespace: String,
    /// Marker identifying the localization MonoBehaviour
    pub localization_marker: String,
    /// MonoScript class name of the item records
    pub record_class: String,
    /// Unity data directory under the game install
    pub data_dir: String,
    /// Bytes probed at the front of each level object for the item array
    pub reference_probe_window: usize,
    /// Accepted PPtr file ids for the first array entry
    pub reference_file_ids: Vec<i32>,
    pub max_stack: CalibrationTarget,
    pub tool: CalibrationTarget,
    pub durability_overrides: OverrideTable,
    pub limits: ValidationLimits,
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self {
            key_namespace: "InventoryItemNames/InvItem_".to_string(),
            localization_marker: "InventoryItemNames".to_string(),
            record_class: "InventoryItem".to_string(),
            data_dir: "Dinkum_Data".to_string(),
            reference_probe_window: 500,
            reference_file_ids: vec![0, 1, 2, 3, 4],
            max_stack: CalibrationTarget {
                field: "maxStack".to_string(),
                anchors: [
                    (0, 150),     // Basic Axe
                    (3, 2500),    // Chainsaw
                    (119, 3),     // First Aid Kit
                    (1728, 3500), // Har-Vac
                    (1972, 4),    // Blistering Bottle
                ]
                .into_iter()
                .collect(),
                search: SearchRange::new(100, 300, 4),
                reader: FieldReader::I32,
            },
            tool: CalibrationTarget {
                field: "isATool".to_string(),
                anchors: [
                    (0, 1),    // Basic Axe
                    (3, 1),    // Chainsaw
                    (119, 1),  // First Aid Kit
                    (1728, 1), // Har-Vac
                    (1, 0),    // Megaphone
                    (12, 0),   // Bag of Cement
                    (13, 0),   // BBQ
                    (17, 0),   // Bush Lime
                ]
                .into_iter()
                .collect(),
                search: SearchRange::new(100, 300, 1),
                reader: FieldReader::Byte,
            },
            // Confirmed from a creative-mode save where items spawn at max durability
            durability_overrides: [
                (10, 20),   // Watering Can
                (699, 60),  // Copper Watering Can
                (701, 120), // Iron Watering Can
                (711, 15),  // Tele Caller
                (1761, 30), // Tele-Jumper
            ]
            .into_iter()
            .collect(),
            limits: ValidationLimits::default(),
        }
    }
}

impl ExtractionProfile {
    /// Token that starts every localization key, e.g. `InventoryItemNames`
    pub fn namespace_token(&self) -> &str {
        self.key_namespace
            .split('/')
            .next()
            .unwrap_or(&self.key_namespace)
    }
}
