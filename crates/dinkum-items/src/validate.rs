//! Post-extraction sanity checks.
//!
//! Findings are reported as warnings; they never change the exported
//! document or abort the run.

use thiserror::Error;

use crate::export::ItemDatabase;
use crate::profile::{AnchorSet, OverrideTable, ValidationLimits};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("Suspiciously few items: {count} (expected at least {min})")]
    TooFewItems { count: usize, min: usize },

    #[error("Unexpected durability item count: {count} (expected {min}..={max})")]
    DurabilityCountOutOfRange { count: usize, min: usize, max: usize },

    #[error("Item {index} ({name}): non-positive durability {value}")]
    NonPositiveDurability { index: u32, name: String, value: i32 },

    #[error("Item {index} ({name}): suspiciously high durability {value}")]
    ExcessiveDurability { index: u32, name: String, value: i32 },

    #[error("Calibration item {index} missing from output")]
    AnchorMissing { index: u32 },

    #[error("Calibration mismatch: item {index} expected {expected}, got {}", value_or_none(.actual))]
    AnchorMismatch {
        index: u32,
        expected: i64,
        actual: Option<i32>,
    },

    #[error("Override item {index} missing from output")]
    OverrideMissing { index: u32 },

    #[error("Override mismatch: item {index} expected {expected}, got {}", value_or_none(.actual))]
    OverrideMismatch {
        index: u32,
        expected: i32,
        actual: Option<i32>,
    },

    #[error("Localization key for item {index} appeared more than once; the last name was kept")]
    DuplicateNameKey { index: u32 },
}

fn value_or_none(value: &Option<i32>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

/// Check counts, durability ranges and calibration/override drift.
///
/// `stack_anchors` are compared against the exported durability: every
/// max-stack anchor is a tool, so its durability must equal the anchor.
pub fn validate(
    db: &ItemDatabase,
    stack_anchors: &AnchorSet,
    overrides: &OverrideTable,
    limits: &ValidationLimits,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if db.items.len() < limits.min_items {
        warnings.push(ValidationWarning::TooFewItems {
            count: db.items.len(),
            min: limits.min_items,
        });
    }

    let with_durability = db.durability_items().count();
    if with_durability < limits.min_durability_items
        || with_durability > limits.max_durability_items
    {
        warnings.push(ValidationWarning::DurabilityCountOutOfRange {
            count: with_durability,
            min: limits.min_durability_items,
            max: limits.max_durability_items,
        });
    }

    for (index, entry, value) in db.durability_items() {
        if value <= 0 {
            warnings.push(ValidationWarning::NonPositiveDurability {
                index,
                name: entry.name.clone(),
                value,
            });
        }
        if value > limits.max_durability {
            warnings.push(ValidationWarning::ExcessiveDurability {
                index,
                name: entry.name.clone(),
                value,
            });
        }
    }

    for (index, expected) in stack_anchors.iter() {
        match db.items.get(&index) {
            None => warnings.push(ValidationWarning::AnchorMissing { index }),
            Some(entry) if entry.max_durability.map(i64::from) != Some(expected) => {
                warnings.push(ValidationWarning::AnchorMismatch {
                    index,
                    expected,
                    actual: entry.max_durability,
                })
            }
            Some(_) => {}
        }
    }

    for (index, expected) in overrides.iter() {
        match db.items.get(&index) {
            None => warnings.push(ValidationWarning::OverrideMissing { index }),
            Some(entry) if entry.max_durability != Some(expected) => {
                warnings.push(ValidationWarning::OverrideMismatch {
                    index,
                    expected,
                    actual: entry.max_durability,
                })
            }
            Some(_) => {}
        }
    }

    warnings
}
