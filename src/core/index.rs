//! Variable selection: which keys become grid rows/columns, and in what order.

use crate::core::dataset::{Dataset, Key};
use crate::error::PairsError;

/// Resolve the ordered variable set.
///
/// Explicit `indices` are used verbatim (duplicates included). Otherwise every key of
/// `dataset` is used in its natural order. `truths` and `labels`, when present, must
/// have exactly one entry per resolved variable.
pub fn resolve_indices<D: Dataset + ?Sized>(
    dataset: &D,
    indices: Option<&[Key]>,
    truths: Option<&[f64]>,
    labels: Option<&[String]>,
) -> Result<Vec<Key>, PairsError> {
    let keys = match indices {
        Some(explicit) => explicit.to_vec(),
        None => dataset.keys(),
    };

    if keys.is_empty() {
        return Err(PairsError::ContractViolation(
            "at least one variable is required".to_string(),
        ));
    }
    if let Some(truths) = truths {
        if truths.len() != keys.len() {
            return Err(PairsError::ContractViolation(format!(
                "expected {} truths, got {}",
                keys.len(),
                truths.len()
            )));
        }
    }
    if let Some(labels) = labels {
        if labels.len() != keys.len() {
            return Err(PairsError::ContractViolation(format!(
                "expected {} labels, got {}",
                keys.len(),
                labels.len()
            )));
        }
    }
    Ok(keys)
}

/// Look up every key up front so a bad key fails before any panel is drawn.
pub fn fetch_series<'d, D: Dataset + ?Sized>(
    dataset: &'d D,
    keys: &[Key],
) -> Result<Vec<&'d [f64]>, PairsError> {
    keys.iter()
        .map(|key| {
            dataset
                .series(key)
                .ok_or_else(|| PairsError::IndexResolution { key: key.clone() })
        })
        .collect()
}

/// Display label per variable: the caller's label if given, else the key itself.
pub fn display_labels(keys: &[Key], labels: Option<&[String]>) -> Vec<String> {
    match labels {
        Some(labels) => labels.to_vec(),
        None => keys.iter().map(Key::to_string).collect(),
    }
}
