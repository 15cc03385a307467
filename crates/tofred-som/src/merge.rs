//! Attribute merge policy for results built from one or more sets.

use tofred_core::{AttributeKeys, OperationRecord};

use crate::attrs::AttrValue;
use crate::model::SpectrumSet;

/// Copies attributes from `sources` into `result`, in order.
///
/// For an ordinary key a later source overwrites an earlier one. The
/// provenance log key is never overwritten: entries from every source are
/// concatenated in source order. Binary operations pass `[right, left]` so
/// that the left operand's attributes win.
pub fn merge_attributes(result: &mut SpectrumSet, sources: &[&SpectrumSet], keys: &AttributeKeys) {
    let mut log = result.operations(keys);
    for source in sources {
        for (key, value) in &source.attributes {
            if key == &keys.operations {
                log.extend(value.log_entries());
            } else {
                result.attributes.insert(key.clone(), value.clone());
            }
        }
    }
    if log.is_empty() {
        result.attributes.remove(&keys.operations);
    } else {
        result
            .attributes
            .insert(keys.operations.clone(), AttrValue::List(log));
    }
}

/// Appends one entry to the provenance log of `result`.
pub fn record_operation(result: &mut SpectrumSet, record: &OperationRecord, keys: &AttributeKeys) {
    let mut log = result.operations(keys);
    log.push(record.to_string());
    result
        .attributes
        .insert(keys.operations.clone(), AttrValue::List(log));
}

/// Merges `sources` into `result` and records `record`.
pub fn stamp(
    result: &mut SpectrumSet,
    sources: &[&SpectrumSet],
    record: &OperationRecord,
    keys: &AttributeKeys,
) {
    merge_attributes(result, sources, keys);
    record_operation(result, record, keys);
}
