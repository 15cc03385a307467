use sha2::{Digest, Sha256};
use tofred_core::ValueErr;

use crate::attrs::AttrValue;
use crate::geometry::TabulatedInstrument;
use crate::model::{AxisKind, SpectrumId, SpectrumSet};

fn update_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_le_bytes());
}

// Every NaN hashes alike so that a decoded NaN matches the one that was written.
fn update_float(hasher: &mut Sha256, value: f64) {
    let bits = if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    };
    hasher.update(bits.to_le_bytes());
}

fn update_floats(hasher: &mut Sha256, values: &[f64]) {
    update_len(hasher, values.len());
    for &value in values {
        update_float(hasher, value);
    }
}

fn update_str(hasher: &mut Sha256, text: &str) {
    update_len(hasher, text.len());
    hasher.update(text.as_bytes());
}

fn update_pair(hasher: &mut Sha256, pair: &ValueErr) {
    update_float(hasher, pair.value);
    update_float(hasher, pair.variance);
}

fn update_id(hasher: &mut Sha256, id: &SpectrumId) {
    hasher.update(id.bank.to_le_bytes());
    hasher.update(id.x.to_le_bytes());
    hasher.update(id.y.to_le_bytes());
}

fn update_instrument(hasher: &mut Sha256, instrument: &TabulatedInstrument) {
    update_str(hasher, &instrument.name);
    update_len(hasher, instrument.pixels.len());
    for pixel in &instrument.pixels {
        update_id(hasher, &pixel.id);
        for pair in [&pixel.primary, &pixel.secondary, &pixel.polar, &pixel.azimuthal] {
            update_pair(hasher, pair);
        }
    }
}

fn update_attr(hasher: &mut Sha256, value: &AttrValue) {
    match value {
        AttrValue::String(text) => {
            hasher.update([0u8]);
            update_str(hasher, text);
        }
        AttrValue::Integer(number) => {
            hasher.update([1u8]);
            hasher.update(number.to_le_bytes());
        }
        AttrValue::Float(number) => {
            hasher.update([2u8]);
            update_float(hasher, *number);
        }
        AttrValue::Bool(flag) => hasher.update([3u8, u8::from(*flag)]),
        AttrValue::List(entries) => {
            hasher.update([4u8]);
            update_len(hasher, entries.len());
            for entry in entries {
                update_str(hasher, entry);
            }
        }
        AttrValue::Pair(pair) => {
            hasher.update([5u8]);
            update_pair(hasher, pair);
        }
        AttrValue::Instrument(instrument) => {
            hasher.update([6u8]);
            update_instrument(hasher, instrument);
        }
        AttrValue::Null => hasher.update([7u8]),
    }
}

/// Computes the canonical content hash of a spectrum set.
///
/// Covers ids, axes, values, variances and attributes; attribute order is
/// already canonical because the mapping is key-ordered.
pub fn canonical_hash(set: &SpectrumSet) -> String {
    let mut hasher = Sha256::new();
    update_len(&mut hasher, set.len());
    for spectrum in set {
        update_id(&mut hasher, &spectrum.id);
        update_len(&mut hasher, spectrum.axes.len());
        for axis in &spectrum.axes {
            hasher.update([match axis.kind {
                AxisKind::Histogram => 0u8,
                AxisKind::Point => 1u8,
            }]);
            update_floats(&mut hasher, &axis.values);
            match &axis.variances {
                Some(variances) => {
                    hasher.update([1u8]);
                    update_floats(&mut hasher, variances);
                }
                None => hasher.update([0u8]),
            }
        }
        update_floats(&mut hasher, &spectrum.y);
        update_floats(&mut hasher, &spectrum.var_y);
    }
    update_len(&mut hasher, set.attributes.len());
    for (key, value) in &set.attributes {
        update_str(&mut hasher, key);
        update_attr(&mut hasher, value);
    }

    let digest = hasher.finalize();
    digest
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<String>()
}
