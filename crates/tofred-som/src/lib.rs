#![deny(missing_docs)]
#![doc = "Spectrum data model, operand classification, binary operation dispatch and attribute merging for tofred."]

mod attrs;
pub mod dispatch;
pub mod geometry;
mod hash;
pub mod merge;
pub mod model;
pub mod operand;
pub mod serde;

pub use attrs::{AttrValue, Attributes};
pub use dispatch::{add, div, mul, sub, sumw, Dispatcher, OpOutput};
pub use geometry::{GeometryKind, GeometryProvider, PixelGeometry, TabulatedInstrument};
pub use hash::canonical_hash;
pub use merge::{merge_attributes, record_operation, stamp};
pub use model::{Axis, AxisKind, Spectrum, SpectrumId, SpectrumSet};
pub use operand::{classify_json, Operand, OperandKind, OwnedOperand};
pub use crate::serde::{from_bytes, from_json, to_bytes, to_json};
pub use tofred_num::ArithOp;
