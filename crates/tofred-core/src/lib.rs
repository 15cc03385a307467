#![deny(missing_docs)]
#![doc = "Shared error taxonomy, configuration and scalar types for the tofred reduction kernel."]

pub mod config;
pub mod errors;
pub mod nonfinite;
pub mod provenance;
mod value;

pub use config::{AttributeKeys, ReductionConfig};
pub use errors::{ErrorInfo, ErrorKind, ReductionError};
pub use provenance::{OperationRecord, SchemaVersion};
pub use value::ValueErr;
