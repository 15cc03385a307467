use std::fmt;

use serde::{Deserialize, Serialize};

/// A single value carried together with its variance (the "scalar pair").
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueErr {
    /// Central value.
    #[serde(with = "crate::nonfinite")]
    pub value: f64,
    /// Variance (squared uncertainty) of the value.
    #[serde(with = "crate::nonfinite")]
    pub variance: f64,
}

impl ValueErr {
    /// Creates a new pair.
    pub const fn new(value: f64, variance: f64) -> Self {
        Self { value, variance }
    }

    /// A pair with zero variance.
    pub const fn exact(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    /// Standard deviation of the pair.
    pub fn sigma(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.variance.is_finite()
    }
}

impl From<(f64, f64)> for ValueErr {
    fn from((value, variance): (f64, f64)) -> Self {
        Self::new(value, variance)
    }
}

impl From<ValueErr> for (f64, f64) {
    fn from(pair: ValueErr) -> Self {
        (pair.value, pair.variance)
    }
}

impl fmt::Display for ValueErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.value, self.variance)
    }
}
