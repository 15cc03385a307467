//! Generic binary operation dispatch over classified operands.

use log::{debug, trace};
use tofred_core::{ErrorInfo, OperationRecord, ReductionConfig, ReductionError, ValueErr};
use tofred_num::{combine, combine_array_scalar, combine_arrays, ArithOp, ScalarSide};

use crate::attrs::Attributes;
use crate::merge::stamp;
use crate::model::{Spectrum, SpectrumSet};
use crate::operand::{Operand, OperandKind};

fn unsupported(op: ArithOp, left: OperandKind, right: OperandKind) -> ReductionError {
    ReductionError::UnsupportedOperandCombination(
        ErrorInfo::new(
            "unsupported-combination",
            format!("{op} does not accept this operand combination"),
        )
        .with_context("left", format!("{left:?}"))
        .with_context("right", format!("{right:?}")),
    )
}

/// Result of a dispatched operation; its shape follows the operands.
#[derive(Debug, Clone, PartialEq)]
pub enum OpOutput {
    /// At least one operand was a set.
    Set(SpectrumSet),
    /// Spectrum with spectrum or scalar pair.
    Single(Spectrum),
    /// Scalar pair with scalar pair.
    ScalarPair(ValueErr),
}

impl OpOutput {
    /// Shape tag of the result.
    pub fn kind(&self) -> OperandKind {
        match self {
            OpOutput::Set(_) => OperandKind::Set,
            OpOutput::Single(_) => OperandKind::Single,
            OpOutput::ScalarPair(_) => OperandKind::ScalarPair,
        }
    }

    /// The set, if the result is one.
    pub fn into_set(self) -> Option<SpectrumSet> {
        match self {
            OpOutput::Set(set) => Some(set),
            _ => None,
        }
    }

    /// The spectrum, if the result is one.
    pub fn into_single(self) -> Option<Spectrum> {
        match self {
            OpOutput::Single(spectrum) => Some(spectrum),
            _ => None,
        }
    }

    /// The scalar pair, if the result is one.
    pub fn into_scalar(self) -> Option<ValueErr> {
        match self {
            OpOutput::ScalarPair(pair) => Some(pair),
            _ => None,
        }
    }
}

/// Operand broadcast against every member of a set.
#[derive(Clone, Copy)]
enum Broadcast<'a> {
    Single(&'a Spectrum),
    Scalar(ValueErr),
    Sequence(&'a [ValueErr]),
}

fn broadcast_of<'a>(
    op: ArithOp,
    left: Operand<'a>,
    right: Operand<'a>,
) -> Result<Broadcast<'a>, ReductionError> {
    let other = if left.kind() == OperandKind::Set {
        right
    } else {
        left
    };
    match other {
        Operand::Single(spectrum) => Ok(Broadcast::Single(spectrum)),
        Operand::ScalarPair(pair) => Ok(Broadcast::Scalar(pair)),
        Operand::Sequence(pairs) => Ok(Broadcast::Sequence(pairs)),
        Operand::Set(_) => Err(unsupported(op, left.kind(), right.kind())),
    }
}

/// Selects the combination handler for two operands and runs it.
///
/// The dispatcher never mutates its inputs and returns freshly allocated
/// results. All compatibility checks run before any arithmetic, so a failure
/// never leaves a partial result behind.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: ReductionConfig,
}

impl Dispatcher {
    /// Creates a dispatcher using the given attribute keys and tolerances.
    pub fn new(config: ReductionConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    /// Applies `op` to `left` and `right`.
    pub fn apply<'a>(
        &self,
        op: ArithOp,
        left: impl Into<Operand<'a>>,
        right: impl Into<Operand<'a>>,
    ) -> Result<OpOutput, ReductionError> {
        let left = left.into();
        let right = right.into();
        debug!("dispatching {op}: {:?} x {:?}", left.kind(), right.kind());
        match (left, right) {
            (Operand::Set(l), Operand::Set(r)) => self.set_set(op, l, r).map(OpOutput::Set),
            (Operand::Set(set), _) => {
                let broadcast = broadcast_of(op, left, right)?;
                self.set_broadcast(op, set, broadcast, ScalarSide::Right, left, right)
                    .map(OpOutput::Set)
            }
            (_, Operand::Set(set)) => {
                let broadcast = broadcast_of(op, left, right)?;
                self.set_broadcast(op, set, broadcast, ScalarSide::Left, left, right)
                    .map(OpOutput::Set)
            }
            (Operand::Single(l), Operand::Single(r)) => {
                check_spectra(op, l, r)?;
                combine_spectra(op, l, r).map(OpOutput::Single)
            }
            (Operand::Single(spectrum), Operand::ScalarPair(pair)) => {
                combine_with_scalar(op, spectrum, pair, ScalarSide::Right).map(OpOutput::Single)
            }
            (Operand::ScalarPair(pair), Operand::Single(spectrum)) => {
                combine_with_scalar(op, spectrum, pair, ScalarSide::Left).map(OpOutput::Single)
            }
            (Operand::ScalarPair(a), Operand::ScalarPair(b)) => {
                if op == ArithOp::Div {
                    Ok(OpOutput::ScalarPair(combine(op, a, b)))
                } else {
                    Err(unsupported(op, left.kind(), right.kind()))
                }
            }
            _ => Err(unsupported(op, left.kind(), right.kind())),
        }
    }

    fn check_units(
        &self,
        op: ArithOp,
        left: &SpectrumSet,
        right: &SpectrumSet,
    ) -> Result<(), ReductionError> {
        if !op.requires_matching_axes() {
            return Ok(());
        }
        let keys = &self.config.keys;
        let checks = [
            ("x-units", left.x_units(keys), right.x_units(keys)),
            ("y-units", left.y_units(keys), right.y_units(keys)),
        ];
        for (code, l, r) in checks {
            if l != r {
                return Err(ReductionError::UnitMismatch(
                    ErrorInfo::new(code, format!("{op} requires operands with matching units"))
                        .with_context("left", l.unwrap_or("<none>"))
                        .with_context("right", r.unwrap_or("<none>")),
                ));
            }
        }
        Ok(())
    }

    fn set_set(
        &self,
        op: ArithOp,
        left: &SpectrumSet,
        right: &SpectrumSet,
    ) -> Result<SpectrumSet, ReductionError> {
        if left.len() != right.len() {
            return Err(ReductionError::CardinalityMismatch(
                ErrorInfo::new("set-length", "sets must contain the same number of spectra")
                    .with_context("left", left.len())
                    .with_context("right", right.len()),
            ));
        }
        self.check_units(op, left, right)?;
        for (l, r) in left.iter().zip(right) {
            check_spectra(op, l, r)?;
        }

        let spectra = left
            .iter()
            .zip(right)
            .map(|(l, r)| {
                trace!("{op} {} with {}", l.id, r.id);
                combine_spectra(op, l, r)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = SpectrumSet::from_parts_unchecked(spectra, Attributes::new());
        let record = OperationRecord::new(op.name())
            .with_operand(Operand::Set(left).summary())
            .with_operand(Operand::Set(right).summary());
        stamp(&mut result, &[right, left], &record, &self.config.keys);
        Ok(result)
    }

    fn set_broadcast(
        &self,
        op: ArithOp,
        set: &SpectrumSet,
        broadcast: Broadcast<'_>,
        scalar_side: ScalarSide,
        left: Operand<'_>,
        right: Operand<'_>,
    ) -> Result<SpectrumSet, ReductionError> {
        match broadcast {
            Broadcast::Single(single) => {
                for member in set {
                    match scalar_side {
                        ScalarSide::Right => check_spectra(op, member, single)?,
                        ScalarSide::Left => check_spectra(op, single, member)?,
                    }
                }
            }
            Broadcast::Sequence(pairs) => {
                if pairs.len() != set.len() {
                    return Err(ReductionError::CardinalityMismatch(
                        ErrorInfo::new(
                            "sequence-length",
                            "a sequence needs one scalar pair per spectrum",
                        )
                        .with_context("set", set.len())
                        .with_context("sequence", pairs.len()),
                    ));
                }
            }
            Broadcast::Scalar(_) => {}
        }

        let spectra = set
            .iter()
            .enumerate()
            .map(|(idx, member)| -> Result<Spectrum, ReductionError> {
                trace!("{op} {} with broadcast operand", member.id);
                match broadcast {
                    Broadcast::Single(single) => {
                        let (y, var_y) = match scalar_side {
                            ScalarSide::Right => combine_arrays(
                                op,
                                (&member.y, &member.var_y),
                                (&single.y, &single.var_y),
                            )?,
                            ScalarSide::Left => combine_arrays(
                                op,
                                (&single.y, &single.var_y),
                                (&member.y, &member.var_y),
                            )?,
                        };
                        Ok(member.with_data(y, var_y))
                    }
                    Broadcast::Scalar(pair) => combine_with_scalar(op, member, pair, scalar_side),
                    Broadcast::Sequence(pairs) => {
                        combine_with_scalar(op, member, pairs[idx], scalar_side)
                    }
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = SpectrumSet::from_parts_unchecked(spectra, Attributes::new());
        let record = OperationRecord::new(op.name())
            .with_operand(left.summary())
            .with_operand(right.summary());
        stamp(&mut result, &[set], &record, &self.config.keys);
        Ok(result)
    }
}

fn check_spectra(op: ArithOp, left: &Spectrum, right: &Spectrum) -> Result<(), ReductionError> {
    if left.len() != right.len() {
        return Err(ReductionError::IncompatibleAxis(
            ErrorInfo::new("bin-count", "spectra have different bin counts")
                .with_context("left", left.id)
                .with_context("right", right.id)
                .with_context("left_bins", left.len())
                .with_context("right_bins", right.len()),
        ));
    }
    if !op.requires_matching_axes() {
        return Ok(());
    }
    let mismatch = if left.axes.len() != right.axes.len() {
        Some(left.axes.len().min(right.axes.len()))
    } else {
        left.axes
            .iter()
            .zip(&right.axes)
            .position(|(l, r)| l.values != r.values)
    };
    if let Some(axis) = mismatch {
        return Err(ReductionError::IncompatibleAxis(
            ErrorInfo::new("axis-values", format!("{op} requires identical axes"))
                .with_context("left", left.id)
                .with_context("right", right.id)
                .with_context("axis", axis)
                .with_hint("rebin one operand onto the other's axis first"),
        ));
    }
    Ok(())
}

/// Combines two checked spectra; the result keeps the left id and axes.
fn combine_spectra(
    op: ArithOp,
    left: &Spectrum,
    right: &Spectrum,
) -> Result<Spectrum, ReductionError> {
    let (y, var_y) = combine_arrays(op, (&left.y, &left.var_y), (&right.y, &right.var_y))?;
    Ok(left.with_data(y, var_y))
}

fn combine_with_scalar(
    op: ArithOp,
    spectrum: &Spectrum,
    scalar: ValueErr,
    side: ScalarSide,
) -> Result<Spectrum, ReductionError> {
    let (y, var_y) = combine_array_scalar(op, (&spectrum.y, &spectrum.var_y), scalar, side)?;
    Ok(spectrum.with_data(y, var_y))
}

/// `left + right` with the default configuration.
pub fn add<'a>(
    left: impl Into<Operand<'a>>,
    right: impl Into<Operand<'a>>,
) -> Result<OpOutput, ReductionError> {
    Dispatcher::default().apply(ArithOp::Add, left, right)
}

/// `left - right` with the default configuration.
pub fn sub<'a>(
    left: impl Into<Operand<'a>>,
    right: impl Into<Operand<'a>>,
) -> Result<OpOutput, ReductionError> {
    Dispatcher::default().apply(ArithOp::Sub, left, right)
}

/// `left * right` with the default configuration.
pub fn mul<'a>(
    left: impl Into<Operand<'a>>,
    right: impl Into<Operand<'a>>,
) -> Result<OpOutput, ReductionError> {
    Dispatcher::default().apply(ArithOp::Mul, left, right)
}

/// `left / right` with the default configuration.
pub fn div<'a>(
    left: impl Into<Operand<'a>>,
    right: impl Into<Operand<'a>>,
) -> Result<OpOutput, ReductionError> {
    Dispatcher::default().apply(ArithOp::Div, left, right)
}

/// Inverse-variance weighted sum with the default configuration.
pub fn sumw<'a>(
    left: impl Into<Operand<'a>>,
    right: impl Into<Operand<'a>>,
) -> Result<OpOutput, ReductionError> {
    Dispatcher::default().apply(ArithOp::SumWeighted, left, right)
}
