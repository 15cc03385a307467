//! Rebinning engines: 1D strategies, fold-in summation, integration and
//! S(Q,E) regridding.

#![deny(missing_docs)]

pub mod foldin;
pub mod integrate;
pub mod linint;
pub mod sqe;
pub mod strategy;

pub use foldin::{sum_all_spectra, sum_by_rebin_frac, FracAccumulator};
pub use integrate::{integrate_set, integrate_spectrum};
pub use linint::rebin_axis_1d_linint;
pub use sqe::{build_sqe, Kinematics, QeAccumulator, QeGrid, Quad, SqeOpts, SqeOutput};
pub use strategy::{rebin, rebin_set, rebin_spectrum, RebinStrategy, Rebinned, Resampled};
