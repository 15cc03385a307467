//! Scattering kinematics and the local (polar, energy) to (Q, E) Jacobian.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tofred_core::{ErrorInfo, ReductionError};

/// Neutron energy per squared wavevector, meV·Å².
pub const MEV_PER_INV_ANGSTROM_SQ: f64 = 2.072_124_6;

const Q_FLOOR: f64 = 1e-12;

/// Which neutron energy the instrument fixes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "geometry", rename_all = "snake_case")]
pub enum Kinematics {
    /// Direct geometry: the incident energy (meV) is fixed.
    Direct {
        /// Incident energy in meV.
        incident_energy: f64,
    },
    /// Inverse geometry: the final energy (meV) is fixed.
    Inverse {
        /// Final energy in meV.
        final_energy: f64,
    },
}

/// Partial derivatives of (Q, E) with respect to (polar angle, energy transfer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobianCoefficients {
    /// dQ / d(polar).
    pub x1: f64,
    /// dQ / dE.
    pub x2: f64,
    /// dE / d(polar).
    pub x3: f64,
    /// dE / dE.
    pub x4: f64,
}

/// Wavevectors and momentum transfer at one (polar, energy transfer) point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatteringPoint {
    /// Incident wavevector, 1/Å.
    pub ki: f64,
    /// Final wavevector, 1/Å.
    pub kf: f64,
    /// Momentum transfer magnitude, 1/Å.
    pub q: f64,
}

fn wavevector(energy: f64) -> f64 {
    (energy / MEV_PER_INV_ANGSTROM_SQ).sqrt()
}

impl Kinematics {
    fn fixed_energy(&self) -> f64 {
        match self {
            Kinematics::Direct { incident_energy } => *incident_energy,
            Kinematics::Inverse { final_energy } => *final_energy,
        }
    }

    /// Incident and final energy (meV) at energy transfer `e` (`E = Ei - Ef`).
    pub fn energies(&self, e: f64) -> (f64, f64) {
        match self {
            Kinematics::Direct { incident_energy } => (*incident_energy, incident_energy - e),
            Kinematics::Inverse { final_energy } => (final_energy + e, *final_energy),
        }
    }

    /// Rejects a non-positive fixed energy.
    pub fn validate(&self) -> Result<(), ReductionError> {
        let fixed = self.fixed_energy();
        if !fixed.is_finite() || fixed <= 0.0 {
            return Err(ReductionError::Config(
                ErrorInfo::new("fixed-energy", "the fixed neutron energy must be positive")
                    .with_context("kinematics", self)
                    .with_context("energy", fixed),
            ));
        }
        Ok(())
    }

    /// Checks that every energy transfer in `[lo, hi]` leaves both neutron energies positive.
    pub fn check_transfer_range(&self, lo: f64, hi: f64) -> Result<(), ReductionError> {
        let (_, ef_at_hi) = self.energies(hi);
        let (ei_at_lo, _) = self.energies(lo);
        if ef_at_hi <= 0.0 || ei_at_lo <= 0.0 {
            return Err(ReductionError::MalformedAxis(
                ErrorInfo::new(
                    "kinematic-limit",
                    "energy-transfer axis reaches beyond the kinematic limit",
                )
                .with_context("kinematics", self)
                .with_context("lo", lo)
                .with_context("hi", hi),
            ));
        }
        Ok(())
    }

    /// Wavevectors and |Q| for polar angle `polar` (radians) and energy transfer `e`.
    pub fn point(&self, polar: f64, e: f64) -> Result<ScatteringPoint, ReductionError> {
        self.check_transfer_range(e, e)?;
        let (ei, ef) = self.energies(e);
        let (ki, kf) = (wavevector(ei), wavevector(ef));
        let q = (ki * ki + kf * kf - 2.0 * ki * kf * polar.cos()).max(0.0).sqrt();
        Ok(ScatteringPoint { ki, kf, q })
    }

    /// Jacobian coefficients at the centre of one bin.
    pub fn coefficients(&self, point: &ScatteringPoint, polar: f64) -> JacobianCoefficients {
        let ScatteringPoint { ki, kf, q } = *point;
        if q < Q_FLOOR {
            // Elastic forward scattering: |Q| ~ k * polar.
            return JacobianCoefficients {
                x1: (ki * kf).sqrt(),
                x2: 0.0,
                x3: 0.0,
                x4: 1.0,
            };
        }
        let x1 = ki * kf * polar.sin() / q;
        let x2 = match self {
            Kinematics::Direct { .. } => {
                let dkf_de = -1.0 / (2.0 * MEV_PER_INV_ANGSTROM_SQ * kf);
                (kf - ki * polar.cos()) / q * dkf_de
            }
            Kinematics::Inverse { .. } => {
                let dki_de = 1.0 / (2.0 * MEV_PER_INV_ANGSTROM_SQ * ki);
                (ki - kf * polar.cos()) / q * dki_de
            }
        };
        JacobianCoefficients {
            x1,
            x2,
            x3: 0.0,
            x4: 1.0,
        }
    }
}

impl Display for Kinematics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kinematics::Direct { incident_energy } => write!(f, "direct(Ei={incident_energy})"),
            Kinematics::Inverse { final_energy } => write!(f, "inverse(Ef={final_energy})"),
        }
    }
}
