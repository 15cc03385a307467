//! Output (Q, E) grid and the area-weighted accumulator that fills it.

use tofred_core::ReductionError;
use tofred_num::{
    bisect_helper, calc_area_2d_polygon, convex_polygon_intersect, validate_edges, Point,
};
use tofred_som::{Axis, Spectrum, SpectrumId};

use super::quad::Quad;

/// Rectilinear output grid; cell `(i, j)` spans `q_edges[i..=i+1]` by `e_edges[j..=j+1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct QeGrid {
    q_edges: Vec<f64>,
    e_edges: Vec<f64>,
}

impl QeGrid {
    /// Validates both edge axes.
    pub fn new(q_edges: Vec<f64>, e_edges: Vec<f64>) -> Result<Self, ReductionError> {
        validate_edges(&q_edges, "q")?;
        validate_edges(&e_edges, "energy")?;
        Ok(Self { q_edges, e_edges })
    }

    /// Momentum-transfer edges.
    pub fn q_edges(&self) -> &[f64] {
        &self.q_edges
    }

    /// Energy-transfer edges.
    pub fn e_edges(&self) -> &[f64] {
        &self.e_edges
    }

    /// `(q bins, energy bins)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.q_edges.len() - 1, self.e_edges.len() - 1)
    }

    /// Row-major index of cell `(iq, ie)`.
    pub fn index(&self, iq: usize, ie: usize) -> usize {
        iq * (self.e_edges.len() - 1) + ie
    }

    /// Whether the box `[q0, q1] x [e0, e1]` misses the grid entirely.
    pub fn misses(&self, q0: f64, q1: f64, e0: f64, e1: f64) -> bool {
        let (q_lo, q_hi) = (self.q_edges[0], self.q_edges[self.q_edges.len() - 1]);
        let (e_lo, e_hi) = (self.e_edges[0], self.e_edges[self.e_edges.len() - 1]);
        q1 <= q_lo || q0 >= q_hi || e1 <= e_lo || e0 >= e_hi
    }

    fn cell(&self, iq: usize, ie: usize) -> [Point; 4] {
        let (q0, q1) = (self.q_edges[iq], self.q_edges[iq + 1]);
        let (e0, e1) = (self.e_edges[ie], self.e_edges[ie + 1]);
        [
            Point::new(q0, e0),
            Point::new(q1, e0),
            Point::new(q1, e1),
            Point::new(q0, e1),
        ]
    }
}

/// Accumulated counts, variances and covered area per grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct QeAccumulator {
    grid: QeGrid,
    values: Vec<f64>,
    variances: Vec<f64>,
    covered: Vec<f64>,
}

impl QeAccumulator {
    /// Starts an empty accumulator over `grid`.
    pub fn new(grid: QeGrid) -> Self {
        let (nq, ne) = grid.shape();
        Self {
            grid,
            values: vec![0.0; nq * ne],
            variances: vec![0.0; nq * ne],
            covered: vec![0.0; nq * ne],
        }
    }

    /// The output grid.
    pub fn grid(&self) -> &QeGrid {
        &self.grid
    }

    /// Distributes `count` (and `variance`) over the cells `quad` overlaps.
    ///
    /// Each cell receives `frac * count` and `frac^2 * variance` where `frac`
    /// is the share of the quad's area inside the cell, and `overlap / cell area`
    /// of covered area. Returns the total fraction of the quad that landed on
    /// the grid.
    pub fn splat(
        &mut self,
        quad: &Quad,
        count: f64,
        variance: f64,
    ) -> Result<f64, ReductionError> {
        let (q0, q1, e0, e1) = quad.bounds();
        if self.grid.misses(q0, q1, e0, e1) {
            return Ok(0.0);
        }
        let iq_lo = bisect_helper(&self.grid.q_edges, q0)?;
        let iq_hi = bisect_helper(&self.grid.q_edges, q1)?;
        let ie_lo = bisect_helper(&self.grid.e_edges, e0)?;
        let ie_hi = bisect_helper(&self.grid.e_edges, e1)?;

        let mut landed = 0.0;
        for iq in iq_lo..=iq_hi {
            for ie in ie_lo..=ie_hi {
                let cell = self.grid.cell(iq, ie);
                let overlap = convex_polygon_intersect(quad.vertices(), &cell)?;
                if overlap.is_empty() {
                    continue;
                }
                let area = calc_area_2d_polygon(&overlap);
                if area <= 0.0 {
                    continue;
                }
                let frac = area / quad.area();
                let cell_area = calc_area_2d_polygon(&cell);
                let idx = self.grid.index(iq, ie);
                self.values[idx] += frac * count;
                self.variances[idx] += frac * frac * variance;
                self.covered[idx] += area / cell_area;
                landed += frac;
            }
        }
        Ok(landed)
    }

    /// Accumulated values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Accumulated variances.
    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    /// Accumulated covered area per cell, in units of the cell area.
    pub fn covered(&self) -> &[f64] {
        &self.covered
    }

    /// Builds the 2D spectrum `[Q, E]`, dividing by the covered area when `normalize` is set.
    ///
    /// Returns the spectrum together with the covered area per cell.
    pub fn finish(self, id: SpectrumId, normalize: bool) -> (Spectrum, Vec<f64>) {
        let mut y = self.values;
        let mut var_y = self.variances;
        if normalize {
            let bins = y.iter_mut().zip(var_y.iter_mut()).zip(&self.covered);
            for ((value, variance), &area) in bins {
                if area > 0.0 {
                    *value /= area;
                    *variance /= area * area;
                }
            }
        }
        let spectrum = Spectrum {
            id,
            axes: vec![
                Axis::histogram(self.grid.q_edges),
                Axis::histogram(self.grid.e_edges),
            ],
            y,
            var_y,
        };
        (spectrum, self.covered)
    }
}
