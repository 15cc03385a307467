#![deny(missing_docs)]
#![doc = "Numeric primitives for tofred: elementwise value/variance arithmetic, axis helpers and convex polygon clipping."]

pub mod array;
pub mod axis;
pub mod polygon;

pub use array::{
    combine, combine_array_scalar, combine_arrays, reverse_array_cp, ArithOp, ScalarSide,
};
pub use axis::{
    bisect_helper, calc_bin_centers, calc_bin_widths, linear_fit, rebin_axis_1d,
    rebin_axis_1d_frac, validate_edges, validate_increasing, LinearFit,
};
pub use polygon::{calc_area_2d_polygon, convex_polygon_intersect, signed_area, Point};
