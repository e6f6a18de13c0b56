//! Contour extraction and polygon metrics.
//!
//! - [`trace`]: outer borders of 8-connected components.
//! - [`shape`]: convex hull, minimum-area rectangle and the per-loop
//!   [`ShapeMetrics`] consumed by the boundary shape filters.

pub mod shape;
pub mod trace;

pub use shape::{convex_hull, min_area_rect, polygon_area, MinAreaRect, ShapeMetrics};
pub use trace::{trace_components, trace_outer_border, trace_outer_borders, TracedLoop};
