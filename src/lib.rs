//! skytools — find where a sky position sits in Uranometria 2000.0.
//!
//! [`atlas`] holds the pure chart and quadrant lookups; the other modules
//! parse coordinates, resolve object names, and present the result.

pub mod atlas;
pub mod coord;
pub mod report;
pub mod resolve;
pub mod server;

pub use atlas::{chart_for, quadrant_for, AtlasError, ChartReference, Quadrant};
pub use coord::Coordinate;
