#![deny(unsafe_code)]
//! Wave field solver for the chladni simulator.
//!
//! Owns the boundary polygon, the wave sources, and the three-generation
//! field grids. A session is either `Idle` or `Simulating`; `begin` rasterizes
//! the polygon into a plate mask and seeds the field history, `step` advances
//! the field by one explicit stencil step, `reset` drops everything.
//!
//! The particle system and any renderer read the solver through a
//! [`PlateView`], a borrowed snapshot of the mask, the current generation,
//! and the plate offset.

pub mod raster;
pub mod solver;
pub mod source;

pub use raster::{rasterize, Plate};
pub use solver::{PlateView, WaveField};
pub use source::WaveSource;
