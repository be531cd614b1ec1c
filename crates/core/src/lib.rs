#![deny(unsafe_code)]
//! Core types for the chladni plate simulator.
//!
//! Provides the even-odd `point_in_polygon` test and `Rect` viewbox math,
//! flat row-major `ScalarGrid`/`MaskGrid` buffers, the `CoreError` enum,
//! JSON parameter helpers, and the `Xorshift64` PRNG.

pub mod error;
pub mod geom;
pub mod grid;
pub mod params;
pub mod prng;

pub use error::CoreError;
pub use geom::{close_polygon, point_in_polygon, Rect};
pub use grid::{MaskGrid, ScalarGrid};
pub use prng::Xorshift64;
