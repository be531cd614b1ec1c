//! Sinusoidal wave sources.

use glam::{DVec2, IVec2};
use std::f64::consts::TAU;

/// A fixed-location sinusoidal driver.
///
/// The source pins its grid cell to `sin(2π·freq·(t − t0))` every step,
/// overwriting whatever the stencil would produce there. World coordinates
/// are truncated to whole cells at construction so the source always sits
/// exactly on a grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSource {
    cell: IVec2,
    freq: f64,
    t0: f64,
    freq_tau: f64,
}

impl WaveSource {
    /// Creates a source at `point` (truncated to integers) with the given
    /// frequency and phase origin `t0`.
    pub fn new(point: DVec2, freq: f64, t0: f64) -> Self {
        Self {
            cell: IVec2::new(point.x as i32, point.y as i32),
            freq,
            t0,
            freq_tau: freq * TAU,
        }
    }

    /// The source's grid cell in world coordinates.
    pub fn cell(&self) -> IVec2 {
        self.cell
    }

    /// The cell as a world point (for geometry tests).
    pub fn world_point(&self) -> DVec2 {
        self.cell.as_dvec2()
    }

    /// Driving frequency in cycles per time unit.
    pub fn frequency(&self) -> f64 {
        self.freq
    }

    /// Phase origin.
    pub fn start_time(&self) -> f64 {
        self.t0
    }

    /// Source value at time `t`.
    pub fn at(&self, t: f64) -> f64 {
        (self.freq_tau * (t - self.t0)).sin()
    }
}
