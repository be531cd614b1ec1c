//! Scene presets: canned boundary and source configurations.
//!
//! A scene is plain data; the run loop feeds it into the solver. Custom
//! scenes load from JSON files with the same shape as the presets.

use chladni_core::geom::close_polygon;
use glam::DVec2;
use serde::Deserialize;

/// All recognized preset names.
pub const SCENE_NAMES: &[&str] = &["classic"];

/// One wave source entry.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SourceSpec {
    /// World position, truncated to a grid cell by the solver.
    pub point: [f64; 2],
    /// Driving frequency in cycles per time unit.
    pub freq: f64,
    /// Phase origin; defaults to 0.
    #[serde(default)]
    pub t0: f64,
}

/// A boundary polygon plus its wave sources.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneSpec {
    /// Boundary ring as `[x, y]` pairs; closed automatically if the file
    /// leaves it open.
    pub boundary: Vec<[f64; 2]>,
    /// Source list; entries outside the boundary are dropped by the solver.
    pub sources: Vec<SourceSpec>,
}

impl SceneSpec {
    /// The classic chladni plate: a 500x500 square with a single source at
    /// the origin driving at 0.2.
    pub fn classic() -> Self {
        Self {
            boundary: vec![
                [-250.0, 250.0],
                [250.0, 250.0],
                [250.0, -250.0],
                [-250.0, -250.0],
                [-250.0, 250.0],
            ],
            sources: vec![SourceSpec {
                point: [0.0, 0.0],
                freq: 0.2,
                t0: 0.0,
            }],
        }
    }

    /// Looks up a preset by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            _ => None,
        }
    }

    /// The boundary as a closed ring of points.
    pub fn boundary_ring(&self) -> Vec<DVec2> {
        close_polygon(
            self.boundary
                .iter()
                .map(|&[x, y]| DVec2::new(x, y))
                .collect(),
        )
    }
}
