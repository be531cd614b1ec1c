//! Three-generation explicit field stepping.
//!
//! The stepping rule is deliberately the pragmatic one the plate's visual
//! behavior was tuned against: a 5-point spatial stencil with a zero-gradient
//! fallback at the free edge, plus a first-order velocity estimate divided by
//! the *previous* step's clamped interval. It is not a textbook wave-equation
//! integrator and must not be "fixed" into one.

use chladni_core::geom::{point_in_polygon, Rect};
use chladni_core::grid::{MaskGrid, ScalarGrid};
use glam::{DVec2, IVec2};
use serde_json::{json, Value};

use crate::raster::{rasterize, Plate};
use crate::source::WaveSource;

/// Read-only view of the solver's published state: mask, current generation,
/// and plate offset.
///
/// This is what the particle system and renderers hold each tick instead of
/// a back-reference into the solver.
#[derive(Debug, Clone, Copy)]
pub struct PlateView<'a> {
    mask: &'a MaskGrid,
    field: &'a ScalarGrid,
    offset: IVec2,
}

impl<'a> PlateView<'a> {
    /// The plate membership mask.
    pub fn mask(&self) -> &'a MaskGrid {
        self.mask
    }

    /// The current (latest) field generation.
    pub fn field(&self) -> &'a ScalarGrid {
        self.field
    }

    /// World coordinates of the grid's minimum corner.
    pub fn offset(&self) -> IVec2 {
        self.offset
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.mask.width()
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.mask.height()
    }

    /// Field value at an in-plate cell, `None` off the grid or off the plate.
    pub fn cell_value(&self, x: isize, y: isize) -> Option<f64> {
        if self.mask.get(x, y) {
            self.field.get(x, y)
        } else {
            None
        }
    }

    /// The shared neighbor rule: the cell's value when it is on the grid and
    /// inside the mask, otherwise `fallback`.
    ///
    /// Falling back to the center value gives the zero-gradient (free edge)
    /// condition at the plate rim and the grid border. Both the field stencil
    /// and particle sampling use exactly this rule.
    pub fn value_or(&self, x: isize, y: isize, fallback: f64) -> f64 {
        if self.mask.get(x, y) {
            self.field.get(x, y).unwrap_or(fallback)
        } else {
            fallback
        }
    }
}

/// Everything that exists only while simulating.
#[derive(Debug)]
struct Active {
    plate: Plate,
    /// Ring of three generations; `cur` indexes the current one, the previous
    /// sits behind it and the slot ahead is scratch for the next step.
    bufs: [ScalarGrid; 3],
    cur: usize,
    /// The clamped interval of the previous step, used by the velocity
    /// estimate of the next one.
    dt0: f64,
}

impl Active {
    fn prev_index(&self) -> usize {
        (self.cur + 2) % 3
    }

    fn next_index(&self) -> usize {
        (self.cur + 1) % 3
    }
}

/// Session state: the single source of truth for "are we simulating".
#[derive(Debug, Default)]
enum Session {
    #[default]
    Idle,
    Simulating(Active),
}

/// The wave field solver.
///
/// Holds the authored boundary polygon, the source collection, and (while
/// simulating) the plate mask and the three field generations. All public
/// operations are infallible: malformed geometry, out-of-domain sources and
/// oversized time steps degrade to no-ops, drops and clamps respectively, so
/// the frame loop is never interrupted.
pub struct WaveField {
    alpha: f64,
    viewbox: Rect,
    boundary: Vec<DVec2>,
    sources: Vec<WaveSource>,
    session: Session,
}

impl WaveField {
    /// Creates an idle solver with the given wave speed coefficient and
    /// authoring viewbox.
    pub fn new(alpha: f64, viewbox: Rect) -> Self {
        Self {
            alpha,
            viewbox,
            boundary: Vec::new(),
            sources: Vec::new(),
            session: Session::Idle,
        }
    }

    /// Wave speed coefficient; `1 / alpha` is also the stability clamp every
    /// supplied time step is held to.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The authoring viewbox.
    pub fn viewbox(&self) -> Rect {
        self.viewbox
    }

    /// Replaces the boundary polygon. The caller supplies a pre-closed ring
    /// (see [`chladni_core::geom::close_polygon`]).
    pub fn set_boundary(&mut self, polygon: Vec<DVec2>) {
        self.boundary = polygon;
    }

    /// The current boundary polygon.
    pub fn boundary(&self) -> &[DVec2] {
        &self.boundary
    }

    /// Adds a source if its (truncated) point lies inside the boundary
    /// polygon; silently dropped otherwise.
    pub fn add_source(&mut self, point: DVec2, freq: f64, t0: f64) {
        let source = WaveSource::new(point, freq, t0);
        if point_in_polygon(source.world_point(), &self.boundary) {
            self.sources.push(source);
        }
    }

    /// Replaces the whole source collection with a single source, subject to
    /// the same admission test as [`add_source`](Self::add_source).
    pub fn set_source(&mut self, point: DVec2, freq: f64, t0: f64) {
        let source = WaveSource::new(point, freq, t0);
        if point_in_polygon(source.world_point(), &self.boundary) {
            self.sources = vec![source];
        }
    }

    /// The admitted sources.
    pub fn sources(&self) -> &[WaveSource] {
        &self.sources
    }

    /// Starts a session: rasterizes the boundary, allocates the three zeroed
    /// generations, and seeds the two-generation history the stepping rule
    /// needs (sources at time 0 into the previous generation, at time `dt0`
    /// into the current one).
    ///
    /// Stays `Idle` if the polygon does not rasterize to a usable grid.
    ///
    /// `dt` must be positive: a zero interval is stored as `dt0` and turns
    /// the first step's velocity estimate into `0/0`, poisoning the whole
    /// field with NaN.
    pub fn begin(&mut self, dt: f64) {
        let Some(plate) = rasterize(&self.boundary, self.viewbox) else {
            self.session = Session::Idle;
            return;
        };
        let (w, h) = (plate.width(), plate.height());
        let (Ok(b0), Ok(b1), Ok(b2)) = (
            ScalarGrid::new(w, h),
            ScalarGrid::new(w, h),
            ScalarGrid::new(w, h),
        ) else {
            self.session = Session::Idle;
            return;
        };

        let dt0 = dt.min(1.0 / self.alpha);
        let mut active = Active {
            plate,
            bufs: [b0, b1, b2],
            cur: 1,
            dt0,
        };
        let offset = active.plate.offset();
        inject(&self.sources, &mut active.bufs[0], offset, 0.0);
        inject(&self.sources, &mut active.bufs[1], offset, dt0);
        self.session = Session::Simulating(active);
    }

    /// Advances the field by one step of (clamped) `dt1`, with sources
    /// evaluated at elapsed time `t`. No-op while idle.
    pub fn step(&mut self, dt1: f64, t: f64) {
        let Session::Simulating(active) = &mut self.session else {
            return;
        };
        let dt1 = dt1.min(1.0 / self.alpha);
        let offset = active.plate.offset();

        let next_i = active.next_index();
        let mut next = std::mem::take(&mut active.bufs[next_i]);
        inject(&self.sources, &mut next, offset, t);

        let prev = &active.bufs[active.prev_index()];
        let cur = &active.bufs[active.cur];
        let view = PlateView {
            mask: active.plate.mask(),
            field: cur,
            offset,
        };
        let (w, h) = (active.plate.width() as isize, active.plate.height() as isize);
        for y in 0..h {
            for x in 0..w {
                if is_source_cell(&self.sources, offset, x, y) {
                    continue;
                }
                if !view.mask.get(x, y) {
                    continue;
                }
                let mid = cur.get(x, y).unwrap_or(0.0);
                let up = view.value_or(x, y + 1, mid);
                let right = view.value_or(x + 1, y, mid);
                let down = view.value_or(x, y - 1, mid);
                let left = view.value_or(x - 1, y, mid);

                let laplacian = up + right + down + left - 4.0 * mid;
                let du_dt0 = (mid - prev.get(x, y).unwrap_or(0.0)) / active.dt0;
                next.set(x, y, dt1 * (self.alpha * laplacian + du_dt0) + mid);
            }
        }

        active.bufs[next_i] = next;
        active.cur = next_i;
        active.dt0 = dt1;
    }

    /// Ends the session: drops mask and grids, clears the sources, returns to
    /// idle. Idempotent. The boundary polygon is the authoring collaborator's
    /// and survives.
    pub fn reset(&mut self) {
        self.session = Session::Idle;
        self.sources.clear();
    }

    /// Whether a session is active.
    pub fn is_simulating(&self) -> bool {
        matches!(self.session, Session::Simulating(_))
    }

    /// Read-only view of the mask, current generation and offset, or `None`
    /// while idle.
    pub fn plate_view(&self) -> Option<PlateView<'_>> {
        match &self.session {
            Session::Simulating(active) => Some(PlateView {
                mask: active.plate.mask(),
                field: &active.bufs[active.cur],
                offset: active.plate.offset(),
            }),
            Session::Idle => None,
        }
    }

    /// Current field value at a world point, or `None` while idle or outside
    /// the plate.
    pub fn sample(&self, world: DVec2) -> Option<f64> {
        let view = self.plate_view()?;
        let cell = world.round().as_ivec2() - view.offset();
        view.cell_value(cell.x as isize, cell.y as isize)
    }

    /// Whether a world point's nearest cell lies inside the plate. `false`
    /// while idle.
    pub fn in_plate(&self, world: DVec2) -> bool {
        self.sample(world).is_some()
    }

    /// Current solver state as a JSON object, for reporting.
    pub fn params(&self) -> Value {
        match &self.session {
            Session::Simulating(active) => json!({
                "alpha": self.alpha,
                "state": "simulating",
                "sources": self.sources.len(),
                "width": active.plate.width(),
                "height": active.plate.height(),
                "dt0": active.dt0,
            }),
            Session::Idle => json!({
                "alpha": self.alpha,
                "state": "idle",
                "sources": self.sources.len(),
            }),
        }
    }
}

/// Writes each source's value at time `t` into its cell of `grid`,
/// overwriting whatever is there: sources are hard drivers, not
/// perturbations. Sources whose cell falls off the grid are skipped.
fn inject(sources: &[WaveSource], grid: &mut ScalarGrid, offset: IVec2, t: f64) {
    for source in sources {
        let cell = source.cell() - offset;
        grid.set(cell.x as isize, cell.y as isize, source.at(t));
    }
}

fn is_source_cell(sources: &[WaveSource], offset: IVec2, x: isize, y: isize) -> bool {
    sources.iter().any(|s| {
        let cell = s.cell() - offset;
        cell.x as isize == x && cell.y as isize == y
    })
}
