#![deny(unsafe_code)]
//! Sand particles advected by local field curvature.
//!
//! Each tick, after the field has advanced, every grain samples the solver's
//! current generation at its cell and the four axis neighbors and accelerates
//! along the discrete second spatial derivative. Grains settle where the
//! curvature vanishes, tracing the plate's nodal lines into a chladni
//! pattern. Grains whose cell leaves the plate are removed on the spot.

use chladni_wave::WaveField;
use glam::DVec2;

/// Fixed scale on the curvature-estimate acceleration.
///
/// This constant defines the observable grain behavior and is part of the
/// model, not a tunable.
const CURVATURE_GAIN: f64 = 0.2;

/// A sand grain: world position and velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
}

/// The particle system.
///
/// Holds only its own grains plus the display placement of the sand viewbox;
/// all field state is borrowed read-only from the solver each tick, so the
/// system can never outlive or mutate solver state it depends on.
#[derive(Debug)]
pub struct SandField {
    particles: Vec<Particle>,
    display_position: DVec2,
    plate_position: DVec2,
    display_offset: DVec2,
}

impl SandField {
    /// Creates an empty system. `display_position` is where the sand viewbox
    /// is presented; `plate_position` is where the plate viewbox sits.
    pub fn new(display_position: DVec2, plate_position: DVec2) -> Self {
        Self {
            particles: Vec::new(),
            display_position,
            plate_position,
            display_offset: DVec2::ZERO,
        }
    }

    /// Appends a grain. No admission test here: an out-of-plate grain is
    /// swept away by the next [`step`](Self::step).
    pub fn add_particle(&mut self, position: DVec2, velocity: DVec2) {
        self.particles.push(Particle { position, velocity });
    }

    /// Mirrors the solver's `begin`: recomputes the shift from plate world
    /// coordinates to sand viewbox coordinates. (Grain positions are kept in
    /// the world frame, so the plate's grid offset cancels out of the shift.)
    pub fn begin(&mut self) {
        self.display_offset = self.display_position - self.plate_position;
    }

    /// Advances every grain by one (clamped) step of `dt`, sampling the
    /// solver's published view. No-op while the solver is idle.
    pub fn step(&mut self, dt: f64, wave: &WaveField) {
        let Some(view) = wave.plate_view() else {
            return;
        };
        let offset = view.offset();

        // Unconditional removal first: a grain off the plate never advects.
        self.particles.retain(|p| {
            let cell = p.position.round().as_ivec2() - offset;
            view.mask().get(cell.x as isize, cell.y as isize)
        });

        let dt = dt.min(1.0 / wave.alpha());
        let dt2 = dt * dt;

        for p in &mut self.particles {
            let cell = p.position.round().as_ivec2() - offset;
            let (x, y) = (cell.x as isize, cell.y as isize);
            let mid = view.field().get(x, y).unwrap_or(0.0);
            let up = view.value_or(x, y + 1, mid);
            let right = view.value_or(x + 1, y, mid);
            let down = view.value_or(x, y - 1, mid);
            let left = view.value_or(x - 1, y, mid);

            let accel = DVec2::new(
                (right - 2.0 * mid + left) / dt2,
                (up - 2.0 * mid + down) / dt2,
            ) * CURVATURE_GAIN;

            // Semi-implicit Euler; no velocity damping.
            p.velocity += accel * dt;
            p.position += p.velocity * dt;
        }
    }

    /// Removes every grain. Idempotent.
    pub fn reset(&mut self) {
        self.particles.clear();
    }

    /// The live grains, in insertion order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live grains.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the system holds no grains.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// World-to-sand-viewbox shift, as last computed by
    /// [`begin`](Self::begin).
    pub fn display_offset(&self) -> DVec2 {
        self.display_offset
    }

    /// A grain's position in sand viewbox coordinates, for presentation.
    pub fn display_position_of(&self, particle: &Particle) -> DVec2 {
        particle.position + self.display_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chladni_core::geom::{close_polygon, Rect};
    use chladni_wave::WaveField;

    const ALPHA: f64 = 10.0;
    const DT: f64 = 0.016;

    fn viewbox() -> Rect {
        Rect::new(DVec2::new(-8.0, -8.0), DVec2::new(8.0, 8.0))
    }

    fn simulating_wave() -> WaveField {
        let mut wave = WaveField::new(ALPHA, viewbox());
        wave.set_boundary(close_polygon(vec![
            DVec2::new(-8.0, 8.0),
            DVec2::new(8.0, 8.0),
            DVec2::new(8.0, -8.0),
            DVec2::new(-8.0, -8.0),
        ]));
        wave.add_source(DVec2::ZERO, 0.2, 0.0);
        wave.begin(DT);
        wave
    }

    fn sand() -> SandField {
        let pos = DVec2::new(-8.0, 8.0);
        let mut s = SandField::new(pos, pos);
        s.begin();
        s
    }

    #[test]
    fn add_particle_appends() {
        let mut s = sand();
        assert!(s.is_empty());
        s.add_particle(DVec2::ZERO, DVec2::ZERO);
        s.add_particle(DVec2::new(1.0, 1.0), DVec2::new(0.1, 0.0));
        assert_eq!(s.len(), 2);
        assert_eq!(s.particles()[1].velocity, DVec2::new(0.1, 0.0));
    }

    #[test]
    fn step_while_solver_idle_is_a_no_op() {
        let wave = WaveField::new(ALPHA, viewbox());
        let mut s = sand();
        s.add_particle(DVec2::new(1000.0, 0.0), DVec2::ZERO);
        s.step(DT, &wave);
        // Not even the removal pass runs without an active plate.
        assert_eq!(s.len(), 1);
        assert_eq!(s.particles()[0].position, DVec2::new(1000.0, 0.0));
    }

    #[test]
    fn out_of_plate_grain_is_removed_before_advection() {
        let wave = simulating_wave();
        let mut s = sand();
        s.add_particle(DVec2::new(100.0, 100.0), DVec2::ZERO);
        s.add_particle(DVec2::new(2.0, 2.0), DVec2::ZERO);
        s.step(DT, &wave);
        assert_eq!(s.len(), 1);
        assert_eq!(s.particles()[0].position.round(), DVec2::new(2.0, 2.0).round());
    }

    #[test]
    fn grain_on_flat_field_keeps_its_velocity() {
        // Away from the source the field is still identically zero right
        // after begin, so curvature (and acceleration) are zero.
        let wave = simulating_wave();
        let mut s = sand();
        let v0 = DVec2::new(3.0, 0.0);
        s.add_particle(DVec2::new(-5.0, -5.0), v0);
        s.step(DT, &wave);
        let p = s.particles()[0];
        assert_eq!(p.velocity, v0);
        assert_eq!(p.position, DVec2::new(-5.0, -5.0) + v0 * DT);
    }

    #[test]
    fn grain_next_to_source_feels_curvature() {
        let mut wave = simulating_wave();
        wave.step(DT, DT);
        let mut s = sand();
        s.add_particle(DVec2::new(1.0, 0.0), DVec2::ZERO);
        s.step(DT, &wave);
        let p = s.particles()[0];
        assert!(
            p.velocity.length_squared() > 0.0,
            "grain beside the source should accelerate"
        );
    }

    #[test]
    fn acceleration_matches_curvature_formula() {
        let mut wave = simulating_wave();
        wave.step(DT, DT);
        let view = wave.plate_view().unwrap();
        let offset = view.offset();

        let start = DVec2::new(1.0, 0.0);
        let cell = start.round().as_ivec2() - offset;
        let (x, y) = (cell.x as isize, cell.y as isize);
        let mid = view.field().get(x, y).unwrap();
        let up = view.value_or(x, y + 1, mid);
        let right = view.value_or(x + 1, y, mid);
        let down = view.value_or(x, y - 1, mid);
        let left = view.value_or(x - 1, y, mid);
        let dt2 = DT * DT;
        let accel = DVec2::new(
            (right - 2.0 * mid + left) / dt2,
            (up - 2.0 * mid + down) / dt2,
        ) * 0.2;
        let expected_velocity = accel * DT;
        let expected_position = start + expected_velocity * DT;

        let mut s = sand();
        s.add_particle(start, DVec2::ZERO);
        s.step(DT, &wave);
        let p = s.particles()[0];
        assert!((p.velocity - expected_velocity).length() < 1e-12);
        assert!((p.position - expected_position).length() < 1e-12);
    }

    #[test]
    fn oversized_dt_is_clamped_with_the_solver_alpha() {
        let mut wave_a = simulating_wave();
        let mut wave_b = simulating_wave();
        wave_a.step(DT, DT);
        wave_b.step(DT, DT);

        let mut a = sand();
        let mut b = sand();
        a.add_particle(DVec2::new(1.0, 0.0), DVec2::ZERO);
        b.add_particle(DVec2::new(1.0, 0.0), DVec2::ZERO);
        a.step(50.0, &wave_a);
        b.step(1.0 / ALPHA, &wave_b);
        assert_eq!(a.particles()[0].position, b.particles()[0].position);
        assert_eq!(a.particles()[0].velocity, b.particles()[0].velocity);
    }

    #[test]
    fn reset_clears_grains_and_is_idempotent() {
        let wave = simulating_wave();
        let mut s = sand();
        s.add_particle(DVec2::ZERO, DVec2::ZERO);
        s.step(DT, &wave);
        s.reset();
        assert!(s.is_empty());
        s.reset();
        assert!(s.is_empty());
    }

    #[test]
    fn display_offset_shifts_presented_positions() {
        let mut s = SandField::new(DVec2::new(30.0, 225.0), DVec2::new(-250.0, 250.0));
        s.begin();
        assert_eq!(s.display_offset(), DVec2::new(280.0, -25.0));
        let p = Particle {
            position: DVec2::new(1.0, 2.0),
            velocity: DVec2::ZERO,
        };
        assert_eq!(s.display_position_of(&p), DVec2::new(281.0, -23.0));
    }
}
