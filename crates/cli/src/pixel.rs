//! Pure pixel buffer conversion from a plate view.
//!
//! Field values map to greyscale via `clamp((v + 1) / 2, 0, 1)`; cells
//! outside the mask stay transparent. Grains are stamped after the field so
//! they read on top. Image rows run top-down while grid rows run bottom-up
//! (world y grows upward), so rows are flipped here.

use chladni_sand::Particle;
use chladni_wave::PlateView;

/// RGBA for stamped grains.
const GRAIN_COLOR: [u8; 4] = [255, 220, 64, 255];

/// Converts a plate view to an RGBA8 buffer of `width * height * 4` bytes.
pub fn plate_to_rgba(view: &PlateView) -> Vec<u8> {
    let (w, h) = (view.width(), view.height());
    let mut buf = vec![0u8; w * h * 4];
    for (x, y, v) in view.field().iter() {
        if !view.mask().get(x as isize, y as isize) {
            continue;
        }
        let grey = (((v + 1.0) / 2.0).clamp(0.0, 1.0) * 255.0) as u8;
        let row = h - 1 - y;
        let i = (row * w + x) * 4;
        buf[i] = grey;
        buf[i + 1] = grey;
        buf[i + 2] = grey;
        buf[i + 3] = 255;
    }
    buf
}

/// Stamps each grain as a single opaque pixel at its grid cell. Grains whose
/// cell falls off the grid are skipped.
pub fn stamp_particles(buf: &mut [u8], view: &PlateView, particles: &[Particle]) {
    let (w, h) = (view.width(), view.height());
    for p in particles {
        let cell = p.position.round().as_ivec2() - view.offset();
        if cell.x < 0 || cell.y < 0 || cell.x as usize >= w || cell.y as usize >= h {
            continue;
        }
        let row = h - 1 - cell.y as usize;
        let i = (row * w + cell.x as usize) * 4;
        buf[i..i + 4].copy_from_slice(&GRAIN_COLOR);
    }
}
