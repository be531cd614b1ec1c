//! PNG snapshot output.

use chladni_core::CoreError;
use std::path::Path;

/// Writes an RGBA8 buffer as a PNG image.
///
/// Returns `CoreError::InvalidDimensions` if the dimensions overflow `u32`
/// or do not match the buffer length, or `CoreError::Io` on write failure.
pub fn write_png(rgba: &[u8], width: usize, height: usize, path: &Path) -> Result<(), CoreError> {
    let w = u32::try_from(width).map_err(|_| CoreError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| CoreError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba.to_vec())
        .ok_or(CoreError::InvalidDimensions)?;
    img.save(path).map_err(|e| CoreError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plate.png");
        let rgba = vec![128u8; 16 * 8 * 4];

        write_png(&rgba, 16, 8, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 8);
    }

    #[test]
    fn write_png_rejects_mismatched_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let result = write_png(&[0u8; 7], 4, 4, &path);
        assert!(matches!(result, Err(CoreError::InvalidDimensions)));
    }
}
