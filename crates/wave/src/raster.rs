//! Boundary rasterizer: closed polygon to plate mask.
//!
//! Runs once per session. Cost is O(width·height·n) in the polygon's vertex
//! count, which is fine off the hot path; the per-step loops only ever read
//! the finished mask.

use chladni_core::geom::{point_in_polygon, Rect};
use chladni_core::grid::MaskGrid;
use glam::{DVec2, IVec2};

/// A rasterized plate: boolean membership mask plus the grid's placement in
/// world coordinates.
///
/// Cell `(x, y)` of the mask corresponds to the world point `offset + (x, y)`.
#[derive(Debug, Clone)]
pub struct Plate {
    mask: MaskGrid,
    offset: IVec2,
}

impl Plate {
    /// The membership mask.
    pub fn mask(&self) -> &MaskGrid {
        &self.mask
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

    /// Grid cell for a world point, rounding to the nearest cell.
    pub fn cell_of(&self, world: DVec2) -> IVec2 {
        world.round().as_ivec2() - self.offset
    }

    /// Whether a world point's nearest cell lies inside the plate.
    pub fn contains_world(&self, world: DVec2) -> bool {
        let c = self.cell_of(world);
        self.mask.get(c.x as isize, c.y as isize)
    }
}

/// Rasterizes a closed polygon into a [`Plate`].
///
/// The grid covers the union of the authoring `viewbox` and the polygon's
/// vertex bounding box, so the plate is never smaller than the viewbox and
/// grows to include outlying vertices. The minimum corner is floored and the
/// maximum ceiled, keeping the offset integer-valued.
///
/// Returns `None` for polygons with fewer than 2 vertices or a zero-area
/// box; the caller treats that as "no plate" and stays idle.
pub fn rasterize(polygon: &[DVec2], viewbox: Rect) -> Option<Plate> {
    if polygon.len() < 2 {
        return None;
    }

    let mut bounds = viewbox;
    for &v in polygon {
        bounds = bounds.union_point(v);
    }
    let min = bounds.min.floor();
    let max = bounds.max.ceil();
    let width = (max.x - min.x) as usize;
    let height = (max.y - min.y) as usize;
    let offset = min.as_ivec2();

    let mut mask = MaskGrid::new(width, height).ok()?;
    for y in 0..height {
        for x in 0..width {
            let world = DVec2::new(
                (offset.x + x as i32) as f64,
                (offset.y + y as i32) as f64,
            );
            mask.set(x as isize, y as isize, point_in_polygon(world, polygon));
        }
    }
    Some(Plate { mask, offset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chladni_core::geom::close_polygon;

    fn viewbox() -> Rect {
        Rect::new(DVec2::new(-250.0, -250.0), DVec2::new(250.0, 250.0))
    }

    fn square() -> Vec<DVec2> {
        close_polygon(vec![
            DVec2::new(-250.0, 250.0),
            DVec2::new(250.0, 250.0),
            DVec2::new(250.0, -250.0),
            DVec2::new(-250.0, -250.0),
        ])
    }

    #[test]
    fn square_plate_has_viewbox_dimensions() {
        let plate = rasterize(&square(), viewbox()).unwrap();
        assert_eq!(plate.width(), 500);
        assert_eq!(plate.height(), 500);
        assert_eq!(plate.offset(), IVec2::new(-250, -250));
    }

    #[test]
    fn every_mask_cell_matches_the_geometry_test() {
        let poly = close_polygon(vec![
            DVec2::new(-10.0, -4.0),
            DVec2::new(12.0, -4.0),
            DVec2::new(3.0, 9.0),
        ]);
        let vb = Rect::new(DVec2::new(-16.0, -16.0), DVec2::new(16.0, 16.0));
        let plate = rasterize(&poly, vb).unwrap();
        for y in 0..plate.height() {
            for x in 0..plate.width() {
                let world = DVec2::new(
                    (plate.offset().x + x as i32) as f64,
                    (plate.offset().y + y as i32) as f64,
                );
                assert_eq!(
                    plate.mask().get(x as isize, y as isize),
                    point_in_polygon(world, &poly),
                    "mismatch at cell ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn grid_is_never_smaller_than_the_viewbox() {
        // A tiny polygon in the middle still gets the full viewbox grid.
        let poly = close_polygon(vec![
            DVec2::new(-5.0, -5.0),
            DVec2::new(5.0, -5.0),
            DVec2::new(5.0, 5.0),
            DVec2::new(-5.0, 5.0),
        ]);
        let plate = rasterize(&poly, viewbox()).unwrap();
        assert_eq!(plate.width(), 500);
        assert_eq!(plate.height(), 500);
    }

    #[test]
    fn grid_grows_to_include_outlying_vertices() {
        let poly = close_polygon(vec![
            DVec2::new(-250.0, -250.0),
            DVec2::new(300.0, -250.0),
            DVec2::new(300.0, 250.0),
            DVec2::new(-250.0, 250.0),
        ]);
        let plate = rasterize(&poly, viewbox()).unwrap();
        assert_eq!(plate.width(), 550);
        assert_eq!(plate.offset(), IVec2::new(-250, -250));
    }

    #[test]
    fn fractional_vertices_floor_and_ceil_the_box() {
        let poly = close_polygon(vec![
            DVec2::new(-250.0, -250.0),
            DVec2::new(250.7, -250.0),
            DVec2::new(250.7, 250.0),
            DVec2::new(-250.0, 250.0),
        ]);
        let plate = rasterize(&poly, viewbox()).unwrap();
        assert_eq!(plate.width(), 501);
    }

    #[test]
    fn degenerate_polygon_yields_no_plate() {
        assert!(rasterize(&[], viewbox()).is_none());
        assert!(rasterize(&[DVec2::ZERO], viewbox()).is_none());
    }

    #[test]
    fn zero_area_viewbox_with_flat_polygon_yields_no_plate() {
        let flat = Rect::new(DVec2::ZERO, DVec2::ZERO);
        let poly = vec![DVec2::ZERO, DVec2::new(0.0, 0.0)];
        assert!(rasterize(&poly, flat).is_none());
    }

    #[test]
    fn interior_and_exterior_cells_classified() {
        let plate = rasterize(&square(), viewbox()).unwrap();
        // World origin is cell (250, 250).
        assert!(plate.mask().get(250, 250));
        assert!(plate.contains_world(DVec2::ZERO));
        // The mask has both inside and outside cells (corners of the grid sit
        // on the boundary itself).
        let set = plate.mask().count_set();
        assert!(set > 0 && set < plate.width() * plate.height());
    }

    #[test]
    fn cell_of_rounds_to_nearest_cell() {
        let plate = rasterize(&square(), viewbox()).unwrap();
        assert_eq!(plate.cell_of(DVec2::new(0.4, -0.4)), IVec2::new(250, 250));
        assert_eq!(plate.cell_of(DVec2::new(0.6, 0.0)), IVec2::new(251, 250));
    }
}
