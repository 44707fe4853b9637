use pb_core::grid::Grid;
use pb_core::palette::Palette;
use pb_core::traits::Surface;

/// Repeint toute la surface à partir de la grille.
///
/// Efface d'abord la surface, puis remplit pour chaque cellule `i` un bloc
/// `pixel_size × pixel_size` en `(x * pixel_size, y * pixel_size)`, avec
/// `x = i % W` et `y = i / W`. Aucun rendu différentiel : le résultat ne dépend
/// que de la grille et de la palette.
///
/// # Example
/// ```
/// use pb_core::frame::FrameBuffer;
/// use pb_core::grid::Grid;
/// use pb_core::palette::Palette;
/// use pb_render::renderer::render;
///
/// let grid = Grid::new(2, 1);
/// let mut fb = FrameBuffer::new(8, 4);
/// render(&grid, &Palette::default(), &mut fb, 4);
/// assert_eq!(fb.pixel(7, 3), (255, 255, 255, 255));
/// ```
pub fn render<S: Surface + ?Sized>(grid: &Grid, palette: &Palette, surface: &mut S, pixel_size: u32) {
    surface.clear();
    let width = grid.width() as usize;
    for (i, &cell) in grid.cells().iter().enumerate() {
        let x = (i % width) as u32;
        let y = (i / width) as u32;
        surface.fill_rect(
            x * pixel_size,
            y * pixel_size,
            pixel_size,
            pixel_size,
            palette.color_of_cell(cell),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::canvas::PIXEL_SIZE;
    use pb_core::frame::FrameBuffer;
    use pb_core::palette::Rgb;

    /// Enregistre les appels pour vérifier la séquence clear → fills.
    #[derive(Default)]
    struct Recorder {
        ops: Vec<Option<(u32, u32, u32, u32, Rgb)>>,
    }

    impl Surface for Recorder {
        fn size(&self) -> (u32, u32) {
            (0, 0)
        }
        fn clear(&mut self) {
            self.ops.push(None);
        }
        fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
            self.ops.push(Some((x, y, w, h, color)));
        }
    }

    #[test]
    fn clears_once_then_fills_every_cell_in_order() {
        let palette = Palette::default();
        let grid = Grid::from_values(3, 2, &[0, 1, 2, 3, 4, 5], 16).unwrap();
        let mut rec = Recorder::default();
        render(&grid, &palette, &mut rec, 4);

        assert_eq!(rec.ops.len(), 7);
        assert_eq!(rec.ops[0], None);
        assert_eq!(rec.ops[1], Some((0, 0, 4, 4, palette.color_of_cell(0))));
        assert_eq!(rec.ops[3], Some((8, 0, 4, 4, palette.color_of_cell(2))));
        assert_eq!(rec.ops[4], Some((0, 4, 4, 4, palette.color_of_cell(3))));
        assert_eq!(rec.ops[6], Some((8, 4, 4, 4, palette.color_of_cell(5))));
    }

    #[test]
    fn full_repaint_overwrites_previous_content() {
        let palette = Palette::default();
        let mut fb = FrameBuffer::new(200 * PIXEL_SIZE, 100 * PIXEL_SIZE);
        let red = palette.index(5).unwrap();
        let painted = Grid::blank().with_cell(10, 10, red);

        render(&painted, &palette, &mut fb, PIXEL_SIZE);
        assert_eq!(fb.pixel(10 * PIXEL_SIZE + 3, 10 * PIXEL_SIZE), (0xE5, 0, 0, 255));

        render(&Grid::blank(), &palette, &mut fb, PIXEL_SIZE);
        let mut fresh = FrameBuffer::new(fb.width, fb.height);
        render(&Grid::blank(), &palette, &mut fresh, PIXEL_SIZE);
        assert_eq!(fb, fresh);
    }
}
