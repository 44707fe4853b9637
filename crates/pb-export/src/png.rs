use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use pb_core::frame::FrameBuffer;
use pb_core::grid::Grid;
use pb_core::palette::Palette;
use pb_render::renderer;

use crate::error::ExportError;

/// Nom suggéré pour le fichier exporté.
pub const EXPORT_FILE_NAME: &str = "empes_banner.png";

/// Rasterise la grille à l'échelle 1 : un pixel par cellule, `W × H` exactement.
#[must_use]
pub fn rasterize(grid: &Grid, palette: &Palette) -> FrameBuffer {
    let mut fb = FrameBuffer::new(grid.width(), grid.height());
    renderer::render(grid, palette, &mut fb, 1);
    fb
}

/// Encode la grille en PNG RGBA 8 bits, sans mise à l'échelle.
///
/// Fonction pure : aucun effet sur la grille ni sur le cooldown, sortie
/// identique octet pour octet pour une même grille.
///
/// # Errors
/// Returns an error if the PNG encoder fails.
///
/// # Example
/// ```
/// use pb_core::grid::Grid;
/// use pb_core::palette::Palette;
/// use pb_export::export_image;
///
/// let bytes = export_image(&Grid::blank(), &Palette::default()).unwrap();
/// assert_eq!(&bytes[1..4], b"PNG");
/// ```
pub fn export_image(grid: &Grid, palette: &Palette) -> Result<Vec<u8>, ExportError> {
    let fb = rasterize(grid, palette);
    let (width, height) = (fb.width, fb.height);
    let img = RgbaImage::from_raw(width, height, fb.data)
        .ok_or(ExportError::Raster { width, height })?;

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    let bytes = out.into_inner();
    log::debug!("PNG {width}×{height} encodé ({} octets)", bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::canvas::PIXEL_SIZE;
    use pb_render::canvas::CanvasView;

    #[test]
    fn export_is_unscaled_and_matches_palette() {
        let palette = Palette::default();
        let red = palette.index(5).unwrap();
        let purple = palette.index(15).unwrap();
        let grid = Grid::blank().with_cell(0, 0, red).with_cell(199, 99, purple);

        let bytes = export_image(&grid, &palette).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (200, 100));
        assert_eq!(decoded.get_pixel(0, 0).0, [0xE5, 0x00, 0x00, 0xFF]);
        assert_eq!(decoded.get_pixel(199, 99).0, [0x82, 0x00, 0x80, 0xFF]);
        assert_eq!(decoded.get_pixel(1, 0).0, [0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn export_is_deterministic_and_leaves_grid_alone() {
        let palette = Palette::default();
        let grid = Grid::blank().with_cell(50, 50, palette.index(11).unwrap());
        let before = grid.clone();
        let a = export_image(&grid, &palette).unwrap();
        let b = export_image(&grid, &palette).unwrap();
        assert_eq!(a, b);
        assert_eq!(grid, before);
    }

    #[test]
    fn export_agrees_with_on_screen_raster() {
        let palette = Palette::default();
        let mut grid = Grid::blank();
        for i in 0..16u32 {
            grid = grid.with_cell(i * 7, i * 3, palette.index(i as usize).unwrap());
        }
        let mut view = CanvasView::new(&grid);
        view.refresh(&grid, &palette);
        let small = rasterize(&grid, &palette);

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                assert_eq!(
                    small.pixel(x, y),
                    view.raster().pixel(x * PIXEL_SIZE + 1, y * PIXEL_SIZE + 2),
                    "cell ({x}, {y})"
                );
            }
        }
    }
}
