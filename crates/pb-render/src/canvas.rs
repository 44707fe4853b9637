use pb_core::canvas::PIXEL_SIZE;
use pb_core::frame::FrameBuffer;
use pb_core::grid::Grid;
use pb_core::palette::Palette;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::renderer;

/// Fenêtre visible du canvas, en cellules de grille.
///
/// Le terminal affiche une cellule de grille par cellule terminal ; quand la
/// zone est plus petite que la grille, l'origine se déplace au clavier ou à
/// la molette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Colonne de grille affichée en haut à gauche.
    pub x: u32,
    /// Ligne de grille affichée en haut à gauche.
    pub y: u32,
}

impl Viewport {
    /// Décale l'origine puis la ramène dans les limites de la grille.
    pub fn scroll(&mut self, dx: i32, dy: i32, area: Rect, grid_w: u32, grid_h: u32) {
        self.x = self.x.saturating_add_signed(dx);
        self.y = self.y.saturating_add_signed(dy);
        self.clamp(area, grid_w, grid_h);
    }

    /// Keep the viewport from scrolling past the grid edge.
    pub fn clamp(&mut self, area: Rect, grid_w: u32, grid_h: u32) {
        self.x = self.x.min(grid_w.saturating_sub(u32::from(area.width)));
        self.y = self.y.min(grid_h.saturating_sub(u32::from(area.height)));
    }
}

/// Canvas à l'écran : raster mis à l'échelle (`PIXEL_SIZE`) + fenêtre visible.
///
/// Le raster n'est recalculé que lorsqu'il est marqué sale : une fois au
/// chargement, puis une fois par placement réussi. Chaque frame terminal se
/// contente de recopier la partie visible.
///
/// # Example
/// ```
/// use pb_core::grid::Grid;
/// use pb_core::palette::Palette;
/// use pb_render::canvas::CanvasView;
///
/// let mut view = CanvasView::new(&Grid::blank());
/// assert!(view.refresh(&Grid::blank(), &Palette::default()));
/// assert!(!view.refresh(&Grid::blank(), &Palette::default()));
/// ```
pub struct CanvasView {
    raster: FrameBuffer,
    dirty: bool,
    renders: u64,
    /// Fenêtre visible.
    pub viewport: Viewport,
}

impl CanvasView {
    /// Pré-alloue le raster aux dimensions de la grille × `PIXEL_SIZE`.
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        Self {
            raster: FrameBuffer::new(grid.width() * PIXEL_SIZE, grid.height() * PIXEL_SIZE),
            dirty: true,
            renders: 0,
            viewport: Viewport::default(),
        }
    }

    /// Demande un repaint complet au prochain `refresh`.
    #[inline]
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Repaint the raster if it is dirty. Returns `true` when a render ran.
    pub fn refresh(&mut self, grid: &Grid, palette: &Palette) -> bool {
        if !self.dirty {
            return false;
        }
        renderer::render(grid, palette, &mut self.raster, PIXEL_SIZE);
        self.dirty = false;
        self.renders += 1;
        log::debug!("Canvas repeint ({} rendus)", self.renders);
        true
    }

    /// Nombre de repaints complets effectués depuis la création.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Scaled raster, `W * PIXEL_SIZE × H * PIXEL_SIZE`.
    #[must_use]
    pub fn raster(&self) -> &FrameBuffer {
        &self.raster
    }

    /// Grid extent in cells.
    #[must_use]
    pub fn grid_size(&self) -> (u32, u32) {
        (self.raster.width / PIXEL_SIZE, self.raster.height / PIXEL_SIZE)
    }

    /// Recopie la partie visible du raster dans le buffer ratatui.
    ///
    /// Chaque cellule terminal prend la couleur du coin haut-gauche du bloc
    /// correspondant. Les cellules au-delà de la grille restent intactes.
    pub fn draw(&self, buf: &mut Buffer, area: Rect) {
        let (grid_w, grid_h) = self.grid_size();
        let cols = u32::from(area.width).min(grid_w.saturating_sub(self.viewport.x));
        let rows = u32::from(area.height).min(grid_h.saturating_sub(self.viewport.y));
        for cy in 0..rows {
            for cx in 0..cols {
                let gx = self.viewport.x + cx;
                let gy = self.viewport.y + cy;
                let (r, g, b, _) = self.raster.pixel(gx * PIXEL_SIZE, gy * PIXEL_SIZE);
                if let Some(cell) = buf.cell_mut((area.x + cx as u16, area.y + cy as u16)) {
                    cell.set_char(' ').set_bg(Color::Rgb(r, g, b));
                }
            }
        }
    }

    /// Position pointeur relative à la surface (en pixels de raster) pour un
    /// clic terminal en `(column, row)`. `None` si le clic tombe hors de `area`.
    #[must_use]
    pub fn pointer_position(&self, area: Rect, column: u16, row: u16) -> Option<(i64, i64)> {
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let scale = i64::from(PIXEL_SIZE);
        let px = (i64::from(column - area.x) + i64::from(self.viewport.x)) * scale;
        let py = (i64::from(row - area.y) + i64::from(self.viewport.y)) * scale;
        Some((px, py))
    }
}
