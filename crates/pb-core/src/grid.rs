use crate::error::CoreError;
use crate::palette::ColorIndex;

/// Largeur de la bannière, en cellules.
pub const GRID_WIDTH: u32 = 200;
/// Hauteur de la bannière, en cellules.
pub const GRID_HEIGHT: u32 = 100;

/// Grille d'index de palette, row-major, origine en haut à gauche.
///
/// La longueur vaut toujours `width * height` : elle est fixée à la construction
/// et aucune opération ne la modifie.
///
/// # Example
/// ```
/// use pb_core::grid::Grid;
/// let grid = Grid::blank();
/// assert_eq!(grid.cells().len(), 200 * 100);
/// assert!(grid.cells().iter().all(|&c| c == 0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<u8>,
    width: u32,
    height: u32,
}

impl Grid {
    /// All-zero banner of the fixed `GRID_WIDTH × GRID_HEIGHT` size.
    #[must_use]
    pub fn blank() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }

    /// Grille blanche aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![0u8; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Construit une grille à partir de valeurs brutes, en validant la longueur
    /// et chaque index contre une palette de `palette_len` couleurs.
    ///
    /// # Errors
    /// `InvalidDimensions` for a zero-sized grid, `LengthMismatch` when the
    /// cell count differs from `width * height`, `ColorOutOfRange` for any value
    /// that is negative or `>= palette_len`.
    ///
    /// # Example
    /// ```
    /// use pb_core::grid::Grid;
    /// assert!(Grid::from_values(2, 1, &[0, 15], 16).is_ok());
    /// assert!(Grid::from_values(2, 1, &[0, 16], 16).is_err());
    /// assert!(Grid::from_values(2, 1, &[0], 16).is_err());
    /// ```
    pub fn from_values(
        width: u32,
        height: u32,
        values: &[i64],
        palette_len: usize,
    ) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(CoreError::LengthMismatch {
                expected,
                actual: values.len(),
            });
        }
        let cells = values
            .iter()
            .map(|&v| {
                usize::try_from(v)
                    .ok()
                    .filter(|&i| i < palette_len)
                    .map(|i| i as u8)
                    .ok_or(CoreError::ColorOutOfRange {
                        index: v,
                        len: palette_len,
                    })
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Width in cells.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flat row-major view of the palette indices.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// `true` if `(x, y)` lies inside the grid.
    #[inline]
    #[must_use]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Index de palette de la cellule `(x, y)`, `None` hors grille.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get((y * self.width + x) as usize).copied()
    }

    /// Copie de la grille avec la cellule `(x, y)` repeinte.
    ///
    /// Le chemin appelant a déjà vérifié les bornes ; une coordonnée hors grille
    /// renvoie une copie inchangée.
    #[must_use]
    pub fn with_cell(&self, x: u32, y: u32, color: ColorIndex) -> Self {
        let mut next = self.clone();
        if x < self.width && y < self.height {
            next.cells[(y * self.width + x) as usize] = color.get();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;

    #[test]
    fn with_cell_touches_exactly_one_cell() {
        let palette = Palette::default();
        let grid = Grid::blank();
        let red = palette.index(5).unwrap();
        let next = grid.with_cell(7, 3, red);

        let target = (3 * GRID_WIDTH + 7) as usize;
        for (i, (&a, &b)) in grid.cells().iter().zip(next.cells()).enumerate() {
            if i == target {
                assert_eq!(b, 5);
            } else {
                assert_eq!(a, b, "cell {i} changed");
            }
        }
        assert_eq!(next.get(7, 3), Some(5));
    }

    #[test]
    fn from_values_rejects_negative_entries() {
        let err = Grid::from_values(2, 2, &[0, 1, -1, 2], 16).unwrap_err();
        assert!(matches!(err, CoreError::ColorOutOfRange { index: -1, .. }));
    }

    #[test]
    fn from_values_rejects_zero_dimensions() {
        assert!(matches!(
            Grid::from_values(0, 5, &[], 16),
            Err(CoreError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn contains_checks_all_four_edges() {
        let grid = Grid::blank();
        assert!(grid.contains(0, 0));
        assert!(grid.contains(199, 99));
        assert!(!grid.contains(-1, 0));
        assert!(!grid.contains(0, -1));
        assert!(!grid.contains(200, 0));
        assert!(!grid.contains(0, 100));
    }
}
