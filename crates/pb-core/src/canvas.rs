use crate::clock::{Cooldown, Millis};
use crate::error::{CoreError, CooldownError};
use crate::grid::{GRID_HEIGHT, GRID_WIDTH, Grid};
use crate::palette::{ColorIndex, Palette};
use crate::traits::KeyValueStore;

/// Échelle d'affichage : taille d'une cellule en pixels de surface.
pub const PIXEL_SIZE: u32 = 4;

/// Clé de stockage de la grille sérialisée.
pub const STORAGE_KEY: &str = "pixels";

/// Issue d'un placement accepté par le cooldown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// La cellule a été repeinte ; contient la nouvelle grille, à persister.
    Painted(Grid),
    /// Coordonnées hors grille : rien n'a changé, rien à signaler.
    Ignored,
}

impl Placement {
    /// Grid after the attempt: the painted grid, or `original` when ignored.
    #[must_use]
    pub fn into_grid(self, original: &Grid) -> Grid {
        match self {
            Self::Painted(grid) => grid,
            Self::Ignored => original.clone(),
        }
    }
}

/// Gestionnaire d'état de la grille : règles de mutation et horloge de cooldown.
///
/// La grille elle-même appartient à l'appelant ; le gestionnaire ne possède que
/// l'instant du dernier placement réussi.
///
/// # Example
/// ```
/// use pb_core::canvas::{CanvasManager, Placement};
/// use pb_core::grid::Grid;
/// use pb_core::palette::Palette;
///
/// let palette = Palette::default();
/// let mut manager = CanvasManager::default();
/// let grid = Grid::blank();
/// let red = palette.index(5).unwrap();
///
/// let placed = manager.try_place(&grid, 0, 0, red, 1_000_000).unwrap();
/// let grid = placed.into_grid(&grid);
/// assert_eq!(grid.cells()[0], 5);
///
/// let err = manager.try_place(&grid, 0, 0, red, 1_001_000).unwrap_err();
/// assert_eq!(err.remaining_secs, 59);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CanvasManager {
    cooldown: Cooldown,
}

impl CanvasManager {
    /// Lecture seule de l'horloge.
    #[must_use]
    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    /// Tente de peindre `(x, y)` avec `color` à l'instant `now`.
    ///
    /// Ordre des vérifications : bornes (hors grille → `Ignored`, silencieux),
    /// puis cooldown. Repeindre une cellule avec sa propre couleur consomme
    /// quand même le cooldown.
    ///
    /// # Errors
    /// Returns `CooldownError` when fewer than the cooldown milliseconds have
    /// elapsed since the last success. Grid and clock are unchanged.
    pub fn try_place(
        &mut self,
        grid: &Grid,
        x: i64,
        y: i64,
        color: ColorIndex,
        now: Millis,
    ) -> Result<Placement, CooldownError> {
        if !grid.contains(x, y) {
            log::debug!("Clic hors grille ignoré : ({x}, {y})");
            return Ok(Placement::Ignored);
        }
        if !self.cooldown.is_ready(now) {
            return Err(CooldownError {
                remaining_secs: self.cooldown.remaining_secs(now),
            });
        }
        let next = grid.with_cell(x as u32, y as u32, color);
        self.cooldown.mark(now);
        log::info!("Pixel ({x}, {y}) ← couleur {}", color.get());
        Ok(Placement::Painted(next))
    }
}

/// Charge la grille persistée, ou une grille blanche si elle est absente ou
/// invalide. N'échoue jamais : toute donnée malformée est traitée comme absente.
///
/// # Example
/// ```
/// use pb_core::canvas::initialize;
/// use pb_core::palette::Palette;
/// use pb_core::store::MemoryStore;
///
/// let grid = initialize(&MemoryStore::default(), &Palette::default());
/// assert!(grid.cells().iter().all(|&c| c == 0));
/// ```
#[must_use]
pub fn initialize(store: &dyn KeyValueStore, palette: &Palette) -> Grid {
    match load_saved(store, palette) {
        Ok(Some(grid)) => {
            log::info!("Grille restaurée depuis le stockage");
            grid
        }
        Ok(None) => {
            log::info!("Aucune grille sauvegardée, canvas vierge");
            Grid::blank()
        }
        Err(e) => {
            log::warn!("Grille sauvegardée ignorée : {e}");
            Grid::blank()
        }
    }
}

fn load_saved(store: &dyn KeyValueStore, palette: &Palette) -> Result<Option<Grid>, CoreError> {
    let Some(raw) = store.get(STORAGE_KEY)? else {
        return Ok(None);
    };
    // `null` est ce qu'écrit un stockage vidé : équivalent à l'absence.
    let values: Option<Vec<i64>> = serde_json::from_str(&raw)?;
    match values {
        Some(values) => {
            Grid::from_values(GRID_WIDTH, GRID_HEIGHT, &values, palette.len()).map(Some)
        }
        None => Ok(None),
    }
}

/// Sérialise la grille complète (tableau JSON plat) sous [`STORAGE_KEY`].
///
/// # Errors
/// Returns an error if the store rejects the write.
pub fn persist(store: &mut dyn KeyValueStore, grid: &Grid) -> Result<(), CoreError> {
    let json = serde_json::to_string(grid.cells())?;
    store.set(STORAGE_KEY, &json)
}

/// Convertit une position pointeur relative à la surface en coordonnées de
/// cellule (division entière arrondie vers le bas, y compris pour le négatif).
///
/// # Example
/// ```
/// use pb_core::canvas::pointer_to_cell;
/// assert_eq!(pointer_to_cell(9, 3, 4), (2, 0));
/// assert_eq!(pointer_to_cell(-1, 0, 4), (-1, 0));
/// ```
#[must_use]
pub fn pointer_to_cell(px: i64, py: i64, pixel_size: u32) -> (i64, i64) {
    let size = i64::from(pixel_size.max(1));
    (px.div_euclid(size), py.div_euclid(size))
}
