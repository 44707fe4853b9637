use crate::error::CoreError;
use crate::palette::Rgb;

/// Surface de dessin adressée en pixels.
///
/// Implémenté par : `FrameBuffer` (raster RGBA hors-écran) et l'adaptateur
/// terminal de `pb-render`.
///
/// # Example
/// ```
/// use pb_core::traits::Surface;
///
/// struct Counter(u32);
/// impl Surface for Counter {
///     fn size(&self) -> (u32, u32) { (4, 4) }
///     fn clear(&mut self) { self.0 = 0; }
///     fn fill_rect(&mut self, _x: u32, _y: u32, _w: u32, _h: u32, _c: (u8, u8, u8)) { self.0 += 1; }
/// }
/// let mut s = Counter(0);
/// s.fill_rect(0, 0, 1, 1, (0, 0, 0));
/// assert_eq!(s.0, 1);
/// ```
pub trait Surface {
    /// Dimensions de la surface en pixels.
    fn size(&self) -> (u32, u32);

    /// Efface toute la surface.
    fn clear(&mut self);

    /// Remplit un rectangle. Les parties hors surface sont ignorées.
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb);
}

/// Stockage clé-valeur local, une chaîne par clé.
///
/// Implémenté par : `FileStore` (un fichier par clé) et `MemoryStore`.
pub trait KeyValueStore {
    /// Lit la valeur associée à `key`. `Ok(None)` si la clé est absente.
    ///
    /// # Errors
    /// Returns an error if the backing storage exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Écrit `value` sous `key`, en remplaçant toute valeur précédente.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
}
