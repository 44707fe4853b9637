/// Couleur RGB 8 bits par canal.
pub type Rgb = (u8, u8, u8);

/// Les 16 couleurs de la bannière, dans l'ordre d'affichage.
pub const COLORS: [Rgb; 16] = [
    (0xFF, 0xFF, 0xFF),
    (0xE4, 0xE4, 0xE4),
    (0x88, 0x88, 0x88),
    (0x22, 0x22, 0x22),
    (0xFF, 0xA7, 0xD1),
    (0xE5, 0x00, 0x00),
    (0xE5, 0x95, 0x00),
    (0xA0, 0x6A, 0x42),
    (0xE5, 0xD9, 0x00),
    (0x94, 0xE0, 0x44),
    (0x02, 0xBE, 0x01),
    (0x00, 0xD3, 0xDD),
    (0x00, 0x83, 0xC7),
    (0x00, 0x00, 0xEA),
    (0xCF, 0x6E, 0xE4),
    (0x82, 0x00, 0x80),
];

/// Index sélectionné au démarrage (gris clair).
pub const DEFAULT_SELECTION: u8 = 1;

/// Index validé dans la palette. Ne peut être construit que via [`Palette::index`],
/// donc toujours dans `[0, N)`.
///
/// # Example
/// ```
/// use pb_core::palette::Palette;
/// let palette = Palette::default();
/// let red = palette.index(5).unwrap();
/// assert_eq!(red.get(), 5);
/// assert!(palette.index(16).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorIndex(u8);

impl ColorIndex {
    /// Raw palette slot.
    #[inline]
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Palette ordonnée, immuable pour toute la durée du process.
///
/// # Example
/// ```
/// use pb_core::palette::Palette;
/// let palette = Palette::default();
/// assert_eq!(palette.len(), 16);
/// assert_eq!(palette.hex(palette.index(5).unwrap()), "#E50000");
/// ```
#[derive(Clone, Debug)]
pub struct Palette {
    colors: &'static [Rgb],
}

impl Default for Palette {
    fn default() -> Self {
        Self { colors: &COLORS }
    }
}

impl Palette {
    /// Number of selectable colors.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for the built-in palette.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Valide un index brut.
    #[must_use]
    pub fn index(&self, raw: usize) -> Option<ColorIndex> {
        (raw < self.colors.len()).then(|| ColorIndex(raw as u8))
    }

    /// Index de sélection initiale, ramené dans la palette.
    #[must_use]
    pub fn clamp_index(&self, raw: usize) -> ColorIndex {
        ColorIndex(raw.min(self.colors.len().saturating_sub(1)) as u8)
    }

    /// Default selection (`#E4E4E4`).
    #[must_use]
    pub fn default_selection(&self) -> ColorIndex {
        self.clamp_index(usize::from(DEFAULT_SELECTION))
    }

    /// Couleur d'un index validé.
    #[inline]
    #[must_use]
    pub fn color(&self, index: ColorIndex) -> Rgb {
        self.colors[usize::from(index.0)]
    }

    /// Lookup for a raw cell value. Grids only hold validated values, so the
    /// fallback to slot 0 is never hit for a well-formed grid.
    #[inline]
    #[must_use]
    pub fn color_of_cell(&self, cell: u8) -> Rgb {
        self.colors
            .get(usize::from(cell))
            .copied()
            .unwrap_or(self.colors[0])
    }

    /// Représentation `#RRGGBB`.
    #[must_use]
    pub fn hex(&self, index: ColorIndex) -> String {
        let (r, g, b) = self.color(index);
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    /// Iterate `(index, color)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorIndex, Rgb)> + '_ {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, &c)| (ColorIndex(i as u8), c))
    }

    /// Next slot, wrapping around.
    #[must_use]
    pub fn next(&self, index: ColorIndex) -> ColorIndex {
        ColorIndex(((usize::from(index.0) + 1) % self.colors.len()) as u8)
    }

    /// Previous slot, wrapping around.
    #[must_use]
    pub fn prev(&self, index: ColorIndex) -> ColorIndex {
        let len = self.colors.len();
        ColorIndex(((usize::from(index.0) + len - 1) % len) as u8)
    }
}
