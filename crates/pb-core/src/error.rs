use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Cell buffer does not match the grid dimensions.
    #[error("Taille de grille incorrecte : {actual} cellules, {expected} attendues")]
    LengthMismatch {
        /// Expected cell count (`width * height`).
        expected: usize,
        /// Cell count actually provided.
        actual: usize,
    },

    /// A cell references a color outside the palette.
    #[error("Index de couleur hors palette : {index} (palette de {len})")]
    ColorOutOfRange {
        /// Offending index.
        index: i64,
        /// Palette length.
        len: usize,
    },

    /// The key-value store could not be read or written.
    #[error("Stockage « {key} » inaccessible : {source}")]
    Store {
        /// Key being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Grid (de)serialization failure.
    #[error("Sérialisation JSON : {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected placement: the cooldown since the last successful placement has
/// not elapsed yet. Grid and clock are left untouched.
///
/// # Example
/// ```
/// use pb_core::error::CooldownError;
/// let err = CooldownError { remaining_secs: 59 };
/// assert_eq!(err.to_string(), "Cooldown active! Wait 59s");
/// ```
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Cooldown active! Wait {remaining_secs}s")]
pub struct CooldownError {
    /// Remaining wait, truncated to whole seconds.
    pub remaining_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_names_key_and_keeps_source() {
        let err = CoreError::Store {
            key: "pixels".to_string(),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.to_string().contains("pixels"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn bad_json_converts_into_core_error() {
        let parsed: Result<Vec<i64>, CoreError> =
            serde_json::from_str("[1,").map_err(CoreError::from);
        assert!(matches!(parsed, Err(CoreError::Json(_))));
    }
}
