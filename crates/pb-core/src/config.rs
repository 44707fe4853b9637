use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration de l'éditeur, hot-rechargeable pour les sections `ui` et `export`.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine. Les
/// dimensions de la grille, l'échelle et le cooldown ne sont PAS configurables.
///
/// # Example
/// ```
/// use pb_core::config::AppConfig;
/// let config = AppConfig::default();
/// assert_eq!(config.ui.initial_color, 1);
/// assert!(!config.export.ask_location);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AppConfig {
    /// Emplacement de la grille persistée.
    pub storage: StorageConfig,
    /// Destination des exports PNG.
    pub export: ExportConfig,
    /// Affichage terminal.
    pub ui: UiConfig,
}

/// `[storage]` section.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Dossier du stockage clé-valeur.
    pub dir: PathBuf,
}

/// `[export]` section.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Dossier où `empes_banner.png` est écrit.
    pub dir: PathBuf,
    /// Ouvrir une boîte de dialogue d'enregistrement au lieu d'écrire dans `dir`.
    pub ask_location: bool,
}

/// `[ui]` section.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UiConfig {
    /// Index de palette sélectionné au démarrage [0, 15].
    pub initial_color: usize,
    /// Fréquence de rafraîchissement de l'interface [5, 60].
    pub target_fps: u32,
    /// Afficher la ligne d'aide sous le canvas.
    pub show_help_bar: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                dir: PathBuf::from("data"),
            },
            export: ExportConfig {
                dir: PathBuf::from("."),
                ask_location: false,
            },
            ui: UiConfig {
                initial_color: usize::from(crate::palette::DEFAULT_SELECTION),
                target_fps: 20,
                show_help_bar: true,
            },
        }
    }
}

impl AppConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.ui.initial_color = self.ui.initial_color.min(crate::palette::COLORS.len() - 1);
        self.ui.target_fps = self.ui.target_fps.clamp(5, 60);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    storage: Option<StorageSection>,
    export: Option<ExportSection>,
    ui: Option<UiSection>,
}

#[derive(Deserialize)]
struct StorageSection {
    dir: Option<PathBuf>,
}

#[derive(Deserialize)]
struct ExportSection {
    dir: Option<PathBuf>,
    ask_location: Option<bool>,
}

#[derive(Deserialize)]
struct UiSection {
    initial_color: Option<usize>,
    target_fps: Option<u32>,
    show_help_bar: Option<bool>,
}

/// Parse un document TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the document is not valid TOML for this schema.
///
/// # Example
/// ```
/// use pb_core::config::parse_config;
/// let config = parse_config("[ui]\ntarget_fps = 500\n").unwrap();
/// assert_eq!(config.ui.target_fps, 60);
/// assert_eq!(config.ui.initial_color, 1);
/// ```
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = AppConfig::default();

    if let Some(s) = file.storage
        && let Some(v) = s.dir
    {
        config.storage.dir = v;
    }
    if let Some(e) = file.export {
        if let Some(v) = e.dir {
            config.export.dir = v;
        }
        if let Some(v) = e.ask_location {
            config.export.ask_location = v;
        }
    }
    if let Some(u) = file.ui {
        if let Some(v) = u.initial_color {
            config.ui.initial_color = v;
        }
        if let Some(v) = u.target_fps {
            config.ui.target_fps = v;
        }
        if let Some(v) = u.show_help_bar {
            config.ui.show_help_bar = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use pb_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.storage.dir, PathBuf::from("data"));
        assert!(!config.export.ask_location);
        assert!(config.ui.show_help_bar);
    }

    #[test]
    fn partial_sections_override_only_given_fields() {
        let config = parse_config(
            "[storage]\ndir = \"/tmp/banner\"\n\n[export]\nask_location = true\n",
        )
        .unwrap();
        assert_eq!(config.storage.dir, PathBuf::from("/tmp/banner"));
        assert!(config.export.ask_location);
        assert_eq!(config.export.dir, PathBuf::from("."));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config("[ui]\ninitial_color = 40\ntarget_fps = 1\n").unwrap();
        assert_eq!(config.ui.initial_color, 15);
        assert_eq!(config.ui.target_fps, 5);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(parse_config("[ui]\ntarget_fps = \"fast\"\n").is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.toml");
        std::fs::write(&path, "[ui]\nshow_help_bar = false\n").unwrap();
        assert!(!load_config(&path).unwrap().ui.show_help_bar);
        assert!(load_config(&dir.path().join("missing.toml")).is_err());
    }
}
