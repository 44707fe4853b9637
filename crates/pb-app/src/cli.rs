use std::path::PathBuf;

use clap::Parser;

use pb_core::config::AppConfig;

/// pixelbanner : Make Empes Banner, one pixel per minute.
#[derive(Parser, Clone, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Dossier de stockage de la grille (remplace [storage] dir).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Dossier de destination des exports PNG (remplace [export] dir).
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Exporter la grille sauvegardée en PNG puis quitter, sans interface.
    #[arg(long, default_value_t = false)]
    pub export: bool,

    /// Ne rien lire ni écrire sur disque : la grille vit le temps de la session.
    #[arg(long, default_value_t = false)]
    pub ephemeral: bool,

    /// Index de couleur sélectionné au démarrage (0-15).
    #[arg(long)]
    pub color: Option<usize>,

    /// Fréquence de rafraîchissement de l'interface.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Écrire les logs dans ce fichier plutôt que sur stderr (qui est masqué par l'interface).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Applique les overrides de la ligne de commande sur une config chargée.
    ///
    /// Réappliqué à chaque rechargement à chaud pour que le fichier ne les écrase pas.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(ref dir) = self.data_dir {
            config.storage.dir.clone_from(dir);
        }
        if let Some(ref dir) = self.export_dir {
            config.export.dir.clone_from(dir);
        }
        if let Some(color) = self.color {
            config.ui.initial_color = color;
        }
        if let Some(fps) = self.fps {
            config.ui.target_fps = fps;
        }
        config.clamp_all();
    }
}
