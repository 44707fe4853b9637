use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use pb_app::{app, cli, headless, hotreload};
use pb_core::clock::SystemClock;
use pb_core::config::AppConfig;
use pb_core::store::{FileStore, MemoryStore};
use pb_core::traits::KeyValueStore;
use pb_export::DirectorySink;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging (stderr est masqué par l'interface : préférer --log-file)
    init_logging(&cli)?;

    // 3. Charger la config + overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);

    // 4. Stockage de la grille
    let store: Box<dyn KeyValueStore> = if cli.ephemeral {
        log::info!("Mode éphémère : rien ne sera sauvegardé.");
        Box::new(MemoryStore::default())
    } else {
        Box::new(FileStore::new(config.storage.dir.clone()))
    };

    // Export sans interface
    if cli.export {
        let mut sink = DirectorySink::new(config.export.dir.clone());
        if let Some(path) = headless::export_saved(store.as_ref(), &mut sink)? {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let config = Arc::new(ArcSwap::from_pointee(config));

    // 5. Lancer le hot-reload config (thread interne notify)
    let _watcher = if cli.config.exists() {
        let overrides = cli.clone();
        hotreload::spawn_config_watcher(&cli.config, &config, move |c| {
            overrides.apply_overrides(c);
        })
        .inspect_err(|e| log::warn!("Hot-reload indisponible : {e:#}"))
        .ok()
    } else {
        None
    };

    // 6. Construire l'App (charge la grille persistée)
    let mut app_instance = app::App::new(config, store, Box::new(SystemClock));

    // 7. Initialiser le terminal ratatui + souris
    let terminal = ratatui::init();
    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;

    // 8. Boucle principale
    let result = app_instance.run(terminal);

    // 9. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    crossterm::execute!(std::io::stdout(), DisableMouseCapture).ok();
    ratatui::restore();

    result
}

fn init_logging(cli: &cli::Cli) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn));
    if let Some(ref path) = cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("Impossible de créer le fichier de log {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn resolve_config(cli: &cli::Cli) -> Result<AppConfig> {
    if cli.config.exists() {
        pb_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(AppConfig::default())
    }
}
