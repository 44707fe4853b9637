//! Application terminal : boucle d'événements, CLI, export interactif et hot-reload.

pub mod app;
pub mod cli;
pub mod dialog;
pub mod headless;
pub mod hotreload;
