use std::path::PathBuf;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use pb_export::{DownloadSink, ExportError, write_file};
use ratatui::DefaultTerminal;

/// Export via la boîte de dialogue native « Enregistrer sous ».
///
/// Le TUI est suspendu le temps du dialogue puis restauré. Annuler le
/// dialogue n'écrit rien.
pub struct DialogSink<'a> {
    terminal: &'a mut DefaultTerminal,
}

impl<'a> DialogSink<'a> {
    /// Wrap the live terminal so it can be suspended around the dialog.
    pub fn new(terminal: &'a mut DefaultTerminal) -> Self {
        Self { terminal }
    }

    /// Suspend le TUI, ouvre le dialog natif, restaure le TUI.
    fn ask(&mut self, file_name: &str) -> Option<PathBuf> {
        crossterm::terminal::disable_raw_mode().ok();
        crossterm::execute!(
            std::io::stdout(),
            DisableMouseCapture,
            crossterm::terminal::LeaveAlternateScreen
        )
        .ok();

        let picked = rfd::FileDialog::new()
            .set_title("Export as PNG \u{2014} pixelbanner")
            .set_file_name(file_name)
            .add_filter("PNG", &["png"])
            .save_file();

        crossterm::terminal::enable_raw_mode().ok();
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            EnableMouseCapture
        )
        .ok();
        self.terminal.clear().ok();

        picked
    }
}

impl DownloadSink for DialogSink<'_> {
    fn save(&mut self, bytes: &[u8], file_name: &str) -> Result<Option<PathBuf>, ExportError> {
        let Some(path) = self.ask(file_name) else {
            log::info!("Export annulé");
            return Ok(None);
        };
        write_file(&path, bytes)?;
        log::info!("Export écrit : {}", path.display());
        Ok(Some(path))
    }
}
