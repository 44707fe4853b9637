use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use pb_core::canvas::{self, CanvasManager, PIXEL_SIZE, Placement};
use pb_core::clock::Clock;
use pb_core::config::AppConfig;
use pb_core::grid::Grid;
use pb_core::palette::{ColorIndex, Palette};
use pb_core::traits::KeyValueStore;
use pb_export::{DirectorySink, DownloadSink, EXPORT_FILE_NAME};
use pb_render::canvas::CanvasView;
use pb_render::ui::{self, DrawContext, UiLayout};
use ratatui::DefaultTerminal;
use ratatui::layout::Position;

use crate::dialog::DialogSink;

/// Application state.
///
/// # Example
/// ```
/// use pb_app::app::AppState;
/// let state = AppState::Running;
/// assert!(matches!(state, AppState::Running));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppState {
    /// Édition normale : les clics peignent.
    Running,
    /// Overlay d'aide affiché (touche ?).
    Help,
    /// Notification bloquante (cooldown) : le prochain clic ou Entrée la ferme.
    Notice(String),
    /// Fermeture de l'application. Doit se terminer au prochain tour de boucle.
    Quitting,
}

/// Main application struct: the single owner of the banner state.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Config courante (hot-rechargée via arc-swap).
    pub config: Arc<ArcSwap<AppConfig>>,
    /// Palette fixe.
    pub palette: Palette,
    /// Grille courante, seule source de vérité pour le rendu et l'export.
    pub grid: Grid,
    /// Couleur active, jamais persistée.
    pub selection: ColorIndex,
    /// Règles de placement + horloge de cooldown.
    pub manager: CanvasManager,
    /// Raster à l'écran.
    pub canvas: CanvasView,
    /// Zones de la dernière frame dessinée (hit-testing souris).
    pub layout: UiLayout,
    /// Message de statut (résultat d'export, erreur de stockage).
    pub status: Option<String>,
    /// L'utilisateur a demandé un export ; traité dans la boucle principale.
    pub export_requested: bool,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
}

impl App {
    /// Charge la grille persistée et prépare le premier rendu.
    pub fn new(
        config: Arc<ArcSwap<AppConfig>>,
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let palette = Palette::default();
        let grid = canvas::initialize(store.as_ref(), &palette);
        let selection = palette.clamp_index(config.load().ui.initial_color);
        let canvas = CanvasView::new(&grid);

        Self {
            state: AppState::Running,
            config,
            palette,
            grid,
            selection,
            manager: CanvasManager::default(),
            canvas,
            layout: UiLayout::default(),
            status: None,
            export_requested: false,
            store,
            clock,
        }
    }

    /// Main event loop.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);

        loop {
            if self.state == AppState::Quitting {
                break;
            }

            let fps = self.config.load().ui.target_fps.max(1);
            let frame_duration = Duration::from_secs_f64(1.0 / f64::from(fps));
            let elapsed = last_frame.elapsed();

            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements
                if event::poll(frame_duration.saturating_sub(elapsed))? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = Instant::now();

            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            if self.export_requested {
                self.export_requested = false;
                let export = self.config.load().export.clone();
                if export.ask_location {
                    self.export_with(&mut DialogSink::new(&mut terminal));
                } else {
                    self.export_with(&mut DirectorySink::new(export.dir));
                }
            }

            self.draw(&mut terminal)?;
        }
        Ok(())
    }

    /// Repaint the raster if a placement happened, then draw the frame.
    fn draw(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.canvas.refresh(&self.grid, &self.palette);

        let now = self.clock.now_ms();
        let remaining = self.manager.cooldown().remaining_ms(now);
        let cooldown_secs = (remaining > 0).then(|| remaining.div_ceil(1000));
        let show_help_bar = self.config.load().ui.show_help_bar;
        let notice = match &self.state {
            AppState::Notice(msg) => Some(msg.as_str()),
            _ => None,
        };

        let mut drawn = self.layout;
        terminal.draw(|frame| {
            drawn = ui::draw(
                frame,
                &DrawContext {
                    palette: &self.palette,
                    selection: self.selection,
                    canvas: &self.canvas,
                    cooldown_secs,
                    status: self.status.as_deref(),
                    notice,
                    show_help: self.state == AppState::Help,
                    show_help_bar,
                },
            );
        })?;
        self.layout = drawn;
        let (gw, gh) = (self.grid.width(), self.grid.height());
        self.canvas.viewport.clamp(self.layout.canvas, gw, gh);
        Ok(())
    }

    /// Dispatch a terminal event.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code, modifiers),
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => self.handle_mouse(kind, column, row),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.state = AppState::Quitting;
            return;
        }
        match self.state {
            AppState::Notice(_) => {
                if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.state = AppState::Running;
                }
            }
            AppState::Help => {
                if matches!(code, KeyCode::Char('?' | 'q') | KeyCode::Esc) {
                    self.state = AppState::Running;
                }
            }
            AppState::Running => self.handle_running_key(code),
            AppState::Quitting => {}
        }
    }

    fn handle_running_key(&mut self, code: KeyCode) {
        let page = i32::from(self.layout.canvas.height.max(1));
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.state = AppState::Quitting,
            KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Tab => self.selection = self.palette.next(self.selection),
            KeyCode::BackTab => self.selection = self.palette.prev(self.selection),
            KeyCode::Char('x') => self.export_requested = true,
            KeyCode::Left => self.scroll(-1, 0),
            KeyCode::Right => self.scroll(1, 0),
            KeyCode::Up => self.scroll(0, -1),
            KeyCode::Down => self.scroll(0, 1),
            KeyCode::PageUp => self.scroll(0, -page),
            KeyCode::PageDown => self.scroll(0, page),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => self.click(column, row),
            MouseEventKind::ScrollUp => self.scroll(0, -3),
            MouseEventKind::ScrollDown => self.scroll(0, 3),
            MouseEventKind::ScrollLeft => self.scroll(-3, 0),
            MouseEventKind::ScrollRight => self.scroll(3, 0),
            _ => {}
        }
    }

    fn scroll(&mut self, dx: i32, dy: i32) {
        let (gw, gh) = (self.grid.width(), self.grid.height());
        self.canvas
            .viewport
            .scroll(dx, dy, self.layout.canvas, gw, gh);
    }

    /// Clic gauche en `(column, row)` : ferme une notification, ou bien
    /// exporte, sélectionne une couleur, ou peint selon la zone touchée.
    pub fn click(&mut self, column: u16, row: u16) {
        match self.state {
            AppState::Notice(_) | AppState::Help => {
                self.state = AppState::Running;
                return;
            }
            AppState::Quitting => return,
            AppState::Running => {}
        }

        if self.layout.export_button.contains(Position::new(column, row)) {
            self.export_requested = true;
        } else if let Some(i) = ui::swatch_at(self.layout.palette, self.palette.len(), column, row)
        {
            self.selection = self.palette.clamp_index(i);
        } else if let Some((px, py)) = self.canvas.pointer_position(self.layout.canvas, column, row)
        {
            self.place_at_pointer(px, py);
        }
    }

    /// Placement depuis une position pointeur relative à la surface.
    ///
    /// Séquence explicite : muter, persister, puis marquer le canvas à repeindre.
    pub fn place_at_pointer(&mut self, px: i64, py: i64) {
        let (x, y) = canvas::pointer_to_cell(px, py, PIXEL_SIZE);
        let now = self.clock.now_ms();
        match self
            .manager
            .try_place(&self.grid, x, y, self.selection, now)
        {
            Ok(Placement::Painted(next)) => {
                self.grid = next;
                match canvas::persist(self.store.as_mut(), &self.grid) {
                    Ok(()) => self.status = None,
                    Err(e) => {
                        log::error!("Sauvegarde impossible : {e}");
                        self.status = Some(format!("Save failed: {e}"));
                    }
                }
                self.canvas.invalidate();
            }
            Ok(Placement::Ignored) => {}
            Err(e) => {
                log::info!("Placement refusé : {e}");
                self.state = AppState::Notice(e.to_string());
            }
        }
    }

    /// Encode la grille et la confie au sink. Aucun effet sur la grille ni le cooldown.
    pub fn export_with(&mut self, sink: &mut dyn DownloadSink) {
        let result = pb_export::export_image(&self.grid, &self.palette)
            .and_then(|bytes| sink.save(&bytes, EXPORT_FILE_NAME));
        self.status = Some(match result {
            Ok(Some(path)) => format!("Exported {}", path.display()),
            Ok(None) => "Export cancelled".to_string(),
            Err(e) => {
                log::error!("Export échoué : {e}");
                format!("Export failed: {e}")
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crossterm::event::KeyEventState;
    use pb_core::clock::{COOLDOWN_MS, Millis};
    use pb_core::error::CoreError;
    use pb_core::store::MemoryStore;
    use ratatui::layout::Rect;

    const T0: Millis = 1_700_000_000_000;

    struct TestClock(Rc<Cell<Millis>>);

    impl Clock for TestClock {
        fn now_ms(&self) -> Millis {
            self.0.get()
        }
    }

    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
            self.0.borrow().get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
            self.0.borrow_mut().set(key, value)
        }
    }

    fn app_with(store: SharedStore, time: &Rc<Cell<Millis>>) -> App {
        let config = Arc::new(ArcSwap::from_pointee(AppConfig::default()));
        let mut app = App::new(config, Box::new(store), Box::new(TestClock(Rc::clone(time))));
        app.layout = ui::layout(Rect::new(0, 0, 120, 40), true);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(&Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }));
    }

    fn left_click(app: &mut App, column: u16, row: u16) {
        app.handle_event(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    #[test]
    fn click_on_canvas_paints_persists_and_invalidates() {
        let store = SharedStore::default();
        let time = Rc::new(Cell::new(T0));
        let mut app = app_with(store.clone(), &time);
        app.canvas.refresh(&app.grid, &app.palette);

        let c = app.layout.canvas;
        left_click(&mut app, c.x + 3, c.y + 2);

        assert_eq!(app.grid.get(3, 2), Some(1));
        assert!(app.canvas.refresh(&app.grid, &app.palette));
        assert_eq!(app.canvas.render_count(), 2);

        let reloaded = canvas::initialize(&store, &app.palette);
        assert_eq!(reloaded, app.grid);
    }

    /// Store whose writes fail while `failing` is set.
    struct FlakyStore {
        inner: MemoryStore,
        failing: Rc<Cell<bool>>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
            self.inner.get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
            if self.failing.get() {
                return Err(CoreError::Store {
                    key: key.to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn save_failure_status_clears_after_next_successful_save() {
        let time = Rc::new(Cell::new(T0));
        let failing = Rc::new(Cell::new(true));
        let store = FlakyStore {
            inner: MemoryStore::default(),
            failing: Rc::clone(&failing),
        };
        let config = Arc::new(ArcSwap::from_pointee(AppConfig::default()));
        let mut app = App::new(config, Box::new(store), Box::new(TestClock(Rc::clone(&time))));
        app.layout = ui::layout(Rect::new(0, 0, 120, 40), true);
        let c = app.layout.canvas;

        left_click(&mut app, c.x, c.y);
        assert_eq!(app.grid.get(0, 0), Some(1));
        assert!(app.status.as_deref().unwrap_or("").starts_with("Save failed"));

        failing.set(false);
        time.set(T0 + COOLDOWN_MS);
        left_click(&mut app, c.x + 1, c.y);
        assert_eq!(app.grid.get(1, 0), Some(1));
        assert_eq!(app.status, None);
    }

    #[test]
    fn cooldown_click_opens_blocking_notice() {
        let time = Rc::new(Cell::new(T0));
        let mut app = app_with(SharedStore::default(), &time);
        let c = app.layout.canvas;

        left_click(&mut app, c.x, c.y);
        time.set(T0 + 1000);
        left_click(&mut app, c.x + 1, c.y);
        assert_eq!(
            app.state,
            AppState::Notice("Cooldown active! Wait 59s".to_string())
        );
        assert_eq!(app.grid.get(1, 0), Some(0));

        // While the notice is up, a click only dismisses it.
        time.set(T0 + COOLDOWN_MS);
        left_click(&mut app, c.x + 1, c.y);
        assert_eq!(app.state, AppState::Running);
        assert_eq!(app.grid.get(1, 0), Some(0));

        left_click(&mut app, c.x + 1, c.y);
        assert_eq!(app.grid.get(1, 0), Some(1));
    }

    #[test]
    fn click_past_grid_edge_is_silent() {
        let time = Rc::new(Cell::new(T0));
        let mut app = app_with(SharedStore::default(), &time);
        // 120 columns wide terminal but the viewport is scrolled to the far right.
        app.canvas.viewport.x = 150;
        let c = app.layout.canvas;
        left_click(&mut app, c.x + c.width - 1, c.y);
        assert_eq!(app.state, AppState::Running);
        assert_eq!(app.grid, Grid::blank());
        assert!(app.manager.cooldown().last_placed().is_none());
    }

    #[test]
    fn swatch_click_and_tab_change_selection() {
        let time = Rc::new(Cell::new(T0));
        let mut app = app_with(SharedStore::default(), &time);
        assert_eq!(app.selection.get(), 1);

        let swatch = ui::swatch_rect(app.layout.palette, 16, 5);
        left_click(&mut app, swatch.x + 1, swatch.y);
        assert_eq!(app.selection.get(), 5);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.selection.get(), 6);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.selection.get(), 4);

        let c = app.layout.canvas;
        left_click(&mut app, c.x, c.y);
        assert_eq!(app.grid.get(0, 0), Some(4));
    }

    #[test]
    fn export_button_requests_export_and_export_is_pure() {
        let time = Rc::new(Cell::new(T0));
        let mut app = app_with(SharedStore::default(), &time);
        let b = app.layout.export_button;
        left_click(&mut app, b.x, b.y);
        assert!(app.export_requested);

        let dir = tempfile::tempdir().unwrap();
        let before = app.grid.clone();
        app.export_with(&mut DirectorySink::new(dir.path()));
        assert_eq!(app.grid, before);
        assert!(app.manager.cooldown().last_placed().is_none());
        assert!(dir.path().join(EXPORT_FILE_NAME).exists());
        assert!(app.status.as_deref().unwrap_or("").starts_with("Exported"));
    }

    #[test]
    fn keys_drive_help_and_quit() {
        let time = Rc::new(Cell::new(T0));
        let mut app = app_with(SharedStore::default(), &time);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Running);
        press(&mut app, KeyCode::Char('x'));
        assert!(app.export_requested);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn initial_selection_comes_from_config() {
        let mut config = AppConfig::default();
        config.ui.initial_color = 12;
        let time = Rc::new(Cell::new(T0));
        let app = App::new(
            Arc::new(ArcSwap::from_pointee(config)),
            Box::new(SharedStore::default()),
            Box::new(TestClock(time)),
        );
        assert_eq!(app.selection.get(), 12);
    }
}
