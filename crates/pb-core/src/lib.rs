/// Types, state rules, and configuration for pixelbanner.
///
/// This crate owns the banner grid, the fixed palette, the cooldown clock and
/// the placement rules, plus the narrow traits through which the rest of the
/// workspace reaches drawing surfaces and local storage.

pub mod canvas;
pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod grid;
pub mod palette;
pub mod store;
pub mod traits;

pub use canvas::{CanvasManager, PIXEL_SIZE, Placement};
pub use clock::{COOLDOWN_MS, Millis};
pub use config::AppConfig;
pub use error::{CoreError, CooldownError};
pub use frame::FrameBuffer;
pub use grid::{GRID_HEIGHT, GRID_WIDTH, Grid};
pub use palette::{ColorIndex, Palette, Rgb};
