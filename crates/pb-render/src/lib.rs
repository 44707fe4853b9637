/// Terminal rendering for pixelbanner.
///
/// Provides the grid renderer, the on-screen canvas raster, and the layout.
pub mod canvas;
pub mod renderer;
pub mod ui;
