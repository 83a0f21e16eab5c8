//! Escape-time Mandelbrot renderer.
//!
//! Pixels are packed eight to a SIMD register ([`lanes`]), iterated in lockstep by the
//! [`solver::Kernel`], written a row at a time by the [`render::Renderer`], and rows are spread
//! over worker threads by the [`threads::Dispatcher`].
//!
//! ```no_run
//! use lanebrot::coord::RenderConfig;
//! use lanebrot::painter::Palette;
//! use lanebrot::surface::Canvas;
//!
//! let config = RenderConfig::default();
//! let mut canvas = Canvas::black(config.width, config.height);
//! lanebrot::render(&config, &Palette::new(), &mut canvas).unwrap();
//! canvas.save("render.bmp").unwrap();
//! ```
use ndarray::Array2;

use crate::coord::RenderConfig;
use crate::error::RenderError;
use crate::painter::{ColorScheme, Counts};
use crate::render::Renderer;
use crate::surface::{CountGrid, Surface};
use crate::threads::{Dispatcher, RenderStats};

pub mod bench;
mod complex;
pub mod coord;
pub mod error;
pub mod lanes;
pub mod painter;
pub mod render;
pub mod solver;
pub mod surface;
pub mod threads;

pub use crate::complex::{c, ci, cr, C};

/// Renders `config` onto `surface` with the default kernel and one worker per hardware thread.
pub fn render<S, P>(
    config: &RenderConfig,
    scheme: &P,
    surface: &mut S,
) -> Result<RenderStats, RenderError>
where
    S: Surface,
    P: ColorScheme<Pixel = S::Pixel>,
{
    let renderer = Renderer::new(config.viewport()?);
    Dispatcher::new().render(&renderer, scheme, surface)
}

/// Raw iteration counts of `config`, indexed `[[y, x]]`.
pub fn counts(config: &RenderConfig) -> Result<Array2<u32>, RenderError> {
    let mut grid = CountGrid::new(config.width, config.height);
    render(config, &Counts, &mut grid)?;
    grid.to_array()
}
