use thiserror::Error;

/// Rejected render configuration. Raised once, before any pixel is computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("image must be at least 1x1, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    #[error("iteration budget must be in 1..={max}, got {got}")]
    IterationBudget { got: u32, max: u32 },
    #[error("{axis} axis is empty or inverted: [{min}, {max}]")]
    InvertedAxis { axis: char, min: f32, max: f32 },
    #[error("{axis} axis bounds are not finite: [{min}, {max}]")]
    NonFinite { axis: char, min: f32, max: f32 },
    #[error("surface is {got_width}x{got_height}, viewport expects {width}x{height}")]
    SurfaceSize {
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("render cancelled after {rendered} of {total} rows")]
    Cancelled { rendered: usize, total: usize },
    #[error("a render worker panicked")]
    WorkerPanicked,
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("count grid has the wrong shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
