use crate::complex::c;
use crate::coord::Viewport;
use crate::lanes::{CLanes, LANES};
use crate::painter::{ColorScheme, Counts};
use crate::solver::{scalar, Kernel, Strategy};

/// Fills single rows of a viewport.
///
/// A row is walked left to right in strides of [`Strategy::stride`] pixels. Every stride is
/// seeded from the real coordinate of its first pixel, so the result of a row does not depend
/// on which strides were computed before it. When the width is not a multiple of the stride,
/// the last stride is clamped: lanes past the right edge are computed and thrown away.
#[derive(Copy, Clone, Debug)]
pub struct Renderer {
    viewport: Viewport,
    kernel: Kernel,
    strategy: Strategy,
}

impl Renderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            kernel: Kernel::new(viewport.max_iters()),
            strategy: Strategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Colors every pixel of row `y` into `row`.
    ///
    /// `row` is expected to be exactly one surface row; pixels past the viewport width are
    /// left untouched.
    pub fn render_line<S>(&self, y: u32, scheme: &S, row: &mut [S::Pixel])
    where
        S: ColorScheme + ?Sized,
    {
        debug_assert_eq!(row.len(), self.viewport.width() as usize);
        let width = row.len().min(self.viewport.width() as usize);
        let im = self.viewport.im_at(y);
        let stride = self.strategy.stride();
        let mut counts = [0u32; 2 * LANES];

        for (n, pixels) in row[..width].chunks_mut(stride).enumerate() {
            self.stride_counts((n * stride) as u32, im, &mut counts);
            for (pixel, &count) in pixels.iter_mut().zip(counts.iter()) {
                *pixel = scheme.color(count);
            }
        }
    }

    /// Raw iteration counts of row `y`.
    pub fn render_line_counts(&self, y: u32) -> Vec<u32> {
        let mut row = vec![0; self.viewport.width() as usize];
        self.render_line(y, &Counts, &mut row);
        row
    }

    fn stride_counts(&self, start: u32, im: f32, out: &mut [u32; 2 * LANES]) {
        let xres = self.viewport.xres();
        let re0 = self.viewport.re_at(start);
        match self.strategy {
            Strategy::Scalar => {
                let max_iters = self.kernel.max_iters();
                for (k, count) in out[..LANES].iter_mut().enumerate() {
                    let re = re0 + k as f32 * xres;
                    *count = scalar::escape_time(c(re, im), max_iters);
                }
            }
            Strategy::Lanes => {
                let lanes = CLanes::progression(re0, xres, im);
                out[..LANES].copy_from_slice(&self.kernel.escape_time(lanes));
            }
            Strategy::PairedLanes => {
                let c1 = CLanes::progression(re0, xres, im);
                let c2 = CLanes::progression(self.viewport.re_at(start + LANES as u32), xres, im);
                *out = self.kernel.escape_time_pair(c1, c2);
            }
        }
    }
}
