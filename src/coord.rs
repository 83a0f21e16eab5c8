use num::{traits::NumOps, Float, Num, One};

use crate::complex::{c, C};
use crate::error::ConfigError;

trait Two {
    fn two() -> Self;
}

impl<T> Two for T
where
    T: One + NumOps,
{
    fn two() -> Self {
        T::one() + T::one()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Axis<T> {
    pub min: T,
    pub max: T,
}

impl<T> Axis<T>
where
    T: Num + Copy,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> T {
        self.max - self.min
    }

    pub fn center(&self) -> T {
        (self.max + self.min) / T::two()
    }
}

/// Rectangle of the complex plane, `x` along the real axis and `y` along the imaginary one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame<T> {
    pub x: Axis<T>,
    pub y: Axis<T>,
}

impl<T> Frame<T>
where
    T: Num + Copy,
{
    pub fn new(x: Axis<T>, y: Axis<T>) -> Self {
        Self { x, y }
    }

    pub fn from_nums(x1: T, x2: T, y1: T, y2: T) -> Self {
        Self::new(Axis::new(x1, x2), Axis::new(y1, y2))
    }

    pub fn from_box(center_x: T, center_y: T, width: T, height: T) -> Self {
        let x1 = center_x - (width / T::two());
        let x2 = center_x + (width / T::two());
        let y1 = center_y - (height / T::two());
        let y2 = center_y + (height / T::two());
        Self::from_nums(x1, x2, y1, y2)
    }

    pub fn aspect_ratio(&self) -> T {
        self.x.length() / self.y.length()
    }

    pub fn pan(&mut self, x: T, y: T) {
        self.x.min = self.x.min + x;
        self.x.max = self.x.max + x;
        self.y.min = self.y.min + y;
        self.y.max = self.y.max + y;
    }
}

impl<T> Frame<T>
where
    T: Float,
{
    pub fn pan_relative(&mut self, xfrac: T, yfrac: T) {
        self.pan(xfrac * self.x.length(), yfrac * self.y.length());
    }

    pub fn zoom(&mut self, factor: T) {
        let xc = self.x.center();
        let yc = self.y.center();
        self.x.min = xc + (self.x.min - xc) * factor;
        self.x.max = xc + (self.x.max - xc) * factor;
        self.y.min = yc + (self.y.min - yc) * factor;
        self.y.max = yc + (self.y.max - yc) * factor;
    }
}

impl Default for Frame<f32> {
    fn default() -> Self {
        Self::from_nums(-2.5, 1.0, -1.0, 1.0)
    }
}

/// Everything a render pass needs before it is validated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub frame: Frame<f32>,
    pub width: u32,
    pub height: u32,
    pub max_iters: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame: Frame::default(),
            width: 640,
            height: 480,
            max_iters: 128,
        }
    }
}

impl RenderConfig {
    pub fn new(frame: Frame<f32>, width: u32, height: u32, max_iters: u32) -> Self {
        Self {
            frame,
            width,
            height,
            max_iters,
        }
    }

    pub fn viewport(&self) -> Result<Viewport, ConfigError> {
        Viewport::new(self.frame, self.width, self.height, self.max_iters)
    }
}

fn check_axis(name: char, axis: &Axis<f32>) -> Result<(), ConfigError> {
    if !axis.min.is_finite() || !axis.max.is_finite() {
        return Err(ConfigError::NonFinite {
            axis: name,
            min: axis.min,
            max: axis.max,
        });
    }
    if axis.max <= axis.min {
        return Err(ConfigError::InvertedAxis {
            axis: name,
            min: axis.min,
            max: axis.max,
        });
    }
    Ok(())
}

/// A validated mapping from a `width x height` pixel grid onto a frame.
///
/// Pixel `(px, py)` sits at `xl + px * xres` on the real axis and `yh - py * yres` on the
/// imaginary one, so row 0 is the top of the image. Immutable for the whole render pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    frame: Frame<f32>,
    width: u32,
    height: u32,
    max_iters: u32,
    xres: f32,
    yres: f32,
}

impl Viewport {
    pub fn new(
        frame: Frame<f32>,
        width: u32,
        height: u32,
        max_iters: u32,
    ) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyImage { width, height });
        }
        let budget = i32::MAX as u32;
        if max_iters == 0 || max_iters > budget {
            return Err(ConfigError::IterationBudget {
                got: max_iters,
                max: budget,
            });
        }
        check_axis('x', &frame.x)?;
        check_axis('y', &frame.y)?;

        Ok(Self {
            frame,
            width,
            height,
            max_iters,
            xres: frame.x.length() / width as f32,
            yres: frame.y.length() / height as f32,
        })
    }

    pub fn frame(&self) -> &Frame<f32> {
        &self.frame
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_iters(&self) -> u32 {
        self.max_iters
    }

    pub fn xres(&self) -> f32 {
        self.xres
    }

    pub fn yres(&self) -> f32 {
        self.yres
    }

    pub fn re_at(&self, px: u32) -> f32 {
        self.frame.x.min + px as f32 * self.xres
    }

    pub fn im_at(&self, py: u32) -> f32 {
        self.frame.y.max - py as f32 * self.yres
    }

    pub fn point_at(&self, px: u32, py: u32) -> C<f32> {
        c(self.re_at(px), self.im_at(py))
    }

    /// Nearest pixel to a point of the plane, `None` if it falls off the grid.
    pub fn pixel_of(&self, re: f32, im: f32) -> Option<(u32, u32)> {
        let px = ((re - self.frame.x.min) / self.xres).round();
        let py = ((self.frame.y.max - im) / self.yres).round();
        if px < 0.0 || py < 0.0 || px >= self.width as f32 || py >= self.height as f32 {
            return None;
        }
        Some((px as u32, py as u32))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let v = RenderConfig::default().viewport().unwrap();
        assert_eq!(v.width(), 640);
        assert_eq!(v.height(), 480);
        assert_eq!(v.max_iters(), 128);
        assert_eq!(v.re_at(0), -2.5);
        assert_eq!(v.im_at(0), 1.0);
        assert!((v.xres() - 3.5 / 640.0).abs() < 1e-7);
        assert!((v.yres() - 2.0 / 480.0).abs() < 1e-7);
    }

    #[test]
    fn test_rows_run_top_down() {
        let v = RenderConfig::default().viewport().unwrap();
        assert!(v.im_at(0) > v.im_at(1));
        assert!(v.im_at(479) > -1.0);
        assert!(v.point_at(0, 240).im.abs() < 1e-6);
    }

    #[test]
    fn test_pixel_of() {
        let v = RenderConfig::default().viewport().unwrap();
        assert_eq!(v.pixel_of(0.0, 0.0), Some((457, 240)));
        assert_eq!(v.pixel_of(-2.5, 1.0), Some((0, 0)));
        assert_eq!(v.pixel_of(2.0, 2.0), None);
        assert_eq!(v.pixel_of(-3.0, 0.0), None);
    }

    #[test]
    fn test_rejects_degenerate_configs() {
        let ok = RenderConfig::default();

        let zero_w = RenderConfig { width: 0, ..ok };
        assert_eq!(
            zero_w.viewport(),
            Err(ConfigError::EmptyImage {
                width: 0,
                height: 480
            })
        );

        let zero_iters = RenderConfig { max_iters: 0, ..ok };
        assert!(matches!(
            zero_iters.viewport(),
            Err(ConfigError::IterationBudget { got: 0, .. })
        ));

        let huge_iters = RenderConfig {
            max_iters: u32::MAX,
            ..ok
        };
        assert!(huge_iters.viewport().is_err());

        let inverted = RenderConfig {
            frame: Frame::from_nums(1.0, -2.5, -1.0, 1.0),
            ..ok
        };
        assert!(matches!(
            inverted.viewport(),
            Err(ConfigError::InvertedAxis { axis: 'x', .. })
        ));

        let flat = RenderConfig {
            frame: Frame::from_nums(-2.5, 1.0, 1.0, 1.0),
            ..ok
        };
        assert!(matches!(
            flat.viewport(),
            Err(ConfigError::InvertedAxis { axis: 'y', .. })
        ));

        let nan = RenderConfig {
            frame: Frame::from_nums(f32::NAN, 1.0, -1.0, 1.0),
            ..ok
        };
        assert!(matches!(
            nan.viewport(),
            Err(ConfigError::NonFinite { axis: 'x', .. })
        ));
    }

    #[test]
    fn test_frame_zoom_and_pan() {
        let mut f = Frame::from_box(0.0f32, 0.0, 4.0, 2.0);
        assert_eq!(f.aspect_ratio(), 2.0);
        f.zoom(0.5);
        assert_eq!(f, Frame::from_nums(-1.0, 1.0, -0.5, 0.5));
        f.pan_relative(0.5, 0.0);
        assert_eq!(f, Frame::from_nums(0.0, 2.0, -0.5, 0.5));
    }
}
