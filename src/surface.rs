use std::path::Path;

use image::{Rgb, RgbImage};
use ndarray::Array2;

use crate::error::RenderError;

/// A pixel-addressable 2D grid, row 0 at the top.
///
/// Renderers never lock individual pixels: [`Surface::scanlines_mut`] hands out one disjoint
/// mutable slice per row, and each row goes to exactly one worker.
pub trait Surface {
    type Pixel: Copy + Send;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn set_pixel(&mut self, x: u32, y: u32, pixel: Self::Pixel);

    /// All rows top to bottom, each exactly `width` pixels long.
    fn scanlines_mut(&mut self) -> Vec<&mut [Self::Pixel]>;
}

/// Owned row-major surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<P> {
    width: u32,
    height: u32,
    pixels: Vec<P>,
}

impl<P> Raster<P>
where
    P: Copy + Default,
{
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, P::default())
    }
}

impl<P> Raster<P>
where
    P: Copy,
{
    pub fn filled(width: u32, height: u32, pixel: P) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width as usize * height as usize],
        }
    }

    fn idx(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        y as usize * self.width as usize + x as usize
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> P {
        self.pixels[self.idx(x, y)]
    }

    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }
}

impl<P> Surface for Raster<P>
where
    P: Copy + Send,
{
    type Pixel = P;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: u32, y: u32, pixel: P) {
        let n = self.idx(x, y);
        self.pixels[n] = pixel;
    }

    fn scanlines_mut(&mut self) -> Vec<&mut [P]> {
        if self.width == 0 {
            return vec![];
        }
        self.pixels.chunks_exact_mut(self.width as usize).collect()
    }
}

pub type Canvas = Raster<Rgb<u8>>;

impl Raster<Rgb<u8>> {
    pub fn black(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgb([0, 0, 0]))
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| self.get_pixel(x, y))
    }

    /// Encodes the surface, format chosen from the file extension.
    pub fn save<Q: AsRef<Path>>(&self, path: Q) -> Result<(), RenderError> {
        self.to_image().save(path)?;
        Ok(())
    }
}

pub type CountGrid = Raster<u32>;

impl Raster<u32> {
    /// Counts indexed `[[y, x]]`.
    pub fn to_array(&self) -> Result<Array2<u32>, RenderError> {
        let shape = (self.height as usize, self.width as usize);
        Ok(Array2::from_shape_vec(shape, self.pixels.clone())?)
    }
}
