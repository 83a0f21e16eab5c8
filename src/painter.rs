use image::Rgb;

/// Maps an iteration count to whatever a surface stores per pixel.
///
/// Must be total: any count from 0 up to and including the iteration budget is valid input.
/// Shared read-only between render workers.
pub trait ColorScheme: Sync {
    type Pixel: Copy + Send;

    fn color(&self, count: u32) -> Self::Pixel;
}

const PALETTE: [[u8; 3]; 16] = [
    [66, 30, 15],
    [25, 7, 26],
    [9, 1, 47],
    [4, 4, 73],
    [0, 7, 100],
    [12, 44, 138],
    [24, 82, 177],
    [57, 125, 209],
    [134, 181, 229],
    [211, 236, 248],
    [241, 233, 191],
    [248, 201, 95],
    [255, 170, 0],
    [204, 128, 0],
    [153, 87, 0],
    [106, 52, 3],
];

/// 16 color cyclic palette, wraps the count modulo its size.
#[derive(Copy, Clone, Debug)]
pub struct Palette {
    mapping: [Rgb<u8>; 16],
}

impl Palette {
    pub fn new() -> Self {
        Self {
            mapping: PALETTE.map(Rgb),
        }
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorScheme for Palette {
    type Pixel = Rgb<u8>;

    fn color(&self, count: u32) -> Rgb<u8> {
        self.mapping[count as usize % self.mapping.len()]
    }
}

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

pub struct Greyscale {
    max_iters: f64,
}

impl Greyscale {
    pub fn new(max_iters: u32) -> Self {
        Self {
            max_iters: max_iters as f64,
        }
    }
}

impl ColorScheme for Greyscale {
    type Pixel = Rgb<u8>;

    fn color(&self, count: u32) -> Rgb<u8> {
        let frac = (count as f64 / self.max_iters).clamp(0.0, 1.0);
        if frac >= 1.0 {
            return BLACK;
        }
        let v: u8 = 255 - (frac * 255.0).round() as u8;
        Rgb([v, v, v])
    }
}

pub struct Rainbow {
    max_iters: f64,
}

impl Rainbow {
    pub fn new(max_iters: u32) -> Self {
        Self {
            max_iters: max_iters as f64,
        }
    }
}

fn rainbow_color(n: usize) -> [u8; 3] {
    match n {
        0 => [0xbe, 0x0a, 0xff],
        1 => [0x58, 0x0a, 0xff],
        2 => [0x14, 0x7d, 0xf5],
        3 => [0x0a, 0xef, 0xff],
        4 => [0x0a, 0xff, 0x99],
        5 => [0xa1, 0xff, 0x0a],
        6 => [0xde, 0xff, 0x0a],
        7 => [0xff, 0xd3, 0x00],
        8 => [0xff, 0x87, 0x00],
        _ => [0xff, 0x00, 0x00],
    }
}

fn mix(a: u8, b: u8, frac: f64) -> u8 {
    let m = a as f64 * (1.0 - frac) + b as f64 * frac;
    m.round() as u8
}

impl ColorScheme for Rainbow {
    type Pixel = Rgb<u8>;

    fn color(&self, count: u32) -> Rgb<u8> {
        let pos = 9.0 * (count as f64 / self.max_iters).clamp(0.0, 1.0);
        if pos >= 9.0 {
            return BLACK;
        }
        let n = pos.floor() as usize;
        let frac = pos - n as f64;
        let rgb1 = rainbow_color(n);
        let rgb2 = rainbow_color(n + 1);
        Rgb([
            mix(rgb1[0], rgb2[0], frac),
            mix(rgb1[1], rgb2[1], frac),
            mix(rgb1[2], rgb2[2], frac),
        ])
    }
}

/// Keeps the raw iteration count.
#[derive(Copy, Clone, Debug, Default)]
pub struct Counts;

impl ColorScheme for Counts {
    type Pixel = u32;

    fn color(&self, count: u32) -> u32 {
        count
    }
}
