//! Lane-packed complex numbers and iteration counters.
//!
//! A [`CLanes`] holds [`LANES`] independent complex numbers, real and imaginary parts in two
//! `f32x8` registers. A [`Counter`] holds one iteration counter per lane and only advances the
//! lanes a [`Mask`] marks as still active, so lanes can finish at different iterations while the
//! whole register keeps executing in lockstep.
use std::ops::{Add, Mul};

use bytemuck::cast;
use lazy_static::lazy_static;
use wide::{f32x8, i32x8, CmpEq, CmpLt};

/// Number of lanes in one packed value.
pub const LANES: usize = 8;

lazy_static! {
    static ref LANE_STEPS: f32x8 = f32x8::new([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
}

#[derive(Copy, Clone, Debug)]
pub struct CLanes {
    pub(crate) re: f32x8,
    pub(crate) im: f32x8,
}

impl CLanes {
    pub fn splat(re: f32, im: f32) -> Self {
        Self {
            re: f32x8::splat(re),
            im: f32x8::splat(im),
        }
    }

    /// Lane `k` holds `re0 + k * step + im * i`. Seeds one stride of a scanline.
    pub fn progression(re0: f32, step: f32, im: f32) -> Self {
        Self {
            re: f32x8::splat(re0) + *LANE_STEPS * f32x8::splat(step),
            im: f32x8::splat(im),
        }
    }

    pub fn from_parts(re: [f32; LANES], im: [f32; LANES]) -> Self {
        Self {
            re: f32x8::new(re),
            im: f32x8::new(im),
        }
    }

    pub fn re(&self) -> [f32; LANES] {
        self.re.to_array()
    }

    pub fn im(&self) -> [f32; LANES] {
        self.im.to_array()
    }

    /// `z * z`, with one multiply fewer than the general product.
    #[inline]
    pub fn square(self) -> Self {
        let xx = self.re * self.re;
        let yy = self.im * self.im;
        let xy = self.re * self.im;
        Self {
            re: xx - yy,
            im: xy + xy,
        }
    }

    #[inline]
    pub fn norm_sqr(&self) -> f32x8 {
        self.re * self.re + self.im * self.im
    }

    /// Lanes whose squared magnitude is strictly below `limit`.
    #[inline]
    pub fn less_than(&self, limit: f32x8) -> Mask {
        Mask(cast(self.norm_sqr().cmp_lt(limit)))
    }
}

impl Add for CLanes {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Mul for CLanes {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

/// Per-lane boolean, all bits set for true.
#[derive(Copy, Clone, Debug)]
pub struct Mask(i32x8);

impl Mask {
    pub fn any(&self) -> bool {
        cast::<i32x8, f32x8>(self.0).move_mask() != 0
    }

    pub fn to_array(&self) -> [bool; LANES] {
        cast::<i32x8, [i32; LANES]>(self.0).map(|v| v != 0)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Counter {
    count: i32x8,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            count: i32x8::splat(0),
        }
    }

    /// Broadcasts an iteration budget for [`Counter::increment`].
    ///
    /// Budgets above `i32::MAX` are rejected when the viewport is built.
    pub fn limit(max_iters: u32) -> i32x8 {
        i32x8::splat(max_iters as i32)
    }

    /// Advances every lane that is active and below `limit`.
    ///
    /// Returns true if at least one lane advanced, i.e. still needs another iteration.
    #[inline]
    pub fn increment(&mut self, limit: i32x8, active: Mask) -> bool {
        let done = self.count.cmp_eq(limit);
        // active lanes are -1, so subtracting adds one
        let step = !done & active.0;
        self.count = self.count - step;
        Mask(step).any()
    }

    pub fn counts(&self) -> [u32; LANES] {
        cast::<i32x8, [i32; LANES]>(self.count).map(|v| v as u32)
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}
