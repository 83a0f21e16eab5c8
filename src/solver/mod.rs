use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use wide::f32x8;

use crate::lanes::{CLanes, Counter, LANES};

pub mod scalar;

/// Squared escape radius.
pub const TRESHOLD: f32 = 4.0;

lazy_static! {
    static ref TRESHOLD_LANES: f32x8 = f32x8::splat(TRESHOLD);
}

/// Escape-time kernel for `z -> z^2 + c`, starting from `z = 0`.
///
/// The count for a lane is the number of updates after which `|z|^2` was still below
/// [`TRESHOLD`], capped at `max_iters`. A point whose first update already escapes counts 0;
/// a point that never escapes counts exactly `max_iters`.
#[derive(Copy, Clone, Debug)]
pub struct Kernel {
    max_iters: u32,
}

impl Kernel {
    pub fn new(max_iters: u32) -> Self {
        Self { max_iters }
    }

    pub fn max_iters(&self) -> u32 {
        self.max_iters
    }

    pub fn escape_time(&self, c: CLanes) -> [u32; LANES] {
        if self.max_iters == 0 {
            return [0; LANES];
        }
        let limit = Counter::limit(self.max_iters);
        let treshold = *TRESHOLD_LANES;
        let mut z = CLanes::splat(0.0, 0.0);
        let mut count = Counter::new();
        loop {
            z = z.square() + c;
            if !count.increment(limit, z.less_than(treshold)) {
                break;
            }
        }
        count.counts()
    }

    /// Two independent lane groups interleaved in one loop body.
    ///
    /// Same counts as two calls to [`Kernel::escape_time`]; the groups hide each other's
    /// multiply latency. A group that finishes first keeps iterating with every lane masked.
    pub fn escape_time_pair(&self, c1: CLanes, c2: CLanes) -> [u32; 2 * LANES] {
        let mut out = [0; 2 * LANES];
        if self.max_iters == 0 {
            return out;
        }
        let limit = Counter::limit(self.max_iters);
        let treshold = *TRESHOLD_LANES;
        let mut z1 = CLanes::splat(0.0, 0.0);
        let mut z2 = CLanes::splat(0.0, 0.0);
        let mut count1 = Counter::new();
        let mut count2 = Counter::new();
        loop {
            z1 = z1.square() + c1;
            z2 = z2.square() + c2;
            let run1 = count1.increment(limit, z1.less_than(treshold));
            let run2 = count2.increment(limit, z2.less_than(treshold));
            if !(run1 | run2) {
                break;
            }
        }
        out[..LANES].copy_from_slice(&count1.counts());
        out[LANES..].copy_from_slice(&count2.counts());
        out
    }
}

/// How a scanline feeds pixels to the kernel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One pixel at a time through [`scalar::escape_time`].
    Scalar,
    /// [`LANES`] pixels per kernel call.
    Lanes,
    /// `2 * LANES` pixels per kernel call, see [`Kernel::escape_time_pair`].
    #[default]
    PairedLanes,
}

impl Strategy {
    /// Pixels consumed per stride.
    pub fn stride(&self) -> usize {
        match self {
            Self::Scalar | Self::Lanes => LANES,
            Self::PairedLanes => 2 * LANES,
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scalar" => Ok(Self::Scalar),
            "lanes" => Ok(Self::Lanes),
            "paired" => Ok(Self::PairedLanes),
            _ => Err(format!("unknown strategy {:?}, expected scalar|lanes|paired", s)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "scalar",
            Self::Lanes => "lanes",
            Self::PairedLanes => "paired",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::complex::c;

    fn lanes_of(points: [(f32, f32); LANES]) -> CLanes {
        CLanes::from_parts(points.map(|p| p.0), points.map(|p| p.1))
    }

    const POINTS: [(f32, f32); LANES] = [
        (0.0, 0.0),
        (2.0, 2.0),
        (-1.0, 0.0),
        (0.3, 0.5),
        (-0.75, 0.1),
        (1.0, 1.0),
        (-2.0, 0.0),
        (0.25, 0.0),
    ];

    #[test]
    fn test_zero_budget() {
        let k = Kernel::new(0);
        assert_eq!(k.escape_time(lanes_of(POINTS)), [0; LANES]);
        assert_eq!(
            k.escape_time_pair(lanes_of(POINTS), lanes_of(POINTS)),
            [0; 2 * LANES]
        );
    }

    #[test]
    fn test_counts_bounded() {
        for max in [1, 2, 7, 64, 500] {
            let counts = Kernel::new(max).escape_time(lanes_of(POINTS));
            assert!(counts.iter().all(|&n| n <= max), "{:?} > {}", counts, max);
        }
    }

    #[test]
    fn test_budget_one() {
        let counts = Kernel::new(1).escape_time(lanes_of(POINTS));
        assert!(counts.iter().all(|&n| n <= 1));
        assert_eq!(counts[0], 1);
        assert_eq!(counts[1], 0);
    }

    #[test]
    fn test_inside_never_escapes() {
        // main cardioid and period-2 bulb
        let inside = lanes_of([
            (0.0, 0.0),
            (-0.1, 0.1),
            (0.2, 0.0),
            (-0.5, 0.5),
            (-1.0, 0.0),
            (-1.1, 0.1),
            (-0.9, -0.15),
            (0.1, -0.3),
        ]);
        for max in [1, 10, 128, 1000] {
            assert_eq!(Kernel::new(max).escape_time(inside), [max; LANES]);
        }
    }

    #[test]
    fn test_far_points_escape_immediately() {
        let far = lanes_of([
            (2.0, 2.0),
            (-2.0, 2.0),
            (3.0, 0.0),
            (0.0, -2.5),
            (10.0, 10.0),
            (-5.0, 0.0),
            (1.5, 1.5),
            (0.0, 3.0),
        ]);
        for max in [1, 3, 128, 10_000] {
            assert_eq!(Kernel::new(max).escape_time(far), [0; LANES]);
        }
    }

    #[test]
    fn test_known_escape_counts() {
        // c = 1: z = 1, 2 -> only the first update stays below 4
        // c = 0.5: z = 0.5, 0.75, 1.0625, 1.6289, 3.1533 -> |z|^2 >= 4 on the 5th
        let k = Kernel::new(100);
        let counts = k.escape_time(CLanes::from_parts(
            [1.0, 0.5, 1.0, 0.5, 1.0, 0.5, 1.0, 0.5],
            [0.0; LANES],
        ));
        assert_eq!(counts, [1, 4, 1, 4, 1, 4, 1, 4]);
    }

    #[test]
    fn test_pair_matches_single() {
        let k = Kernel::new(256);
        let a = CLanes::progression(-2.0, 0.31, 0.4);
        let b = CLanes::progression(-0.8, 0.05, -0.2);
        let pair = k.escape_time_pair(a, b);
        assert_eq!(pair[..LANES], k.escape_time(a));
        assert_eq!(pair[LANES..], k.escape_time(b));
    }

    #[test]
    fn test_lanes_match_scalar() {
        let k = Kernel::new(300);
        for row in 0..16 {
            let im = -1.2 + row as f32 * 0.15;
            for start in 0..12 {
                let lanes = CLanes::progression(-2.2 + start as f32 * 0.27, 0.033, im);
                let counts = k.escape_time(lanes);
                for (lane, &n) in counts.iter().enumerate() {
                    let p = c(lanes.re()[lane], lanes.im()[lane]);
                    assert_eq!(n, scalar::escape_time(p, 300), "at {}", p);
                }
            }
        }
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("paired".parse::<Strategy>(), Ok(Strategy::PairedLanes));
        assert_eq!("scalar".parse::<Strategy>(), Ok(Strategy::Scalar));
        assert!("avx".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Lanes.to_string(), "lanes");
        assert_eq!(Strategy::default().stride(), 2 * LANES);
    }
}
