use crate::complex::C;

use super::TRESHOLD;

/// One-pixel escape-time loop.
///
/// Uses the same operation order as the lane kernel, so both produce identical counts for
/// identical inputs.
pub fn escape_time(c: C<f32>, max_iters: u32) -> u32 {
    let mut z = C::new(0.0, 0.0);
    let mut count = 0;
    while count < max_iters {
        z = z * z + c;
        if z.norm_sqr() < TRESHOLD {
            count += 1;
        } else {
            break;
        }
    }
    count
}
