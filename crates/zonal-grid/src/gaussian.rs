//! Gaussian latitudes: the roots of the Legendre polynomial of degree `2N`.

use zonal_core::GridError;

const NEWTON_TOLERANCE: f64 = 1e-14;
const NEWTON_MAX_ITER: usize = 100;

/// Evaluate `P_n(x)` and its derivative by the three-term recurrence.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p = x;
    for k in 2..=n {
        let kf = k as f64;
        let p_next = ((2.0 * kf - 1.0) * x * p - (kf - 1.0) * p_prev) / kf;
        p_prev = p;
        p = p_next;
    }
    let dp = n as f64 * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}

/// Northern-hemisphere gaussian latitudes for a grid of `N` latitudes per
/// hemisphere, in degrees, ordered from the pole towards the equator.
///
/// The southern hemisphere is the mirror image and is not returned.
pub fn gaussian_latitudes(n: usize) -> Result<Vec<f64>, GridError> {
    if n == 0 {
        return Err(GridError::InvalidParameter {
            name: "N",
            reason: "gaussian grids need at least one latitude per hemisphere".into(),
        });
    }
    let degree = 2 * n;
    let mut lats = Vec::with_capacity(n);
    for i in 0..n {
        // Tricomi's initial guess for the i-th root.
        let mut z = (std::f64::consts::PI * (i as f64 + 0.75) / (degree as f64 + 0.5)).cos();
        for _ in 0..NEWTON_MAX_ITER {
            let (p, dp) = legendre(degree, z);
            let dz = p / dp;
            z -= dz;
            if dz.abs() < NEWTON_TOLERANCE {
                break;
            }
        }
        lats.push(z.asin().to_degrees());
    }
    Ok(lats)
}
