use crate::constants::{HALF_PI, QUARTER_PI};

use super::Ellipsoid;

const MAX_ITERATIONS: usize = 20;
const TOLERANCE: f64 = 1e-15;

/// Geographic ↔ authalic latitude conversion for one ellipsoid.
///
/// The authalic latitude `ξ` maps the ellipsoid onto a sphere of equal
/// area: `sin ξ = q(φ) / q(π/2)` with
///
/// ```text
/// q(φ) = (1 - e²) [ sin φ / (1 - e² sin² φ) + atanh(e sin φ) / e ]
/// ```
///
/// Both directions work on `|φ|` and restore the sign at the end. Close to
/// the poles `q_p - q` is evaluated from `cos² φ` rather than by subtraction,
/// which keeps the conversions accurate to a few ulps all the way to ±π/2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthalicLatitude {
    e: f64,
    e2: f64,
    qp: f64,
    series: [f64; 3],
}

impl AuthalicLatitude {
    pub fn new(ellipsoid: &Ellipsoid) -> Self {
        let e2 = ellipsoid.e2();
        let e = libm::sqrt(e2);
        let qp = if e == 0.0 {
            2.0
        } else {
            1.0 + (1.0 - e2) * libm::atanh(e) / e
        };
        let (e4, e6) = (e2 * e2, e2 * e2 * e2);
        let series = [
            e2 / 3.0 + 31.0 * e4 / 180.0 + 517.0 * e6 / 5040.0,
            23.0 * e4 / 360.0 + 251.0 * e6 / 3780.0,
            761.0 * e6 / 45360.0,
        ];
        Self { e, e2, qp, series }
    }

    pub fn is_identity(&self) -> bool {
        self.e == 0.0
    }

    /// Geographic latitude (radians) to authalic latitude (radians).
    pub fn to_authalic(&self, phi: f64) -> f64 {
        if self.is_identity() || phi == 0.0 {
            return phi;
        }
        let abs_phi = libm::fabs(phi).min(HALF_PI);
        let (s, c) = libm::sincos(abs_phi);
        let q = self.q(s);
        let dq = self.qp_minus_q(s, c);
        let xi = libm::atan2(q, libm::sqrt(dq * (self.qp + q)));
        xi.copysign(phi)
    }

    /// Authalic latitude (radians) to geographic latitude (radians).
    ///
    /// Newton iteration on `q(φ) = q_p sin ξ`, seeded with the usual series
    /// in `e²`. Converges to 1e-15 rad in a handful of steps.
    pub fn to_geographic(&self, xi: f64) -> f64 {
        if self.is_identity() || xi == 0.0 {
            return xi;
        }
        let abs_xi = libm::fabs(xi);
        if abs_xi >= HALF_PI {
            return HALF_PI.copysign(xi);
        }

        let (sin_xi, cos_xi) = libm::sincos(abs_xi);
        let near_pole = abs_xi > QUARTER_PI;
        let target = if near_pole {
            // q_p (1 - sin ξ)
            self.qp * cos_xi * cos_xi / (1.0 + sin_xi)
        } else {
            self.qp * sin_xi
        };

        let mut phi = self.seed(abs_xi);
        for _ in 0..MAX_ITERATIONS {
            let (s, c) = libm::sincos(phi);
            let residual = if near_pole {
                target - self.qp_minus_q(s, c)
            } else {
                self.q(s) - target
            };
            let one_minus = 1.0 - self.e2 * s * s;
            let slope = 2.0 * (1.0 - self.e2) * c / (one_minus * one_minus);
            if slope <= 0.0 {
                break;
            }
            let step = residual / slope;
            phi = (phi - step).clamp(0.0, HALF_PI);
            if libm::fabs(step) <= TOLERANCE {
                break;
            }
        }
        phi.copysign(xi)
    }

    fn seed(&self, xi: f64) -> f64 {
        let [c2, c4, c6] = self.series;
        xi + c2 * libm::sin(2.0 * xi) + c4 * libm::sin(4.0 * xi) + c6 * libm::sin(6.0 * xi)
    }

    /// `q(φ)` for `s = sin φ ≥ 0`.
    fn q(&self, s: f64) -> f64 {
        let es = self.e * s;
        (1.0 - self.e2) * (s / (1.0 - es * es) + libm::atanh(es) / self.e)
    }

    /// `q_p - q(φ)` for `s = sin φ ≥ 0`, `c = cos φ`, without cancellation.
    fn qp_minus_q(&self, s: f64, c: f64) -> f64 {
        let one_minus_s = c * c / (1.0 + s);
        let e2s = self.e2 * s;
        let rational = one_minus_s * (1.0 + e2s) / (1.0 - e2s * s);
        let log_term = libm::atanh(self.e * one_minus_s / (1.0 - e2s)) / self.e;
        rational + (1.0 - self.e2) * log_term
    }
}
