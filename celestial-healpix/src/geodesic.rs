//! Distances on the sphere and on the ellipsoid.
//!
//! - [`angular_separation`]: great-circle angle, stable at all separations
//! - [`inverse_distance`]: Vincenty's iterative inverse solution on an
//!   [`Ellipsoid`], with a rectifying-sphere fallback for the nearly
//!   antipodal pairs where the iteration does not converge

use crate::constants::PI;
use crate::ellipsoid::Ellipsoid;

const MAX_ITERATIONS: usize = 200;
const TOLERANCE: f64 = 1e-12;

/// Angle between two directions given by the sines and cosines of their
/// latitudes and their longitude difference.
///
/// Uses the atan2 form, accurate for coincident and antipodal points alike.
pub fn vincenty_angular_separation(
    sin_lat1: f64,
    cos_lat1: f64,
    sin_lat2: f64,
    cos_lat2: f64,
    delta_lon: f64,
) -> f64 {
    let (sin_delta_lon, cos_delta_lon) = libm::sincos(delta_lon);

    let num = libm::sqrt(
        (cos_lat2 * sin_delta_lon).powi(2)
            + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_delta_lon).powi(2),
    );
    let den = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_delta_lon;

    libm::atan2(num, den)
}

/// Great-circle angle in radians between two `(lon, lat)` points in radians.
pub fn angular_separation(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (s1, c1) = libm::sincos(lat1);
    let (s2, c2) = libm::sincos(lat2);
    vincenty_angular_separation(s1, c1, s2, c2, lon2 - lon1)
}

/// Length of the geodesic between two geographic points (radians) on
/// `ellipsoid`, in the unit of its semi-major axis.
pub fn inverse_distance(ellipsoid: &Ellipsoid, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let f = ellipsoid.f();
    if f == 0.0 {
        return ellipsoid.a() * angular_separation(lon1, lat1, lon2, lat2);
    }

    let (sin_u1, cos_u1) = reduced_latitude(lat1, f);
    let (sin_u2, cos_u2) = reduced_latitude(lat2, f);
    let l = wrap_pi(lon2 - lon1);

    let mut lambda = l;
    let mut converged = false;
    let (mut sin_sigma, mut cos_sigma, mut sigma) = (0.0, 1.0, 0.0);
    let (mut cos_sq_alpha, mut cos_2sigma_m) = (1.0, 0.0);

    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = libm::sincos(lambda);
        sin_sigma = libm::sqrt(
            (cos_u2 * sin_lambda).powi(2) + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2),
        );
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;

        if sin_sigma < 1e-15 {
            if cos_sigma > 0.0 {
                return 0.0;
            }
            break;
        }
        sigma = libm::atan2(sin_sigma, cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        cos_2sigma_m = if cos_sq_alpha.abs() < 1e-15 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if lambda.abs() > PI {
            break;
        }
        if (lambda - previous).abs() < TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        let angle = angular_separation(lon1, lat1, lon2, lat2);
        tracing::debug!(
            angle,
            a = ellipsoid.a(),
            f = ellipsoid.f(),
            "geodesic iteration did not converge, using rectifying sphere"
        );
        return ellipsoid.rectifying_radius() * angle;
    }

    let b = ellipsoid.b();
    let a = ellipsoid.a();
    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let cos2 = cos_2sigma_m * cos_2sigma_m;
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos2)
                    - big_b / 6.0 * cos_2sigma_m * (-3.0 + 4.0 * sin_sigma * sin_sigma) * (-3.0 + 4.0 * cos2)));

    b * big_a * (sigma - delta_sigma)
}

/// Sine and cosine of the reduced latitude, `tan β = (1 - f) tan φ`,
/// formed without the tangent so the poles stay finite.
fn reduced_latitude(lat: f64, f: f64) -> (f64, f64) {
    let (s, c) = libm::sincos(lat);
    let t = (1.0 - f) * s;
    let norm = libm::hypot(t, c);
    (t / norm, c / norm)
}

fn wrap_pi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped < -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}
