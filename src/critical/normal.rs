// Standard normal tail and quantile
//
// The quantile is Wichura's Algorithm AS 241 (PPND16): rational
// approximations on three ranges of p, about 16 significant digits. The
// tail P(Z > z) = ½ Q(½, z²/2) uses the incomplete gamma series below
// z²/2 = 1.5 and its Lentz continued fraction above. Both serve as the
// limit of Student's t for very large df.

use crate::error::{CalcError, Result};
use std::f64::consts::PI;

const GAMMA_MAX_TERMS: usize = 1000;
const GAMMA_EPSILON: f64 = 1e-16;
const FPMIN: f64 = 1e-300;

#[allow(clippy::excessive_precision)]
const CENTRAL_NUM: [f64; 8] = [
    3.3871328727963666080e0,
    1.3314166789178437745e2,
    1.9715909503065514427e3,
    1.3731693765509461125e4,
    4.5921953931549871457e4,
    6.7265770927008700853e4,
    3.3430575583588128105e4,
    2.5090809287301226727e3,
];
#[allow(clippy::excessive_precision)]
const CENTRAL_DEN: [f64; 8] = [
    1.0,
    4.2313330701600911252e1,
    6.8718700749205790830e2,
    5.3941960214247511077e3,
    2.1213794301586595867e4,
    3.9307895800092710610e4,
    2.8729085735721942674e4,
    5.2264952788528545610e3,
];
#[allow(clippy::excessive_precision)]
const NEAR_NUM: [f64; 8] = [
    1.42343711074968357734e0,
    4.63033784615654529590e0,
    5.76949722146069140550e0,
    3.64784832476320460504e0,
    1.27045825245236838258e0,
    2.41780725177450611770e-1,
    2.27238449892691845833e-2,
    7.74545014278341407640e-4,
];
#[allow(clippy::excessive_precision)]
const NEAR_DEN: [f64; 8] = [
    1.0,
    2.05319162663775882187e0,
    1.67638483018380384940e0,
    6.89767334985100004550e-1,
    1.48103976427480074590e-1,
    1.51986665636164571966e-2,
    5.47593808499534494600e-4,
    1.05075007164441684324e-9,
];
#[allow(clippy::excessive_precision)]
const FAR_NUM: [f64; 8] = [
    6.65790464350110377720e0,
    5.46378491116411436990e0,
    1.78482653991729133580e0,
    2.96560571828504891230e-1,
    2.65321895265761230930e-2,
    1.24266094738807843860e-3,
    2.71155556874348757815e-5,
    2.01033439929228813265e-7,
];
#[allow(clippy::excessive_precision)]
const FAR_DEN: [f64; 8] = [
    1.0,
    5.99832206555887937690e-1,
    1.36929880922735805310e-1,
    1.48753612908506148525e-2,
    7.86869131145613259100e-4,
    1.84631831751005468180e-5,
    1.42151175831644588870e-7,
    2.04426310338993978564e-15,
];

fn polynomial(coefficients: &[f64; 8], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// z with Φ(z) = p, for p strictly within (0, 1)
///
/// # Errors
/// [`CalcError::InvalidParameter`] when `p` is outside (0, 1).
pub fn standard_normal_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(CalcError::invalid_parameter(
            "p",
            p,
            "probability must lie strictly within (0, 1)",
        ));
    }

    let q = p - 0.5;
    if q.abs() <= 0.425 {
        let r = 0.180625 - q * q;
        return Ok(q * polynomial(&CENTRAL_NUM, r) / polynomial(&CENTRAL_DEN, r));
    }

    // tail nearest to p, without forming 1 − p when p is small
    let tail = if q < 0.0 { p } else { 1.0 - p };
    let r = (-tail.ln()).sqrt();
    let magnitude = if r <= 5.0 {
        let r = r - 1.6;
        polynomial(&NEAR_NUM, r) / polynomial(&NEAR_DEN, r)
    } else {
        let r = r - 5.0;
        polynomial(&FAR_NUM, r) / polynomial(&FAR_DEN, r)
    };

    Ok(if q < 0.0 { -magnitude } else { magnitude })
}

/// P(Z > z) for a standard normal Z, accurate in relative terms far into the tail
pub fn standard_normal_sf(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    if z < 0.0 {
        return 1.0 - standard_normal_sf(-z);
    }
    if z == 0.0 {
        return 0.5;
    }

    let w = 0.5 * z * z;
    if !w.is_finite() {
        return 0.0;
    }
    // e^{−w} w^{½} / Γ(½)
    let front = (-w + 0.5 * w.ln() - 0.5 * PI.ln()).exp();
    if w < 1.5 {
        0.5 * (1.0 - front * lower_gamma_series(w))
    } else {
        0.5 * front * upper_gamma_fraction(w)
    }
}

/// Series part of P(½, w)
fn lower_gamma_series(w: f64) -> f64 {
    let mut ap = 0.5;
    let mut term = 1.0 / ap;
    let mut sum = term;
    for _ in 0..GAMMA_MAX_TERMS {
        ap += 1.0;
        term *= w / ap;
        sum += term;
        if term.abs() < sum.abs() * GAMMA_EPSILON {
            break;
        }
    }
    sum
}

/// Continued fraction part of Q(½, w), modified Lentz
fn upper_gamma_fraction(w: f64) -> f64 {
    let guard = |v: f64| if v.abs() < FPMIN { FPMIN } else { v };

    let mut b = w + 0.5;
    let mut c = 1.0 / FPMIN;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=GAMMA_MAX_TERMS {
        let i = i as f64;
        let an = -i * (i - 0.5);
        b += 2.0;
        d = 1.0 / guard(an * d + b);
        c = guard(b + an / c);
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < GAMMA_EPSILON {
            break;
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_points() {
        let cases = [
            (0.5, 0.0),
            (0.975, 1.959_963_984_540_054),
            (0.95, 1.644_853_626_951_472_7),
            (0.995, 2.575_829_303_548_901),
            (0.8, 0.841_621_233_572_914_2),
        ];
        for (p, z) in cases {
            let actual = standard_normal_quantile(p).unwrap();
            assert!((actual - z).abs() < 1e-14, "p = {}: {}", p, actual);
        }
    }

    #[test]
    fn test_symmetry() {
        for p in [1e-9, 0.001, 0.1, 0.3] {
            let lower = standard_normal_quantile(p).unwrap();
            let upper = standard_normal_quantile(1.0 - p).unwrap();
            assert!(lower < 0.0);
            assert!((lower + upper).abs() < 1e-6 * lower.abs());
        }
    }

    #[test]
    fn test_far_tail() {
        let a = standard_normal_quantile(1e-300).unwrap();
        let b = standard_normal_quantile(1e-100).unwrap();
        assert!((a + 37.047_096_299_361_2).abs() < 1e-9, "{}", a);
        assert!((b + 21.273_453_560_965_32).abs() < 1e-9, "{}", b);
    }

    #[test]
    fn test_sf_reference_values() {
        assert_eq!(standard_normal_sf(0.0), 0.5);
        assert!((standard_normal_sf(-1.0) - 0.841_344_746_068_542_9).abs() < 1e-15);
        let cases = [
            (1.959_963_984_540_054, 0.025),
            (3.0, 0.001_349_898_031_630_094_5),
            (37.047_096_299_361_2, 1e-300),
        ];
        for (z, q) in cases {
            let actual = standard_normal_sf(z);
            assert!(((actual - q) / q).abs() < 1e-12, "z = {}: {}", z, actual);
        }
        assert_eq!(standard_normal_sf(f64::INFINITY), 0.0);
        assert_eq!(standard_normal_sf(f64::NEG_INFINITY), 1.0);
    }

    #[test]
    fn test_sf_inverts_quantile() {
        for p in [1e-200, 1e-10, 0.01, 0.2, 0.45] {
            let z = -standard_normal_quantile(p).unwrap();
            assert!(((standard_normal_sf(z) - p) / p).abs() < 1e-11, "p = {}", p);
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        for p in [0.0, 1.0, -0.2, 2.0, f64::NAN] {
            assert!(standard_normal_quantile(p).is_err());
        }
    }
}
