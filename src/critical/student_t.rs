// Student's t distribution: density, CDF, survival function and quantiles
//
// CDF via the regularized incomplete beta function:
//   P(T > t) = ½ · I_{ν/(ν+t²)}(ν/2, ½)   for t ≥ 0
// with I evaluated by the Lentz continued fraction and ln Γ by the Lanczos
// approximation (g = 7). Quantiles solve P(T > t) = q in the upper tail
// with Newton steps safeguarded by a bisection bracket, so small tail
// probabilities keep their relative precision.
//
// x = ν/(ν+t²) and 1 − x are carried as logarithms of u = t/√ν, so t² is
// never formed. For ν ≥ 1e7 the continued fraction needs too many terms;
// there the tail comes from Hill's normalizing transform and the quantile
// from the Cornish-Fisher expansion around the normal quantile.

use super::normal::{standard_normal_quantile, standard_normal_sf};
use crate::error::{CalcError, Result};
use std::f64::consts::PI;

const CF_MAX_ITERATIONS: usize = 1000;
const CF_EPSILON: f64 = 1e-15;
const FPMIN: f64 = 1e-300;

const ROOT_MAX_ITERATIONS: usize = 200;
const ROOT_TOLERANCE: f64 = 1e-13;
const MAX_BRACKET_DOUBLINGS: usize = 1100;

/// Above this df the incomplete beta route loses digits and converges slowly
const LARGE_DF: f64 = 1e7;
/// ln Γ(a + ½) − ln Γ(a) switches to its asymptotic series from here
const HALF_RATIO_SERIES_MIN: f64 = 50.0;

/// Student's t distribution with ν degrees of freedom
///
/// # Example
/// ```
/// use statcalc::critical::StudentT;
///
/// let t = StudentT::new(12.0).unwrap();
/// let t_crit = t.quantile(0.975).unwrap();
/// assert!((t_crit - 2.178813).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentT {
    df: f64,
    log_norm: f64,
}

impl StudentT {
    /// # Errors
    /// [`CalcError::InvalidParameter`] unless `df` is finite and positive.
    pub fn new(df: f64) -> Result<Self> {
        if !df.is_finite() || df <= 0.0 {
            return Err(CalcError::invalid_parameter(
                "df",
                df,
                "degrees of freedom must be finite and positive",
            ));
        }

        // ln Γ((ν+1)/2) − ln Γ(ν/2) − ½ ln(νπ)
        let log_norm = ln_gamma_half_ratio(df / 2.0) - 0.5 * (df * PI).ln();
        Ok(Self { df, log_norm })
    }

    pub fn df(&self) -> f64 {
        self.df
    }

    /// Probability density at `t`
    pub fn pdf(&self, t: f64) -> f64 {
        let (ln_x, _) = beta_argument_logs(t / self.df.sqrt());
        (self.log_norm + 0.5 * (self.df + 1.0) * ln_x).exp()
    }

    /// P(T ≤ t)
    pub fn cdf(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        if t > 0.0 {
            1.0 - self.sf(t)
        } else {
            self.sf(-t)
        }
    }

    /// P(T > t)
    pub fn sf(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        if t == 0.0 {
            return 0.5;
        }
        let (ln_x, ln_y) = beta_argument_logs(t / self.df.sqrt());
        let half_tail = if self.df >= LARGE_DF {
            standard_normal_sf(self.normal_equivalent(ln_x))
        } else {
            0.5 * incomplete_beta_from_logs(self.df / 2.0, 0.5, ln_x, ln_y)
        };
        if t > 0.0 {
            half_tail
        } else {
            1.0 - half_tail
        }
    }

    /// Hill's normalizing transform of |t| (ACM Algorithm 395), given ln(ν/(ν+t²))
    fn normal_equivalent(&self, ln_x: f64) -> f64 {
        let a = self.df - 0.5;
        let b = 48.0 * a * a;
        let y = -a * ln_x;
        let rational = (((-0.4 * y - 3.3) * y - 24.0) * y - 85.5) / (0.8 * y * y + 100.0 + b);
        ((rational + y + 3.0) / b + 1.0) * y.sqrt()
    }

    /// Inverse CDF: the t with P(T ≤ t) = p, for p strictly within (0, 1)
    pub fn quantile(&self, p: f64) -> Result<f64> {
        check_probability("p", p)?;
        if p > 0.5 {
            self.upper_quantile(1.0 - p)
        } else {
            self.upper_quantile(p).map(|t| -t)
        }
    }

    /// Inverse survival function: the t with P(T > t) = q, for q strictly within (0, 1)
    ///
    /// Prefer this over `quantile(1 − q)` for small tail probabilities, where
    /// forming 1 − q would discard precision.
    pub fn upper_quantile(&self, q: f64) -> Result<f64> {
        check_probability("q", q)?;
        if q == 0.5 {
            return Ok(0.0);
        }
        if q > 0.5 {
            return self.solve_upper_tail(1.0 - q).map(|t| -t);
        }
        self.solve_upper_tail(q)
    }

    /// Root of sf(t) = q on t > 0, for q in (0, 0.5)
    fn solve_upper_tail(&self, q: f64) -> Result<f64> {
        if self.df >= LARGE_DF {
            let z = -standard_normal_quantile(q)?;
            return Ok(cornish_fisher(z, self.df));
        }

        // sf is decreasing: keep sf(lo) > q ≥ sf(hi)
        let mut lo = 0.0_f64;
        let mut hi = 1.0_f64;
        let mut doublings = 0;
        while self.sf(hi) > q {
            lo = hi;
            hi *= 2.0;
            doublings += 1;
            if doublings > MAX_BRACKET_DOUBLINGS || !hi.is_finite() {
                return Err(CalcError::Numerical(format!(
                    "could not bracket the t quantile for tail probability {} (df = {})",
                    q, self.df
                )));
            }
        }

        let mut t = 0.5 * (lo + hi);
        for _ in 0..ROOT_MAX_ITERATIONS {
            let f = self.sf(t) - q;
            if f == 0.0 {
                return Ok(t);
            }
            if f > 0.0 {
                lo = t;
            } else {
                hi = t;
            }

            // d/dt sf(t) = −pdf(t)
            let density = self.pdf(t);
            let newton = t + f / density;
            let next = if density > 0.0 && newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };

            let scale = next.abs().max(1.0);
            if (next - t).abs() <= ROOT_TOLERANCE * scale || (hi - lo) <= ROOT_TOLERANCE * scale {
                return Ok(next);
            }
            t = next;
        }

        Err(CalcError::Numerical(format!(
            "t quantile did not converge after {} iterations (q = {}, df = {})",
            ROOT_MAX_ITERATIONS, q, self.df
        )))
    }
}

/// t quantile from the normal quantile z, to order ν⁻⁴
///
/// Abramowitz & Stegun 26.7.5. The neglected terms are far below f64
/// resolution once z²/ν is small.
fn cornish_fisher(z: f64, df: f64) -> f64 {
    let z2 = z * z;
    let g1 = (z2 + 1.0) * z / 4.0;
    let g2 = ((5.0 * z2 + 16.0) * z2 + 3.0) * z / 96.0;
    let g3 = (((3.0 * z2 + 19.0) * z2 + 17.0) * z2 - 15.0) * z / 384.0;
    let g4 = ((((79.0 * z2 + 776.0) * z2 + 1482.0) * z2 - 1920.0) * z2 - 945.0) * z / 92160.0;
    z + (g1 + (g2 + (g3 + g4 / df) / df) / df) / df
}

/// (ln x, ln(1 − x)) for x = 1 / (1 + u²), without squaring large u
fn beta_argument_logs(u: f64) -> (f64, f64) {
    let u = u.abs();
    if u > 1.0 {
        let inv = 1.0 / u;
        let tail = (inv * inv).ln_1p();
        (-2.0 * u.ln() - tail, -tail)
    } else {
        let head = (u * u).ln_1p();
        (-head, 2.0 * u.ln() - head)
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_parameter(
            name,
            p,
            "probability must lie strictly within (0, 1)",
        ))
    }
}

/// Lanczos approximation of ln Γ(x) for x > 0
#[allow(clippy::excessive_precision)]
fn ln_gamma(x: f64) -> f64 {
    const COEFFICIENTS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];

    if x < 0.5 {
        // reflection formula
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let t = x + 7.5;
    let acc = COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(COEFFICIENTS[0], |acc, (i, &c)| acc + c / (x + i as f64));

    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

/// ln Γ(a + ½) − ln Γ(a) for a > 0
///
/// The direct difference cancels badly for large a, so it is replaced by the
/// asymptotic series ½ ln a − 1/(8a) + 1/(192a³) − 1/(640a⁵).
fn ln_gamma_half_ratio(a: f64) -> f64 {
    if a < HALF_RATIO_SERIES_MIN {
        return ln_gamma(a + 0.5) - ln_gamma(a);
    }
    let inv = 1.0 / a;
    let inv2 = inv * inv;
    0.5 * a.ln() - inv * (0.125 - inv2 * (1.0 / 192.0 - inv2 / 640.0))
}

/// ln B(a, b), routed through the half-ratio series when either argument is ½
fn ln_beta(a: f64, b: f64) -> f64 {
    if b == 0.5 {
        ln_gamma(0.5) - ln_gamma_half_ratio(a)
    } else if a == 0.5 {
        ln_gamma(0.5) - ln_gamma_half_ratio(b)
    } else {
        ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
    }
}

/// Regularized incomplete beta function I_x(a, b), given ln x and ln(1 − x)
///
/// Taking both logarithms keeps x and 1 − x exact when one of them is
/// tiny or underflows.
fn incomplete_beta_from_logs(a: f64, b: f64, ln_x: f64, ln_y: f64) -> f64 {
    let (x, y) = (ln_x.exp(), ln_y.exp());
    let front = (a * ln_x + b * ln_y - ln_beta(a, b)).exp();

    // the continued fraction converges fastest on this side of the mean
    if x < (a + 1.0) / (a + b + 2.0) {
        (front * beta_continued_fraction(a, b, x) / a).clamp(0.0, 1.0)
    } else {
        (1.0 - front * beta_continued_fraction(b, a, y) / b).clamp(0.0, 1.0)
    }
}

/// Modified Lentz evaluation of the incomplete beta continued fraction
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let guard = |v: f64| if v.abs() < FPMIN { FPMIN } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=CF_MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        // even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        // odd step
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < CF_EPSILON {
            return h;
        }
    }

    tracing::debug!(a, b, x, "incomplete beta continued fraction hit the iteration cap");
    h
}
