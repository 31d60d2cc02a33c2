// Critical values of Pearson's r from the Student's t distribution
//
// Given a significance level, a sample size and a tail mode, derive the
// critical t statistic (df = n − 2) and the matching critical correlation
// r = t / sqrt(t² + df). The t quantile is computed in-crate from the
// regularized incomplete beta function, or from the normal limit when df
// is very large.

mod engine;
mod normal;
mod student_t;

pub use engine::{
    critical_values, r_from_t, t_from_r, CriticalValueInput, CriticalValueResult,
    RejectionRegion, TailMode,
};
pub use normal::{standard_normal_quantile, standard_normal_sf};
pub use student_t::StudentT;

#[cfg(test)]
mod tests;
