// Scenario tests for the critical-value engine
//
// Values cross-checked against published t tables.

use super::*;
use crate::error::CalcError;

#[test]
fn test_default_two_tailed_n14() {
    let result = critical_values(0.05, 14, TailMode::TwoTailed).unwrap();

    assert_eq!(result.df, 12);
    assert_eq!(format!("{:.3}", result.t_critical), "2.179");
    assert_eq!(format!("{:.3}", result.r_critical), "0.532");
    assert!((result.t_critical - 2.178_812_829_667).abs() < 1e-8);
    assert!((result.r_critical - 0.532_412_805).abs() < 1e-8);
}

#[test]
fn test_one_tailed_n14() {
    let result = critical_values(0.05, 14, TailMode::OneTailed).unwrap();

    assert_eq!(result.df, 12);
    assert_eq!(format!("{:.3}", result.t_critical), "1.782");
    assert_eq!(format!("{:.3}", result.r_critical), "0.458");
}

#[test]
fn test_smallest_valid_sample() {
    let result = critical_values(0.05, 3, TailMode::TwoTailed).unwrap();

    assert_eq!(result.df, 1);
    assert!((result.t_critical - 12.706_204_7).abs() < 1e-6);
    assert!((result.r_critical - 0.996_917_334).abs() < 1e-8);
    assert!(result.r_critical < 1.0);
}

#[test]
fn test_insufficient_sample_size() {
    for n in [0, 1, 2] {
        let err = critical_values(0.05, n, TailMode::TwoTailed).unwrap_err();
        assert_eq!(err, CalcError::InsufficientSampleSize { n });
    }
}

#[test]
fn test_alpha_out_of_range() {
    for alpha in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
        let err = critical_values(alpha, 14, TailMode::TwoTailed).unwrap_err();
        match err {
            CalcError::InvalidParameter { name, .. } => assert_eq!(name, "alpha"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }
}

/// Sample size is checked before alpha
#[test]
fn test_sample_size_checked_first() {
    let err = critical_values(2.0, 2, TailMode::OneTailed).unwrap_err();
    assert_eq!(err, CalcError::InsufficientSampleSize { n: 2 });
}

#[test]
fn test_stricter_alpha_gives_larger_critical_values() {
    let loose = critical_values(0.10, 14, TailMode::TwoTailed).unwrap();
    let default = critical_values(0.05, 14, TailMode::TwoTailed).unwrap();
    let strict = critical_values(0.01, 14, TailMode::TwoTailed).unwrap();

    assert!(strict.t_critical > default.t_critical);
    assert!(default.t_critical > loose.t_critical);
    assert!(strict.r_critical > default.r_critical);
    assert!(default.r_critical > loose.r_critical);
    assert!((strict.t_critical - 3.054_539_6).abs() < 1e-6);
}

/// A two-tailed test at 2α puts α in each tail, same as one-tailed at α
#[test]
fn test_two_tailed_double_alpha_matches_one_tailed() {
    let two = critical_values(0.10, 14, TailMode::TwoTailed).unwrap();
    let one = critical_values(0.05, 14, TailMode::OneTailed).unwrap();

    assert!((two.t_critical - one.t_critical).abs() < 1e-12);
    assert!((two.r_critical - one.r_critical).abs() < 1e-12);
}

#[test]
fn test_larger_samples_lower_the_bar() {
    let mut previous = f64::INFINITY;
    for n in [3, 5, 10, 14, 30, 100, 1000] {
        let result = critical_values(0.05, n, TailMode::TwoTailed).unwrap();
        assert!(result.r_critical < previous, "n={n}");
        previous = result.r_critical;
    }
}

/// t recovered from r matches the critical t
#[test]
fn test_r_critical_maps_back_to_t_critical() {
    let result = critical_values(0.05, 20, TailMode::TwoTailed).unwrap();
    let t = t_from_r(result.r_critical, result.df as f64).unwrap();
    assert!((t - result.t_critical).abs() < 1e-9);
}

#[test]
fn test_input_compute_matches_free_function() {
    let input = CriticalValueInput::new(0.05, 14, TailMode::OneTailed);
    assert_eq!(
        input.compute().unwrap(),
        critical_values(0.05, 14, TailMode::OneTailed).unwrap()
    );
}

#[test]
fn test_rejection_region_mass_matches_distribution() {
    let result = critical_values(0.05, 14, TailMode::TwoTailed).unwrap();
    let dist = StudentT::new(result.df as f64).unwrap();

    let total: f64 = result
        .rejection_regions()
        .iter()
        .map(|region| dist.cdf(region.upper) - dist.cdf(region.lower))
        .sum();
    assert!((total - 0.05).abs() < 1e-10);
}

/// Very large samples converge to the normal critical values z₀.₉₅ and z₀.₉₇₅
#[test]
fn test_huge_sample_matches_normal_limit() {
    let n = 1_000_000_000_000;
    let one = critical_values(0.05, n, TailMode::OneTailed).unwrap();
    let two = critical_values(0.05, n, TailMode::TwoTailed).unwrap();

    assert!((one.t_critical - 1.644_854).abs() < 1e-6, "{}", one.t_critical);
    assert!((two.t_critical - 1.959_964).abs() < 1e-6, "{}", two.t_critical);
    assert!(two.r_critical > 0.0 && two.r_critical < 1e-5);
}

/// Tail masses whose t exceeds sqrt(f64::MAX) still invert exactly
#[test]
fn test_extreme_alpha_beyond_square_overflow() {
    // df = 1 is Cauchy: t = cot(π·α) ≈ 1 / (π·α)
    let alpha = 1e-300;
    let result = critical_values(alpha, 3, TailMode::OneTailed).unwrap();
    let expected = 1.0 / (std::f64::consts::PI * alpha);

    assert!(((result.t_critical - expected) / expected).abs() < 1e-6);
    assert!(result.r_critical <= 1.0 && result.r_critical > 0.999_999);
}

#[test]
fn test_underflowing_alpha_reports_alpha() {
    let err = critical_values(5e-324, 14, TailMode::TwoTailed).unwrap_err();
    match err {
        CalcError::InvalidParameter { name, .. } => assert_eq!(name, "alpha"),
        other => panic!("expected InvalidParameter, got {:?}", other),
    }
}

/// One-tailed α above one half puts Q(1 − α) below the median
#[test]
fn test_one_tailed_alpha_above_half_is_negative() {
    let result = critical_values(0.75, 14, TailMode::OneTailed).unwrap();

    assert!((result.t_critical + 0.695_482_866).abs() < 1e-8);
    assert!((result.r_critical + 0.196_840_670).abs() < 1e-8);
    assert!(result.rejects(0.0));
    assert!(!result.rejects(-0.5));
    assert_eq!(result.rejection_regions()[0].lower, result.t_critical);
}
