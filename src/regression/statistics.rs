// Raw sums for the closed-form regression and correlation formulas
//
// Every derived quantity (slope, intercept, r) is expressed in terms of
// n, Σx, Σy, Σx², Σy² and Σxy, so the sums are kept on the result for
// step-by-step worked-example displays.

use crate::dataset::{DataPoint, Dataset};
use serde::Serialize;

/// Sums over a dataset, accumulated in a single pass
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SumStatistics {
    /// Number of points
    pub n: usize,
    /// Σx
    pub sum_x: f64,
    /// Σy
    pub sum_y: f64,
    /// Σx²
    pub sum_x2: f64,
    /// Σy²
    pub sum_y2: f64,
    /// Σxy
    pub sum_xy: f64,
}

impl SumStatistics {
    /// n as a float, for use in the formulas
    pub fn count(&self) -> f64 {
        self.n as f64
    }

    /// nΣxy − ΣxΣy (shared numerator of the slope and of r)
    pub fn cross_term(&self) -> f64 {
        self.count() * self.sum_xy - self.sum_x * self.sum_y
    }

    /// nΣx² − (Σx)²
    pub fn x_spread(&self) -> f64 {
        self.count() * self.sum_x2 - self.sum_x * self.sum_x
    }

    /// nΣy² − (Σy)²
    pub fn y_spread(&self) -> f64 {
        self.count() * self.sum_y2 - self.sum_y * self.sum_y
    }

    /// Mean of x, `None` for an empty dataset
    pub fn mean_x(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum_x / self.count())
    }

    /// Mean of y, `None` for an empty dataset
    pub fn mean_y(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum_y / self.count())
    }
}

/// Per-point columns of the worked-calculation table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRow {
    pub x: f64,
    pub y: f64,
    pub x2: f64,
    pub y2: f64,
    pub xy: f64,
}

impl From<&DataPoint> for DerivedRow {
    fn from(p: &DataPoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            x2: p.x * p.x,
            y2: p.y * p.y,
            xy: p.x * p.y,
        }
    }
}

/// Compute Σx, Σy, Σx², Σy², Σxy in one pass
///
/// An empty dataset yields all-zero sums with `n = 0`; callers dividing by n
/// must guard against that.
pub fn compute_sums(dataset: &Dataset) -> SumStatistics {
    dataset
        .iter()
        .fold(SumStatistics::default(), |mut acc, p| {
            acc.n += 1;
            acc.sum_x += p.x;
            acc.sum_y += p.y;
            acc.sum_x2 += p.x * p.x;
            acc.sum_y2 += p.y * p.y;
            acc.sum_xy += p.x * p.y;
            acc
        })
}

/// Per-point x², y², xy columns in dataset order
pub fn derived_rows(dataset: &Dataset) -> Vec<DerivedRow> {
    dataset.iter().map(DerivedRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_sums_reference_dataset() {
        let ds = Dataset::from_pairs(&[(2.0, 7.0), (4.0, 11.0), (5.0, 13.0), (6.0, 20.0)]).unwrap();
        let sums = compute_sums(&ds);

        assert_eq!(sums.n, 4);
        assert_eq!(sums.sum_x, 17.0);
        assert_eq!(sums.sum_y, 51.0);
        assert_eq!(sums.sum_x2, 81.0);
        assert_eq!(sums.sum_y2, 739.0);
        assert_eq!(sums.sum_xy, 243.0);
        assert_eq!(sums.cross_term(), 105.0);
        assert_eq!(sums.x_spread(), 35.0);
    }

    #[test]
    fn test_compute_sums_empty() {
        let sums = compute_sums(&Dataset::default());
        assert_eq!(sums, SumStatistics::default());
        assert_eq!(sums.mean_x(), None);
        assert_eq!(sums.mean_y(), None);
    }

    #[test]
    fn test_means() {
        let ds = Dataset::from_pairs(&[(1.0, 10.0), (3.0, 20.0)]).unwrap();
        let sums = compute_sums(&ds);
        assert_eq!(sums.mean_x(), Some(2.0));
        assert_eq!(sums.mean_y(), Some(15.0));
    }

    #[test]
    fn test_derived_rows() {
        let ds = Dataset::from_pairs(&[(2.0, 7.0), (-3.0, 4.0)]).unwrap();
        let rows = derived_rows(&ds);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].x2, 4.0);
        assert_eq!(rows[0].y2, 49.0);
        assert_eq!(rows[0].xy, 14.0);
        assert_eq!(rows[1].xy, -12.0);
    }
}
