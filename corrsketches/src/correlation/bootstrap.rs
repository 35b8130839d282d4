// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! PM1 bootstrap of Pearson's correlation coefficient.
//!
//! Confidence intervals use the modified percentiles (PM1) described by Bishara et al. in
//! "Asymptotic confidence intervals for the Pearson correlation via skewness and kurtosis",
//! originally proposed by Rand R. Wilcox in "Confidence intervals for the slope of a regression
//! line when the error term has nonconstant variance". PM1 adjusts the percentiles based on the
//! sample size.

use std::fmt;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::correlation::Estimate;
use crate::correlation::check_dimensions;
use crate::correlation::pearson;
use crate::error::Error;
use crate::statistics::mean;

/// Maximum number of bootstrap resamples.
pub const MAX_RESAMPLES: usize = 10_000;

const SEED: u64 = 0;

/// Result of a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapEstimate {
    /// Number of paired observations.
    pub sample_size: usize,
    /// Pearson's coefficient of the original sample.
    pub corr_est: f64,
    /// Mean of the resampled coefficients.
    pub corr_bs_mean: f64,
    /// Median of the resampled coefficients.
    pub corr_bs_median: f64,
    /// Lower bound of the PM1 confidence interval.
    pub lower_bound: f64,
    /// Upper bound of the PM1 confidence interval.
    pub upper_bound: f64,
}

impl BootstrapEstimate {
    fn degenerate(sample_size: usize) -> Self {
        BootstrapEstimate {
            sample_size,
            corr_est: f64::NAN,
            corr_bs_mean: f64::NAN,
            corr_bs_median: f64::NAN,
            lower_bound: f64::NAN,
            upper_bound: f64::NAN,
        }
    }

    /// The bootstrap mean as a plain [`Estimate`].
    pub fn estimate(&self) -> Estimate {
        Estimate::new(self.corr_bs_mean, self.sample_size)
    }
}

impl fmt::Display for BootstrapEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[r={:+.3}, r_mean={:.3}, r_median={:.3}, lb={:+.3}, ub={:+.3}]",
            self.corr_est,
            self.corr_bs_mean,
            self.corr_bs_median,
            self.lower_bound,
            self.upper_bound
        )
    }
}

/// Bootstraps Pearson's coefficient of `x` and `y`, stopping early once the running mean of
/// the resampled coefficients has stabilized.
///
/// Resampling is seeded, so repeated calls on the same input return the same estimate.
///
/// # Errors
///
/// If `x` and `y` have different lengths.
pub fn estimate(x: &[f64], y: &[f64]) -> Result<BootstrapEstimate, Error> {
    run(x, y, true)
}

/// Bootstraps Pearson's coefficient of `x` and `y` using all [`MAX_RESAMPLES`] resamples.
///
/// # Errors
///
/// If `x` and `y` have different lengths.
pub fn simple_estimate(x: &[f64], y: &[f64]) -> Result<BootstrapEstimate, Error> {
    run(x, y, false)
}

/// Mean of the bootstrapped coefficients of two equal-length samples.
pub fn coefficient(x: &[f64], y: &[f64]) -> f64 {
    run(x, y, true).map_or(f64::NAN, |bs| bs.corr_bs_mean)
}

fn run(x: &[f64], y: &[f64], early_stop: bool) -> Result<BootstrapEstimate, Error> {
    check_dimensions(x, y)?;
    let n = x.len();
    if n == 0 {
        return Ok(BootstrapEstimate::degenerate(n));
    }

    let mut rng = StdRng::seed_from_u64(SEED);
    let corr = pearson::coefficient(x, y);

    let mut estimates = Vec::with_capacity(MAX_RESAMPLES);
    let mut sx = vec![0.0; n];
    let mut sy = vec![0.0; n];
    let mut running_mean = 0.0;
    let mut unstable = 0usize;
    for i in 0..MAX_RESAMPLES {
        for j in 0..n {
            let ni = rng.random_range(0..n);
            sx[j] = x[ni];
            sy[j] = y[ni];
        }
        let sr = pearson::coefficient(&sx, &sy);
        let sr = if sr.is_nan() { 0.0 } else { sr };
        estimates.push(sr);

        if early_stop {
            let count = i + 1;
            let diff = (sr - running_mean) / count as f64;
            running_mean += diff;
            if diff.abs() > 0.01 {
                unstable += 1;
            }
            if i >= 5 && (unstable as f64 / count as f64) < 0.05 {
                tracing::debug!(resamples = count, "bootstrap converged early");
                break;
            }
        }
    }

    estimates.sort_by(f64::total_cmp);
    Ok(pm1_confidence_interval(&estimates, n, corr))
}

fn pm1_confidence_interval(estimates: &[f64], n: usize, corr: f64) -> BootstrapEstimate {
    let (a, c) = match n {
        0..40 => (7.0, 593.0),
        40..80 => (8.0, 592.0),
        80..180 => (11.0, 588.0),
        180..250 => (14.0, 585.0),
        _ => (15.0, 584.0),
    };
    let b = estimates.len() as f64;
    let at = |p: f64| estimates[(p.ceil() as usize).saturating_sub(1)];
    BootstrapEstimate {
        sample_size: n,
        corr_est: corr,
        corr_bs_mean: mean(estimates),
        corr_bs_median: at(0.5 * b),
        lower_bound: at(b / 599.0 * a),
        upper_bound: at(b / 599.0 * c),
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn sample(rng: &mut StdRng, n: usize) -> (Vec<f64>, Vec<f64>) {
        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        for _ in 0..n {
            let xi = -(1.0 - rng.random::<f64>()).ln();
            let yi = if rng.random::<f64>() > 0.55 {
                0.0
            } else {
                xi * 0.2 - (1.0 - rng.random::<f64>()).ln()
            };
            x.push(xi);
            y.push(yi);
        }
        (x, y)
    }

    #[test]
    fn test_interval_brackets_estimates() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..5 {
            let n = 25 + rng.random_range(0..512);
            let (x, y) = sample(&mut rng, n);
            let bs = estimate(&x, &y).unwrap();
            assert_eq!(bs.sample_size, n);
            assert_eq!(bs.corr_est, pearson::coefficient(&x, &y));
            assert!(bs.lower_bound <= bs.corr_bs_median);
            assert!(bs.corr_bs_median <= bs.upper_bound);
            assert!(bs.lower_bound >= -1.0 && bs.upper_bound <= 1.0);
            assert_eq!(bs.estimate().coefficient, bs.corr_bs_mean);
        }
    }

    #[test]
    fn test_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        let (x, y) = sample(&mut rng, 100);
        assert_eq!(estimate(&x, &y).unwrap(), estimate(&x, &y).unwrap());
        assert_eq!(
            simple_estimate(&x, &y).unwrap(),
            simple_estimate(&x, &y).unwrap()
        );
    }

    #[test]
    fn test_perfect_correlation() {
        let x: Vec<f64> = (0..50).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let bs = simple_estimate(&x, &y).unwrap();
        assert!((bs.corr_bs_mean - 1.0).abs() < 1e-9);
        assert!((bs.lower_bound - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        let bs = estimate(&[], &[]).unwrap();
        assert_eq!(bs.sample_size, 0);
        assert!(bs.corr_bs_mean.is_nan());
        assert!(coefficient(&[], &[]).is_nan());
    }
}
