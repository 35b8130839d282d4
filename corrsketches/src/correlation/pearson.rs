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

//! Pearson's product-moment correlation coefficient and its significance tests.

use std::fmt;

use statrs::distribution::ContinuousCDF;
use statrs::distribution::StudentsT;
use statrs::function::erf::erf_inv;

use crate::correlation::Estimate;
use crate::correlation::check_dimensions;
use crate::error::Error;

/// Sums of squares below this are treated as zero variance.
pub const TINY: f64 = 1.0e-25;

/// Computes Pearson's coefficient of `x` and `y`.
///
/// # Errors
///
/// If `x` and `y` have different lengths.
pub fn estimate(x: &[f64], y: &[f64]) -> Result<Estimate, Error> {
    check_dimensions(x, y)?;
    Ok(Estimate::new(coefficient(x, y), x.len()))
}

/// Computes Pearson's coefficient of two equal-length samples.
///
/// Returns `NaN` when either sample is (nearly) constant.
pub fn coefficient(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len() as f64;
    let ax = x.iter().sum::<f64>() / n;
    let ay = y.iter().sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let xt = xi - ax;
        let yt = yi - ay;
        sxx += xt * xt;
        syy += yt * yt;
        sxy += xt * yt;
    }

    if !(sxx > TINY && syy > TINY) {
        return f64::NAN;
    }
    sxy / (sxx * syy).sqrt()
}

/// p-value of a one-tailed t-test of `coefficient` against the null hypothesis of zero
/// correlation.
pub fn p_value_one_tailed(coefficient: f64, sample_size: usize) -> f64 {
    let t = t_score(coefficient, sample_size);
    students_t(sample_size).map_or(f64::NAN, |dist| 1.0 - dist.cdf(t))
}

/// p-value of a two-tailed t-test of `coefficient` against the null hypothesis of zero
/// correlation.
pub fn p_value_two_tailed(coefficient: f64, sample_size: usize) -> f64 {
    2.0 * p_value_one_tailed(coefficient, sample_size)
}

/// Two-tailed t-test of `coefficient` at significance level `alpha`.
///
/// Returns `false` when the test can not be run, i.e. for fewer than 3 samples.
pub fn is_significant(coefficient: f64, sample_size: usize, alpha: f64) -> bool {
    let t = t_score(coefficient, sample_size);
    students_t(sample_size).is_some_and(|dist| t >= dist.inverse_cdf(1.0 - alpha / 2.0))
}

fn students_t(sample_size: usize) -> Option<StudentsT> {
    let freedom = sample_size.checked_sub(2)? as f64;
    StudentsT::new(0.0, 1.0, freedom).ok()
}

fn t_score(coefficient: f64, sample_size: usize) -> f64 {
    let r = coefficient.abs();
    r * ((sample_size as f64 - 2.0) / (1.0 - r * r)).sqrt()
}

/// Lower and upper bound of a confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    /// Lower bound.
    pub lower_bound: f64,
    /// Upper bound.
    pub upper_bound: f64,
}

impl fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:+.3}, {:+.3}]", self.lower_bound, self.upper_bound)
    }
}

/// Fisher-z confidence interval of a Pearson coefficient `r` computed from `n` samples at the
/// given `confidence` level (e.g. `0.95`).
///
/// Both bounds are `NaN` when `n < 4`.
///
/// # Examples
///
/// ```
/// # use corrsketches::correlation::pearson;
/// let ci = pearson::confidence_interval(0.5, 10, 0.95);
/// assert_eq!(ci.to_string(), "[-0.189, +0.859]");
/// ```
pub fn confidence_interval(r: f64, n: usize, confidence: f64) -> ConfidenceInterval {
    if n < 4 {
        return ConfidenceInterval {
            lower_bound: f64::NAN,
            upper_bound: f64::NAN,
        };
    }
    let alpha = (1.0 - confidence) / 2.0;
    let z = standard_normal_quantile(1.0 - alpha);
    let interval = z / (n as f64 - 3.0).sqrt();

    // keep the Fisher transform finite
    let r = r.clamp(-1.0 + 1.0e-15, 1.0 - 1.0e-15);
    let zp = r_to_z(r);
    ConfidenceInterval {
        lower_bound: z_to_r(zp - interval),
        upper_bound: z_to_r(zp + interval),
    }
}

pub(crate) fn standard_normal_quantile(p: f64) -> f64 {
    std::f64::consts::SQRT_2 * erf_inv(2.0 * p - 1.0)
}

fn r_to_z(r: f64) -> f64 {
    0.5 * ((1.0 + r) / (1.0 - r)).ln()
}

fn z_to_r(z: f64) -> f64 {
    let exp2z = (2.0 * z).exp();
    (exp2z - 1.0) / (exp2z + 1.0)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn test_coefficient() {
        assert_that!(
            coefficient(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 1.0, 5.0]),
            near(0.424264, 1e-5)
        );
        assert_that!(
            coefficient(&[2.0, 4.0, 1.0, 5.0, 3.0, 7.0], &[1.0, 2.0, 3.0, 4.0, 0.0, 1.0]),
            near(-0.020965, 1e-5)
        );
        assert_that!(
            coefficient(&[2.0, 4.0, 6.0, 7.0, 2.0, 2.0], &[1.0, 2.0, 3.0, 4.0, 0.0, 1.0]),
            near(0.96532553, 1e-5)
        );
    }

    #[test]
    fn test_constant_series() {
        assert!(coefficient(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(coefficient(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0]).is_nan());
        assert!(coefficient(&[], &[]).is_nan());
    }

    #[test]
    fn test_p_values() {
        assert_that!(p_value_one_tailed(0.25, 10), near(0.24302101, 1e-6));
        assert_that!(p_value_one_tailed(0.5, 10), near(0.07055664, 1e-6));
        assert_that!(p_value_one_tailed(0.25, 20), near(0.14388153, 1e-6));
        assert_that!(p_value_one_tailed(0.5, 20), near(0.01238478, 1e-6));
        assert_that!(p_value_two_tailed(0.5, 10), near(2.0 * 0.07055664, 1e-6));
        assert!(p_value_one_tailed(0.5, 1).is_nan());
    }

    #[test]
    fn test_is_significant() {
        assert!(!is_significant(0.5, 10, 0.05));
        assert!(is_significant(0.5, 100, 0.05));
        assert!(!is_significant(0.9, 2, 0.05));
    }

    #[test]
    fn test_confidence_interval() {
        let ci = confidence_interval(0.5, 10, 0.95);
        assert_that!(ci.lower_bound, near(-0.189, 1e-3));
        assert_that!(ci.upper_bound, near(0.859, 1e-3));

        let ci = confidence_interval(0.5, 10, 0.80);
        assert_that!(ci.lower_bound, near(0.065, 1e-3));
        assert_that!(ci.upper_bound, near(0.775, 1e-3));

        let ci = confidence_interval(-0.654, 34, 0.95);
        assert_that!(ci.lower_bound, near(-0.812, 1e-3));
        assert_that!(ci.upper_bound, near(-0.406, 1e-3));
        insta::assert_snapshot!(ci.to_string(), @"[-0.812, -0.406]");

        let ci = confidence_interval(0.5, 3, 0.95);
        assert!(ci.lower_bound.is_nan() && ci.upper_bound.is_nan());
    }
}
