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

//! The Qn robust scale estimator.
//!
//! Implements the estimator proposed in Peter J. Rousseeuw and Christophe Croux (1993),
//! "Alternatives to the Median Absolute Deviation", Journal of the American Statistical
//! Association, 88:424, 1273-1283, using the O(n log n) algorithm from Croux and Rousseeuw
//! (1992), "Time-Efficient Algorithms for Two Highly Robust Estimators of Scale".

use std::collections::BinaryHeap;

use crate::error::Error;

/// Asymptotic consistency factor for Gaussian data.
///
/// Deviates from the 2.2219 printed in the paper; this value matches the `robustbase` R package.
pub const GAUSSIAN_CONSISTENCY_FACTOR: f64 = 2.21914;

/// A corrected Qn estimate together with its asymptotic standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QnEstimate {
    /// The corrected Qn scale.
    pub scale: f64,
    /// Asymptotic standard error of `scale`.
    pub error: f64,
}

/// Estimates the scale of `x` with the Qn estimator, corrected for small samples.
///
/// # Errors
///
/// If `x` holds fewer than 2 observations.
///
/// # Examples
///
/// ```
/// # use corrsketches::statistics::qn;
/// let scale = qn::estimate_scale(&[1.0, 2.0, 3.0]).unwrap();
/// assert!((scale - 2.205048).abs() < 1e-5);
/// ```
pub fn estimate_scale(x: &[f64]) -> Result<f64, Error> {
    let n = x.len();
    if n < 2 {
        return Err(Error::invalid_argument("array length must be at least 2")
            .with_context("length", n));
    }

    let mut left = vec![0usize; n];
    let mut right = vec![0usize; n];
    let mut p = vec![0usize; n];
    let mut q = vec![0usize; n];
    let mut weight = vec![0i64; n];
    let mut work = vec![0.0f64; n];

    let h = n / 2 + 1;
    let k = (h * (h - 1) / 2) as i64;

    let mut y = x.to_vec();
    y.sort_by(f64::total_cmp);

    for i in 0..n {
        left[i] = n - i + 1;
        right[i] = if i <= h { n } else { n - (i - h) };
    }

    let mut n_left = (n * (n + 1) / 2) as i64;
    let mut n_right = (n * n) as i64;
    let knew = k + n_left;

    let mut scale = None;
    while scale.is_none() && n_right - n_left > n as i64 {
        let mut j = 0;
        for i in 1..n {
            if left[i] <= right[i] {
                weight[j] = (right[i] - left[i] + 1) as i64;
                let jhelp = left[i] + weight[j] as usize / 2;
                work[j] = narrow(y[i] - y[n - jhelp]);
                j += 1;
            }
        }
        let trial = weighted_high_median(&mut work[..j], &mut weight[..j]);

        let mut j = 0;
        for i in (0..n).rev() {
            while j < n && narrow(y[i] - y[n - j - 1]) < trial {
                j += 1;
            }
            p[i] = j;
        }

        let mut j = n + 1;
        for i in 0..n {
            while narrow(y[i] - y[n + 1 - j]) > trial {
                j -= 1;
            }
            q[i] = j;
        }

        let sum_p: i64 = p.iter().map(|&v| v as i64).sum();
        let sum_q: i64 = q.iter().map(|&v| v as i64 - 1).sum();

        if knew <= sum_p {
            right.copy_from_slice(&p);
            n_right = sum_p;
        } else if knew > sum_q {
            left.copy_from_slice(&q);
            n_left = sum_q;
        } else {
            scale = Some(trial);
        }
    }

    let scale = match scale {
        Some(scale) => scale,
        None => {
            let mut candidates = Vec::with_capacity(n);
            for i in 1..n {
                for jj in left[i]..=right[i] {
                    candidates.push(y[i] - y[n - jj]);
                }
            }
            let len = candidates.len();
            find_kth_order_statistic(&candidates, len, (knew - n_left) as usize)
        }
    };

    Ok(scale * small_sample_correction(n) * GAUSSIAN_CONSISTENCY_FACTOR)
}

/// Estimates the Qn scale of `x` and its asymptotic standard error.
///
/// # Errors
///
/// If `x` holds fewer than 2 observations.
pub fn estimate_scale_with_error(x: &[f64]) -> Result<QnEstimate, Error> {
    let scale = estimate_scale(x)?;
    let error = scale / (2.0 * (x.len() - 1) as f64 * 0.8227).sqrt();
    Ok(QnEstimate { scale, error })
}

// pairwise differences are compared at single precision
fn narrow(v: f64) -> f64 {
    v as f32 as f64
}

/// Correction factors consistent with the `robustbase` R package.
fn small_sample_correction(n: usize) -> f64 {
    match n {
        2 => 0.399356,
        3 => 0.99365,
        4 => 0.51321,
        5 => 0.84401,
        6 => 0.61220,
        7 => 0.85877,
        8 => 0.66993,
        9 => 0.87344,
        10 => 0.72014,
        11 => 0.88906,
        12 => 0.75743,
        _ if n < 2 => 1.0,
        _ => {
            let nf = n as f64;
            let dn = if n % 2 == 1 {
                1.60188 + (-2.1284 - 5.172 / nf) / nf
            } else {
                3.67561 + (1.9654 + (6.987 - 77.0 / nf) / nf) / nf
            };
            1.0 / (dn / nf + 1.0)
        }
    }
}

/// Weighted high median in O(n) time: the smallest `a[j]` such that the total weight of all
/// `a[i] <= a[j]` is strictly greater than half of the total weight.
///
/// Both slices are used as scratch space and are left in an unspecified order.
pub(crate) fn weighted_high_median(a: &mut [f64], weights: &mut [i64]) -> f64 {
    debug_assert_eq!(a.len(), weights.len());
    let mut nn = a.len();
    let total: i64 = weights.iter().sum();
    let mut rest = 0i64;

    let mut a_cand = vec![0.0f64; nn];
    let mut w_cand = vec![0i64; nn];
    loop {
        if nn == 0 {
            return f64::NAN;
        }
        let trial = find_kth_order_statistic(a, nn, nn / 2);

        let (mut w_left, mut w_mid) = (0i64, 0i64);
        for i in 0..nn {
            if a[i] < trial {
                w_left += weights[i];
            } else if a[i] == trial {
                w_mid += weights[i];
            }
        }

        let mut kcand = 0;
        if 2 * (rest + w_left) > total {
            for i in 0..nn {
                if a[i] < trial {
                    a_cand[kcand] = a[i];
                    w_cand[kcand] = weights[i];
                    kcand += 1;
                }
            }
        } else if 2 * (rest + w_left + w_mid) <= total {
            for i in 0..nn {
                if a[i] > trial {
                    a_cand[kcand] = a[i];
                    w_cand[kcand] = weights[i];
                    kcand += 1;
                }
            }
            rest += w_left + w_mid;
        } else {
            return trial;
        }
        nn = kcand;
        a[..nn].copy_from_slice(&a_cand[..nn]);
        weights[..nn].copy_from_slice(&w_cand[..nn]);
    }
}

/// Returns the `k`-th smallest (1-based) of the first `n` elements of `x`.
///
/// A `k` of zero is treated as one.
pub(crate) fn find_kth_order_statistic(x: &[f64], n: usize, k: usize) -> f64 {
    debug_assert!(n <= x.len() && k <= n);
    if n == 1 {
        return x[0];
    }
    let k = k.max(1);
    // max-heap holding the k smallest values seen so far
    let mut heap = BinaryHeap::with_capacity(k + 1);
    for &v in &x[..n] {
        heap.push(TotalF64(v));
        if heap.len() > k {
            heap.pop();
        }
    }
    heap.peek().map_or(f64::NAN, |v| v.0)
}

#[derive(Debug, Clone, Copy)]
struct TotalF64(f64);

impl PartialEq for TotalF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for TotalF64 {}

impl PartialOrd for TotalF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[track_caller]
    fn assert_scale(x: &[f64], expected: f64) {
        let scale = estimate_scale(x).unwrap();
        assert_that!(scale, near(expected, 1e-3 * expected.abs().max(1.0)));
    }

    #[test]
    fn test_estimate_scale() {
        assert_scale(&[1.0, 2.0, 3.0], 2.205048);
        assert_scale(&[5.0, 10.0, 25.0, 35.0], 17.08327);
        assert_scale(&[5000.0, 1.0, 123.0, 45476.0, 3.0, 3435.0], 4662.569);
        assert_scale(&[0.0, 0.0, 0.0, 1234.0, 1239.0, 1345.0], 150.7999);
        assert_scale(&[0.0, 0.0, 0.0, 0.0, 1234.0, 1239.0, 1345.0], 0.0);
        assert_scale(&[123.0, 443423.0, -121673.0, 4432.0, 0.0, 3987.0], 6021.127);
        assert_scale(&[1.0, 2.0, 3.0, 4.0, 5.0], 1.872976);
        assert_scale(&[2.0, 3.0, 4.0, 4.0, 4.0], 0.0);
        assert_scale(&[-1.0, 7583.0, 475.0, 0.001, 0.347, 575.0, 123.0, 33.0], 182.8587);
        assert_scale(
            &[
                3.0, 7583.0, 475.0, 78687.0, 347.0, 575.0, 123.0, 33.0, 655.0, 8758.0, 0.0,
                3987.0,
            ],
            798.4005,
        );
        assert_scale(&[123.0, 33.0, 655.0, 8758.0, 0.0, 3987.0], 889.8552);
        assert_scale(&[46.0, 3.0, 7583.0, 475.0, 78687.0, 347.0, 575.0], 655.5714);
    }

    #[test]
    fn test_constant_input() {
        assert_eq!(estimate_scale(&[0.0, 0.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_too_few_samples() {
        assert!(estimate_scale(&[1.0]).is_err());
        assert!(estimate_scale(&[]).is_err());
    }

    #[test]
    fn test_scale_with_error() {
        let estimate = estimate_scale_with_error(&[1.0, 2.0, 3.0]).unwrap();
        let expected_error = estimate.scale / (2.0 * 2.0 * 0.8227f64).sqrt();
        assert_that!(estimate.error, near(expected_error, 1e-12));
    }

    #[test]
    fn test_weighted_high_median() {
        let mut a = [1.0, 2.0, 3.0, 4.0];
        let mut w = [1_000_000_000i64; 4];
        assert_eq!(weighted_high_median(&mut a, &mut w), 3.0);

        let mut a = [1.0, 2.0, 3.0, 4.0];
        let mut w = [1_000_000_000i64; 4];
        assert_eq!(weighted_high_median(&mut a[..3], &mut w[..3]), 2.0);

        let mut a = [1.0, 2.0, 3.0, 4.0];
        let mut w = [2i64; 4];
        assert_eq!(weighted_high_median(&mut a, &mut w), 3.0);
    }

    #[test]
    fn test_find_kth_order_statistic() {
        let x = [3.0, 2.0, 1.0];
        assert_eq!(find_kth_order_statistic(&x, 2, 1), 2.0);
        assert_eq!(find_kth_order_statistic(&x, 2, 2), 3.0);
        assert_eq!(find_kth_order_statistic(&x, 1, 1), 3.0);

        let x = [25.0, 20.0, 25.0];
        assert_eq!(find_kth_order_statistic(&x, 1, 1), 25.0);
        assert_eq!(find_kth_order_statistic(&x, 2, 1), 20.0);
        assert_eq!(find_kth_order_statistic(&x, 2, 2), 25.0);
        assert_eq!(find_kth_order_statistic(&x, 3, 3), 25.0);
    }
}
