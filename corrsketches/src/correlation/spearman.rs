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

//! Spearman's rank correlation coefficient.

use crate::common::sort_by_key_slice;
use crate::correlation::Estimate;
use crate::correlation::check_dimensions;
use crate::correlation::pearson;
use crate::error::Error;

/// Computes Spearman's coefficient of `x` and `y`.
///
/// # Errors
///
/// If `x` and `y` have different lengths.
pub fn estimate(x: &[f64], y: &[f64]) -> Result<Estimate, Error> {
    check_dimensions(x, y)?;
    Ok(Estimate::new(coefficient(x, y), x.len()))
}

/// Computes Spearman's coefficient of two equal-length samples: Pearson's coefficient of their
/// ranks, with ties receiving the mean of their ranks.
pub fn coefficient(x: &[f64], y: &[f64]) -> f64 {
    let (a, b) = paired_ranks(x, y);
    pearson::coefficient(&a, &b)
}

/// Replaces both samples by their ranks while keeping the pairs aligned.
fn paired_ranks(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut a = x.to_vec();
    let mut b = y.to_vec();
    sort_by_key_slice(&mut a, &mut b, f64::total_cmp);
    rank(&mut a);
    sort_by_key_slice(&mut b, &mut a, f64::total_cmp);
    rank(&mut b);
    (a, b)
}

/// Replaces the elements of an ascending slice by their 1-based ranks. Tied values are
/// assigned the mean of their ranks.
pub(crate) fn rank(x: &mut [f64]) {
    let n = x.len();
    let mut j = 1;
    while j < n {
        if x[j] != x[j - 1] {
            x[j - 1] = j as f64;
            j += 1;
        } else {
            let mut jt = j + 1;
            while jt <= n && x[jt - 1] == x[j - 1] {
                jt += 1;
            }
            let rank = 0.5 * (j + jt - 1) as f64;
            for v in &mut x[j - 1..jt - 1] {
                *v = rank;
            }
            j = jt;
        }
    }
    if j == n {
        x[n - 1] = n as f64;
    }
}
