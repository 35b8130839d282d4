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

//! Rank-based inverse normal (RIN) transformation correlation.
//!
//! Ranks are mapped onto standard normal quantiles (rankits) before computing Pearson's
//! coefficient. The transformation produces approximate normality regardless of the original
//! distribution shape, as long as ties are rare and the sample is reasonably large.

use crate::common::sort_by_key_slice;
use crate::correlation::Estimate;
use crate::correlation::check_dimensions;
use crate::correlation::pearson;
use crate::correlation::spearman::rank;
use crate::error::Error;

/// Computes the RIN coefficient of `x` and `y`.
///
/// # Errors
///
/// If `x` and `y` have different lengths.
pub fn estimate(x: &[f64], y: &[f64]) -> Result<Estimate, Error> {
    check_dimensions(x, y)?;
    Ok(Estimate::new(coefficient(x, y), x.len()))
}

/// Computes the RIN coefficient of two equal-length samples.
pub fn coefficient(x: &[f64], y: &[f64]) -> f64 {
    let mut a = x.to_vec();
    let mut b = y.to_vec();

    sort_by_key_slice(&mut a, &mut b, f64::total_cmp);
    rank(&mut a);
    rankit(&mut a);

    sort_by_key_slice(&mut b, &mut a, f64::total_cmp);
    rank(&mut b);
    rankit(&mut b);

    pearson::coefficient(&a, &b)
}

fn rankit(x: &mut [f64]) {
    let n = x.len() as f64;
    for v in x.iter_mut() {
        *v = pearson::standard_normal_quantile((*v - 0.5) / n);
    }
}
