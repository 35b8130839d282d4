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

//! Correlation from principal component variances measured with the standard deviation.
//!
//! The same formula robust estimators use, with the non-robust population standard deviation
//! as the scale.

use std::f64::consts::SQRT_2;

use crate::correlation::Estimate;
use crate::correlation::check_dimensions;
use crate::error::Error;
use crate::statistics::std;

/// Computes the PCV coefficient of `x` and `y`.
///
/// # Errors
///
/// If `x` and `y` have different lengths.
pub fn estimate(x: &[f64], y: &[f64]) -> Result<Estimate, Error> {
    check_dimensions(x, y)?;
    Ok(Estimate::new(coefficient(x, y), x.len()))
}

/// Computes the PCV coefficient of two equal-length samples.
pub fn coefficient(x: &[f64], y: &[f64]) -> f64 {
    let std_x = std(x);
    let std_y = std(y);

    let (u, v): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| {
            let xs = (xi / std_x) / SQRT_2;
            let ys = (yi / std_y) / SQRT_2;
            (xs + ys, xs - ys)
        })
        .unzip();

    let us2 = std(&u).powi(2);
    let vs2 = std(&v).powi(2);
    (us2 - vs2) / (us2 + vs2)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn test_matches_pearson() {
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
}
