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

//! Robust correlation from principal component variances measured with the Qn scale.
//!
//! Described in Shevlyakov, G.L. and Oja, H., 2016, "Robust correlation: Theory and
//! applications" (Vol. 3), John Wiley & Sons.

use std::f64::consts::SQRT_2;

use crate::correlation::Estimate;
use crate::correlation::check_dimensions;
use crate::error::Error;
use crate::statistics::qn::estimate_scale;

/// Computes the robust Qn correlation of `x` and `y`.
///
/// # Errors
///
/// If `x` and `y` have different lengths.
pub fn estimate(x: &[f64], y: &[f64]) -> Result<Estimate, Error> {
    check_dimensions(x, y)?;
    Ok(Estimate::new(coefficient(x, y), x.len()))
}

/// Computes the robust Qn correlation of two equal-length samples.
///
/// Returns `NaN` for fewer than 2 samples or when either sample has zero Qn scale.
pub fn coefficient(x: &[f64], y: &[f64]) -> f64 {
    let (Ok(scale_x), Ok(scale_y)) = (estimate_scale(x), estimate_scale(y)) else {
        return f64::NAN;
    };
    if !is_usable_scale(scale_x) || !is_usable_scale(scale_y) {
        return f64::NAN;
    }

    let (u, v): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| {
            let xs = (xi / scale_x) / SQRT_2;
            let ys = (yi / scale_y) / SQRT_2;
            (xs + ys, xs - ys)
        })
        .unzip();

    let (Ok(scale_u), Ok(scale_v)) = (estimate_scale(&u), estimate_scale(&v)) else {
        return f64::NAN;
    };
    let us2 = scale_u * scale_u;
    let vs2 = scale_v * scale_v;
    (us2 - vs2) / (us2 + vs2)
}

fn is_usable_scale(scale: f64) -> bool {
    scale.is_finite() && scale != 0.0
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn test_coefficient() {
        assert_that!(coefficient(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]), near(1.0, 1e-3));
        assert_that!(coefficient(&[-1.0, -2.0, -3.0], &[1.0, 2.0, 3.0]), near(-1.0, 1e-3));
        assert_that!(coefficient(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), near(-1.0, 1e-3));
        assert_that!(
            coefficient(
                &[1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0],
                &[2.0, 3.0, 4.0, 5.0, 6.0, 5.0, 4.0, 3.0]
            ),
            near(1.0, 1e-3)
        );
    }

    #[test]
    fn test_degenerate_input() {
        assert!(coefficient(&[1.0, 1.0, 1.0], &[1.0, 3.0, 4.0]).is_nan());
        assert!(coefficient(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]).is_nan());
        assert!(coefficient(&[1.0], &[2.0]).is_nan());
    }
}
