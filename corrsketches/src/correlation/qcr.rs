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

//! Quadrant count ratio (QCR) correlation.

use crate::correlation::Estimate;
use crate::correlation::check_dimensions;
use crate::error::Error;
use crate::statistics::mean;

/// Computes the quadrant count ratio of `x` and `y`.
///
/// # Errors
///
/// If `x` and `y` have different lengths.
pub fn estimate(x: &[f64], y: &[f64]) -> Result<Estimate, Error> {
    check_dimensions(x, y)?;
    Ok(Estimate::new(coefficient(x, y), x.len()))
}

/// Computes `(q1 + q3 - q2 - q4) / n`, where `qi` counts the points falling into the i-th
/// quadrant around the sample means. Points lying on either mean line count towards `n` only.
pub fn coefficient(x: &[f64], y: &[f64]) -> f64 {
    let mx = mean(x);
    let my = mean(y);

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    for (&xi, &yi) in x.iter().zip(y) {
        if (xi > mx && yi > my) || (xi < mx && yi < my) {
            concordant += 1;
        } else if (xi > mx && yi < my) || (xi < mx && yi > my) {
            discordant += 1;
        }
    }
    (concordant - discordant) as f64 / x.len() as f64
}
