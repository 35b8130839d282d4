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

//! Mutual information of discretized samples.
//!
//! Both samples are discretized independently into equal-width bins spanning their extent, and
//! the mutual information of the resulting joint distribution is reported in bits.

use std::collections::HashMap;

use crate::correlation::Estimate;
use crate::correlation::check_dimensions;
use crate::error::Error;
use crate::statistics::Extent;
use crate::statistics::extent;

/// Number of bins each sample is discretized into.
pub const NUM_BINS: usize = 10;

/// Computes the mutual information of `x` and `y`.
///
/// # Errors
///
/// If `x` and `y` have different lengths.
pub fn estimate(x: &[f64], y: &[f64]) -> Result<Estimate, Error> {
    check_dimensions(x, y)?;
    Ok(Estimate::new(coefficient(x, y), x.len()))
}

/// Computes the mutual information, in bits, of two equal-length samples. `NaN` when empty.
///
/// # Examples
///
/// ```
/// # use corrsketches::correlation::mutual_info;
/// let mi = mutual_info::coefficient(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(mi, 2.0);
/// ```
pub fn coefficient(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    let n = x.len() as f64;
    let bx = discretize(x);
    let by = discretize(y);

    let mut joint: HashMap<(usize, usize), usize> = HashMap::new();
    let mut first = [0usize; NUM_BINS];
    let mut second = [0usize; NUM_BINS];
    for (&i, &j) in bx.iter().zip(&by) {
        *joint.entry((i, j)).or_default() += 1;
        first[i] += 1;
        second[j] += 1;
    }

    joint
        .iter()
        .map(|(&(i, j), &count)| {
            let pxy = count as f64 / n;
            let px = first[i] as f64 / n;
            let py = second[j] as f64 / n;
            pxy * (pxy / (px * py)).log2()
        })
        .sum()
}

fn discretize(x: &[f64]) -> Vec<usize> {
    let Extent { min, max } = extent(x);
    let width = (max - min) / NUM_BINS as f64;
    x.iter()
        .map(|&v| {
            if width > 0.0 {
                (((v - min) / width) as usize).min(NUM_BINS - 1)
            } else {
                0
            }
        })
        .collect()
}
