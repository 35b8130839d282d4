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

/// Arithmetic mean of `x`. `NaN` for an empty slice.
pub fn mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// Median of `x`, averaging the two middle elements for an even length. `NaN` when empty.
///
/// The input is left untouched.
pub fn median(x: &[f64]) -> f64 {
    match x.len() {
        0 => f64::NAN,
        1 => x[0],
        2 => (x[0] + x[1]) / 2.0,
        n => {
            let mut sorted = x.to_vec();
            sorted.sort_by(f64::total_cmp);
            if n % 2 == 0 {
                (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
            } else {
                sorted[n / 2]
            }
        }
    }
}

/// Uncorrected (population) standard deviation of `x`. Zero for an empty slice.
pub fn std(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean = mean(x);
    let sum: f64 = x.iter().map(|xi| (xi - mean) * (xi - mean)).sum();
    (sum / n).sqrt()
}

/// Minimum and maximum of a slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Smallest value, or `+inf` for an empty slice.
    pub min: f64,
    /// Largest value, or `-inf` for an empty slice.
    pub max: f64,
}

/// Computes the minimum and maximum values of `x`.
pub fn extent(x: &[f64]) -> Extent {
    x.iter().fold(
        Extent {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        },
        |ext, &xi| Extent {
            min: if xi < ext.min { xi } else { ext.min },
            max: if xi > ext.max { xi } else { ext.max },
        },
    )
}

/// Rescales `x` linearly so that its extent maps onto `[0, 1]`.
pub fn unitize(x: &[f64]) -> Vec<f64> {
    let Extent { min, max } = extent(x);
    x.iter().map(|xi| (xi - min) / (max - min)).collect()
}

/// Removes the mean of `x` and scales it to unit (population) variance: `z = (x - u) / s`.
pub fn standardize(x: &[f64]) -> Vec<f64> {
    let std = std(x);
    let mean = mean(x);
    x.iter().map(|xi| (xi - mean) / std).collect()
}

/// Dot product of `x` and `y` divided by their length: `<x, y> / n`.
pub fn dotn(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let sum: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    sum / x.len() as f64
}
