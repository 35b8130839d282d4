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

//! Correlation estimators.
//!
//! Every estimator maps two equal-length samples to an [`Estimate`]. Constant or otherwise
//! degenerate inputs produce a `NaN` coefficient rather than an error, since constant columns
//! are common in practice.
//!
//! [`CorrelationType`] names an estimator so it can be chosen at runtime:
//!
//! ```
//! # use corrsketches::correlation::CorrelationType;
//! let estimator: CorrelationType = "spearman".parse().unwrap();
//! let estimate = estimator.estimate(&[1.0, 2.0, 3.0], &[1.0, 4.0, 9.0]).unwrap();
//! assert_eq!(estimate.coefficient, 1.0);
//! assert_eq!(estimate.sample_size, 3);
//! ```

pub mod bootstrap;
pub mod mutual_info;
pub mod pcv;
pub mod pearson;
pub mod qcr;
pub mod qn;
pub mod rin;
pub mod spearman;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The result of a correlation estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// The estimated correlation coefficient, `NaN` for degenerate input.
    pub coefficient: f64,
    /// Number of paired observations the coefficient was computed from.
    pub sample_size: usize,
}

impl Estimate {
    /// Creates a new estimate.
    pub fn new(coefficient: f64, sample_size: usize) -> Self {
        Estimate {
            coefficient,
            sample_size,
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Estimate {{ coefficient: {:.6}, sample_size: {} }}",
            self.coefficient, self.sample_size
        )
    }
}

/// The available correlation estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CorrelationType {
    /// Pearson's product-moment correlation.
    #[default]
    Pearson,
    /// Spearman's rank correlation.
    Spearman,
    /// Pearson correlation of rank-based inverse normal transformed samples.
    Rin,
    /// Robust correlation from principal component variances measured with Qn.
    RobustQn,
    /// Mean of PM1 bootstrap resamples of Pearson's correlation.
    Pm1Bootstrap,
    /// Mutual information of the discretized samples.
    MutualInfo,
    /// Quadrant count ratio.
    Qcr,
    /// Principal component variances measured with the standard deviation.
    Pcv,
}

impl CorrelationType {
    /// Returns every estimator, in declaration order.
    pub fn all() -> [CorrelationType; 8] {
        [
            CorrelationType::Pearson,
            CorrelationType::Spearman,
            CorrelationType::Rin,
            CorrelationType::RobustQn,
            CorrelationType::Pm1Bootstrap,
            CorrelationType::MutualInfo,
            CorrelationType::Qcr,
            CorrelationType::Pcv,
        ]
    }

    /// Returns the canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            CorrelationType::Pearson => "PEARSONS",
            CorrelationType::Spearman => "SPEARMANS",
            CorrelationType::Rin => "RIN",
            CorrelationType::RobustQn => "ROBUST_QN",
            CorrelationType::Pm1Bootstrap => "PM1_BOOTSTRAP",
            CorrelationType::MutualInfo => "MI",
            CorrelationType::Qcr => "QCR",
            CorrelationType::Pcv => "PCV",
        }
    }

    /// Runs the estimator over `x` and `y`.
    ///
    /// # Errors
    ///
    /// If `x` and `y` have different lengths.
    pub fn estimate(self, x: &[f64], y: &[f64]) -> Result<Estimate, Error> {
        match self {
            CorrelationType::Pearson => pearson::estimate(x, y),
            CorrelationType::Spearman => spearman::estimate(x, y),
            CorrelationType::Rin => rin::estimate(x, y),
            CorrelationType::RobustQn => qn::estimate(x, y),
            CorrelationType::Pm1Bootstrap => bootstrap::estimate(x, y).map(|bs| bs.estimate()),
            CorrelationType::MutualInfo => mutual_info::estimate(x, y),
            CorrelationType::Qcr => qcr::estimate(x, y),
            CorrelationType::Pcv => pcv::estimate(x, y),
        }
    }
}

impl fmt::Display for CorrelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorrelationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PEARSONS" | "PEARSON" => Ok(CorrelationType::Pearson),
            "SPEARMANS" | "SPEARMAN" => Ok(CorrelationType::Spearman),
            "RIN" => Ok(CorrelationType::Rin),
            "ROBUST_QN" | "QN" => Ok(CorrelationType::RobustQn),
            "PM1_BOOTSTRAP" => Ok(CorrelationType::Pm1Bootstrap),
            "MI" => Ok(CorrelationType::MutualInfo),
            "QCR" => Ok(CorrelationType::Qcr),
            "PCV" => Ok(CorrelationType::Pcv),
            other => Err(Error::invalid_argument(format!(
                "unknown correlation type: {other}"
            ))),
        }
    }
}

pub(crate) fn check_dimensions(x: &[f64], y: &[f64]) -> Result<(), Error> {
    if x.len() != y.len() {
        return Err(Error::dimension_mismatch(x.len(), y.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_names() {
        for ty in CorrelationType::all() {
            assert_eq!(ty.name().parse::<CorrelationType>().unwrap(), ty);
        }
        assert_eq!(
            "pearson".parse::<CorrelationType>().unwrap(),
            CorrelationType::Pearson
        );
        assert_eq!(
            "qn".parse::<CorrelationType>().unwrap(),
            CorrelationType::RobustQn
        );
        assert!("kendall".parse::<CorrelationType>().is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        for ty in CorrelationType::all() {
            let err = ty.estimate(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DimensionMismatch, "{ty}");
        }
    }

    #[test]
    fn test_display() {
        let estimate = Estimate::new(0.5, 10);
        insta::assert_snapshot!(estimate.to_string(), @"Estimate { coefficient: 0.500000, sample_size: 10 }");
    }
}
