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

//! Correlation sketches.
//!
//! A [`CorrelationSketch`] summarizes a `(key, value)` column with a min-value synopsis. Two
//! sketches built over columns of different tables can estimate both how much their keys
//! overlap and how correlated their values would be after joining on the key, without ever
//! materializing the join.
//!
//! # Usage
//!
//! ```
//! # use corrsketches::sketch::CorrelationSketch;
//! let builder = CorrelationSketch::builder();
//! let x = builder.build_from(&["a", "b", "c", "d"], &[1.0, 2.0, 3.0, 4.0]).unwrap();
//! let y = builder.build_from(&["b", "c", "d", "e"], &[2.0, 4.0, 6.0, 8.0]).unwrap();
//!
//! let estimate = x.correlation_to(&y).unwrap();
//! assert_eq!(estimate.sample_size, 3);
//! assert!((estimate.coefficient - 1.0).abs() < 1e-12);
//! ```

mod builder;
mod immutable;

pub use self::builder::CorrelationSketchBuilder;
pub use self::immutable::ImmutableCorrelationSketch;
pub use self::immutable::Paired;

use crate::correlation::CorrelationType;
use crate::correlation::Estimate;
use crate::error::Error;
use crate::kmv::MinValueSketch;
use crate::kmv::Synopsis;

/// A min-value synopsis of a keyed numeric column paired with a default correlation estimator.
#[derive(Debug, Clone)]
pub struct CorrelationSketch {
    synopsis: Synopsis,
    cardinality: Option<usize>,
    estimator: CorrelationType,
}

impl CorrelationSketch {
    /// Create a new builder for CorrelationSketch
    pub fn builder() -> CorrelationSketchBuilder {
        CorrelationSketchBuilder::default()
    }

    /// Wraps an already populated synopsis.
    pub fn from_synopsis(synopsis: Synopsis, estimator: CorrelationType) -> Self {
        CorrelationSketch {
            synopsis,
            cardinality: None,
            estimator,
        }
    }

    /// Inserts a `(key, value)` row. Empty keys are ignored.
    pub fn update(&mut self, key: &str, value: f64) {
        self.synopsis.update_key(key, value);
    }

    /// Inserts every `(key, value)` row.
    ///
    /// # Errors
    ///
    /// If `keys` and `values` have different lengths.
    pub fn update_all<S: AsRef<str>>(&mut self, keys: &[S], values: &[f64]) -> Result<(), Error> {
        self.synopsis.update_all(keys, values)
    }

    /// Returns the underlying synopsis.
    pub fn synopsis(&self) -> &Synopsis {
        &self.synopsis
    }

    /// Returns the default estimator used by [`correlation_to`](Self::correlation_to).
    pub fn estimator(&self) -> CorrelationType {
        self.estimator
    }

    /// Overrides the estimated number of distinct keys with a known value.
    pub fn set_cardinality(&mut self, cardinality: Option<usize>) {
        self.cardinality = cardinality;
    }

    /// Returns the known number of distinct keys if set, or the synopsis estimate otherwise.
    pub fn cardinality(&self) -> f64 {
        match self.cardinality {
            Some(cardinality) => cardinality as f64,
            None => self.synopsis.distinct_values(),
        }
    }

    /// Estimates the number of distinct keys in the union of both columns.
    pub fn union_size(&self, other: &CorrelationSketch) -> Result<f64, Error> {
        self.synopsis.union_size(&other.synopsis)
    }

    /// Estimates the number of distinct keys shared by both columns.
    pub fn intersection_size(&self, other: &CorrelationSketch) -> Result<f64, Error> {
        self.synopsis.intersection_size(&other.synopsis)
    }

    /// Estimates the Jaccard similarity of both key sets.
    pub fn jaccard(&self, other: &CorrelationSketch) -> Result<f64, Error> {
        self.synopsis.jaccard(&other.synopsis)
    }

    /// Estimates the fraction of this column's keys that also appear in `other`, relative to
    /// [`cardinality`](Self::cardinality).
    pub fn containment(&self, other: &CorrelationSketch) -> Result<f64, Error> {
        Ok(self.intersection_size(other)? / self.cardinality())
    }

    /// Estimates the correlation of both columns after a join on the key, using the default
    /// estimator of this sketch.
    pub fn correlation_to(&self, other: &CorrelationSketch) -> Result<Estimate, Error> {
        self.correlation_with(other, self.estimator)
    }

    /// Estimates the correlation of both columns after a join on the key.
    pub fn correlation_with(
        &self,
        other: &CorrelationSketch,
        estimator: CorrelationType,
    ) -> Result<Estimate, Error> {
        self.to_immutable()
            .correlation_with(&other.to_immutable(), estimator)
    }

    /// Freezes the retained entries into arrays sorted by key hash.
    pub fn to_immutable(&self) -> ImmutableCorrelationSketch {
        let entries = self.synopsis.entries();
        let keys = entries.iter().map(|e| e.key_hash()).collect();
        let values = entries.iter().map(|e| e.value()).collect();
        ImmutableCorrelationSketch::from_aligned(keys, values, self.estimator)
    }
}
