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

use std::cmp::Ordering;
use std::fmt;

use crate::common::sort_by_key_slice;
use crate::correlation::CorrelationType;
use crate::correlation::Estimate;
use crate::error::Error;

/// A frozen correlation sketch: key hashes in ascending order with their aligned values.
///
/// This is the form used to pair two sketches by key with a linear merge join.
#[derive(Debug, Clone, PartialEq)]
pub struct ImmutableCorrelationSketch {
    keys: Vec<i32>,
    values: Vec<f64>,
    estimator: CorrelationType,
}

impl ImmutableCorrelationSketch {
    /// Creates a sketch from unsorted key hashes and values, sorting both by key hash.
    ///
    /// # Errors
    ///
    /// [`DimensionMismatch`](crate::error::ErrorKind::DimensionMismatch) if `keys` and `values`
    /// have different lengths.
    pub fn from_parts(
        keys: Vec<i32>,
        values: Vec<f64>,
        estimator: CorrelationType,
    ) -> Result<Self, Error> {
        if keys.len() != values.len() {
            return Err(Error::dimension_mismatch(keys.len(), values.len()));
        }
        Ok(Self::from_aligned(keys, values, estimator))
    }

    /// Same as [`from_parts`](Self::from_parts) for parts already known to be aligned.
    pub(crate) fn from_aligned(
        mut keys: Vec<i32>,
        mut values: Vec<f64>,
        estimator: CorrelationType,
    ) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        sort_by_key_slice(&mut keys, &mut values, Ord::cmp);
        ImmutableCorrelationSketch {
            keys,
            values,
            estimator,
        }
    }

    /// Returns the key hashes, in ascending order.
    pub fn keys(&self) -> &[i32] {
        &self.keys
    }

    /// Returns the values aligned with [`keys`](Self::keys).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the default estimator of this sketch.
    pub fn estimator(&self) -> CorrelationType {
        self.estimator
    }

    /// Returns the number of retained entries.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no entries are retained.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Pairs the values of both sketches that share a key hash, in ascending key order.
    pub fn intersection(&self, other: &ImmutableCorrelationSketch) -> Paired {
        let capacity = self.len().min(other.len());
        let mut paired = Paired {
            keys: Vec::with_capacity(capacity),
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
        };
        let (mut i, mut j) = (0, 0);
        while i < self.keys.len() && j < other.keys.len() {
            match self.keys[i].cmp(&other.keys[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    paired.keys.push(self.keys[i]);
                    paired.x.push(self.values[i]);
                    paired.y.push(other.values[j]);
                    i += 1;
                    j += 1;
                }
            }
        }
        paired
    }

    /// Estimates the join correlation with `other` using the default estimator of this sketch.
    pub fn correlation_to(&self, other: &ImmutableCorrelationSketch) -> Result<Estimate, Error> {
        self.correlation_with(other, self.estimator)
    }

    /// Estimates the join correlation with `other` using `estimator`.
    pub fn correlation_with(
        &self,
        other: &ImmutableCorrelationSketch,
        estimator: CorrelationType,
    ) -> Result<Estimate, Error> {
        let paired = self.intersection(other);
        estimator.estimate(&paired.x, &paired.y)
    }
}

/// Values of two sketches paired by shared key hash.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paired {
    /// Shared key hashes, in ascending order.
    pub keys: Vec<i32>,
    /// Values of the first sketch.
    pub x: Vec<f64>,
    /// Values of the second sketch.
    pub y: Vec<f64>,
}

impl Paired {
    /// Returns the number of paired keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the sketches share no key.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Display for Paired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Paired {{ keys: {:?}, x: {:?}, y: {:?} }}", self.keys, self.x, self.y)
    }
}
