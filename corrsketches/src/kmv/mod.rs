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

//! Min-value synopses of a keyed column.
//!
//! A synopsis hashes every key into the unit interval and keeps only the entries with the
//! smallest unit hashes, together with the aggregated value of each retained key. Two
//! policies are provided:
//!
//! - [`Kmv`] keeps the `k` smallest unit hashes (bottom-k).
//! - [`Gkmv`] keeps every unit hash below a fixed threshold.
//!
//! Both support cardinality, union, intersection, Jaccard and containment estimates through
//! the [`MinValueSketch`] trait. [`Synopsis`] chooses between them at runtime.

mod bottom_k;
mod entries;
mod options;
mod threshold;
mod value_hash;

pub use self::bottom_k::DEFAULT_K;
pub use self::bottom_k::Kmv;
pub use self::bottom_k::KmvBuilder;
pub use self::options::SketchOptions;
pub use self::options::SketchType;
pub use self::threshold::DEFAULT_THRESHOLD;
pub use self::threshold::Gkmv;
pub use self::threshold::GkmvBuilder;
pub use self::value_hash::ValueHash;

use crate::aggregate::AggregateFunction;
use crate::error::Error;
use crate::hash::hash_key;

/// Operations shared by every min-value synopsis.
///
/// Set statistics take another synopsis of the same concrete type and fail with
/// [`ErrorKind::EmptySketch`](crate::error::ErrorKind::EmptySketch) when either side retains
/// no entries.
pub trait MinValueSketch {
    /// Inserts a value under an already hashed key, aggregating with any earlier value of the
    /// same key.
    fn update(&mut self, key_hash: i32, value: f64);

    /// Returns the retained entries, in no particular order.
    fn entries(&self) -> &[ValueHash];

    /// Returns the largest retained unit hash, or `0.0` if nothing is retained.
    fn kth_value(&self) -> f64;

    /// Estimates the number of distinct keys in the union of both synopses.
    fn union_size(&self, other: &Self) -> Result<f64, Error>;

    /// Estimates the number of distinct keys shared by both synopses.
    fn intersection_size(&self, other: &Self) -> Result<f64, Error>;

    /// Estimates the Jaccard similarity of both key sets.
    fn jaccard(&self, other: &Self) -> Result<f64, Error>;

    /// Hashes the key and inserts the value. Empty keys are ignored.
    fn update_key(&mut self, key: &str, value: f64) {
        if !key.is_empty() {
            self.update(hash_key(key), value);
        }
    }

    /// Inserts every `(key, value)` pair.
    ///
    /// # Errors
    ///
    /// If `keys` and `values` have different lengths. Nothing is inserted in that case.
    fn update_all<S: AsRef<str>>(&mut self, keys: &[S], values: &[f64]) -> Result<(), Error> {
        check_lengths(keys.len(), values.len())?;
        for (key, value) in keys.iter().zip(values) {
            self.update_key(key.as_ref(), *value);
        }
        Ok(())
    }

    /// Inserts every `(key_hash, value)` pair.
    ///
    /// # Errors
    ///
    /// If `key_hashes` and `values` have different lengths.
    fn update_all_hashed(&mut self, key_hashes: &[i32], values: &[f64]) -> Result<(), Error> {
        check_lengths(key_hashes.len(), values.len())?;
        for (key_hash, value) in key_hashes.iter().zip(values) {
            self.update(*key_hash, *value);
        }
        Ok(())
    }

    /// Returns the number of retained entries.
    fn num_retained(&self) -> usize {
        self.entries().len()
    }

    /// Unbiased estimate of the number of distinct keys: `(n - 1) / kth_value`.
    fn distinct_values(&self) -> f64 {
        (self.num_retained() as f64 - 1.0) / self.kth_value()
    }

    /// Basic (biased) estimate of the number of distinct keys: `n / kth_value`.
    fn distinct_values_be(&self) -> f64 {
        self.num_retained() as f64 / self.kth_value()
    }

    /// Estimates the fraction of this synopsis' keys that also appear in `other`.
    fn containment(&self, other: &Self) -> Result<f64, Error> {
        Ok(self.intersection_size(other)? / self.distinct_values())
    }
}

fn check_lengths(keys: usize, values: usize) -> Result<(), Error> {
    if keys != values {
        return Err(Error::invalid_argument(
            "keys and values must have the same number of elements",
        )
        .with_context("keys.len", keys)
        .with_context("values.len", values));
    }
    Ok(())
}

/// A min-value synopsis whose policy is chosen at runtime.
#[derive(Debug, Clone)]
pub enum Synopsis {
    /// Bottom-k policy.
    Kmv(Kmv),
    /// Threshold policy.
    Gkmv(Gkmv),
}

impl Synopsis {
    /// Builds an empty synopsis from options.
    ///
    /// # Errors
    ///
    /// If the budget is outside the valid range of the sketch type.
    pub fn new(options: SketchOptions, function: AggregateFunction) -> Result<Self, Error> {
        match options {
            SketchOptions::Kmv { k } => Kmv::builder()
                .k(k)
                .aggregate(function)
                .build()
                .map(Synopsis::Kmv),
            SketchOptions::Gkmv { t } => Gkmv::builder()
                .threshold(t)
                .aggregate(function)
                .build()
                .map(Synopsis::Gkmv),
        }
    }

    /// Returns the sketch type of this synopsis.
    pub fn sketch_type(&self) -> SketchType {
        match self {
            Synopsis::Kmv(_) => SketchType::Kmv,
            Synopsis::Gkmv(_) => SketchType::Gkmv,
        }
    }

    fn with_same_type<T>(
        &self,
        other: &Synopsis,
        kmv: impl FnOnce(&Kmv, &Kmv) -> Result<T, Error>,
        gkmv: impl FnOnce(&Gkmv, &Gkmv) -> Result<T, Error>,
    ) -> Result<T, Error> {
        match (self, other) {
            (Synopsis::Kmv(a), Synopsis::Kmv(b)) => kmv(a, b),
            (Synopsis::Gkmv(a), Synopsis::Gkmv(b)) => gkmv(a, b),
            (a, b) => Err(Error::invalid_argument(
                "can not compare synopses of different types",
            )
            .with_context("x.type", a.sketch_type())
            .with_context("y.type", b.sketch_type())),
        }
    }
}

impl MinValueSketch for Synopsis {
    fn update(&mut self, key_hash: i32, value: f64) {
        match self {
            Synopsis::Kmv(s) => s.update(key_hash, value),
            Synopsis::Gkmv(s) => s.update(key_hash, value),
        }
    }

    fn entries(&self) -> &[ValueHash] {
        match self {
            Synopsis::Kmv(s) => s.entries(),
            Synopsis::Gkmv(s) => s.entries(),
        }
    }

    fn kth_value(&self) -> f64 {
        match self {
            Synopsis::Kmv(s) => s.kth_value(),
            Synopsis::Gkmv(s) => s.kth_value(),
        }
    }

    fn union_size(&self, other: &Self) -> Result<f64, Error> {
        self.with_same_type(other, Kmv::union_size, Gkmv::union_size)
    }

    fn intersection_size(&self, other: &Self) -> Result<f64, Error> {
        self.with_same_type(other, Kmv::intersection_size, Gkmv::intersection_size)
    }

    fn jaccard(&self, other: &Self) -> Result<f64, Error> {
        self.with_same_type(other, Kmv::jaccard, Gkmv::jaccard)
    }

    fn containment(&self, other: &Self) -> Result<f64, Error> {
        self.with_same_type(other, Kmv::containment, Gkmv::containment)
    }
}
