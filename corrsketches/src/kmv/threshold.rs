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

use crate::aggregate::AggregateFunction;
use crate::error::Error;
use crate::hash::unit_hash;
use crate::kmv::MinValueSketch;
use crate::kmv::ValueHash;
use crate::kmv::entries::EntryTable;

/// Default unit-hash threshold of a [`Gkmv`] sketch.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Threshold synopsis (GKMV) retaining every entry whose unit hash is at most `t`.
///
/// Unlike [`Kmv`](crate::kmv::Kmv) the number of retained entries depends on the input: a
/// column with `n` distinct keys keeps roughly `t * n` of them.
///
/// Set statistics between two GKMV synopses assume both were built with the same threshold.
/// Mixing thresholds is not detected and yields biased estimates.
#[derive(Debug, Clone)]
pub struct Gkmv {
    threshold: f64,
    function: AggregateFunction,
    table: EntryTable,
    kth_value: f64,
}

impl Gkmv {
    /// Create a new builder for Gkmv
    pub fn builder() -> GkmvBuilder {
        GkmvBuilder::default()
    }

    /// Returns the unit-hash threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the aggregate function applied to duplicate keys.
    pub fn aggregate_function(&self) -> AggregateFunction {
        self.function
    }

    // the union of two threshold synopses is itself a threshold synopsis
    fn compute_k(&self, other: &Gkmv) -> Result<usize, Error> {
        if self.table.is_empty() || other.table.is_empty() {
            return Err(Error::empty_sketch(self.table.len(), other.table.len()));
        }
        Ok(self.table.union_unit_hashes(&other.table).len())
    }
}

impl MinValueSketch for Gkmv {
    fn update(&mut self, key_hash: i32, value: f64) {
        if let Some(entry) = self.table.get_mut(key_hash) {
            entry.update(value);
            return;
        }

        let hu = unit_hash(key_hash);
        if hu <= self.threshold {
            self.table.push(ValueHash::new(key_hash, hu, value, self.function));
            if hu > self.kth_value {
                self.kth_value = hu;
            }
        }
    }

    fn entries(&self) -> &[ValueHash] {
        self.table.entries()
    }

    fn kth_value(&self) -> f64 {
        self.kth_value
    }

    fn union_size(&self, other: &Self) -> Result<f64, Error> {
        let k = self.compute_k(other)?;
        let kth_value = self.kth_value.max(other.kth_value);
        Ok((k as f64 - 1.0) / kth_value)
    }

    fn intersection_size(&self, other: &Self) -> Result<f64, Error> {
        let k = self.compute_k(other)?;
        let p = self.table.intersection_count(&other.table) as f64 / k as f64;
        let u = (k as f64 - 1.0) / self.kth_value.max(other.kth_value);
        Ok(p * u)
    }

    fn jaccard(&self, other: &Self) -> Result<f64, Error> {
        let k = self.compute_k(other)?;
        Ok(self.table.intersection_count(&other.table) as f64 / k as f64)
    }
}

/// Builder for Gkmv
#[derive(Debug, Clone, Copy)]
pub struct GkmvBuilder {
    threshold: f64,
    function: AggregateFunction,
}

impl Default for GkmvBuilder {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            function: AggregateFunction::First,
        }
    }
}

impl GkmvBuilder {
    /// Set the unit-hash threshold. Must be in `(0, 1]`.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the aggregate function applied to duplicate keys.
    pub fn aggregate(mut self, function: AggregateFunction) -> Self {
        self.function = function;
        self
    }

    /// Build the Gkmv.
    ///
    /// # Errors
    ///
    /// If the threshold is not in `(0, 1]`.
    pub fn build(self) -> Result<Gkmv, Error> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(Error::invalid_argument("threshold must be in the range (0, 1]")
                .with_context("t", self.threshold));
        }
        Ok(Gkmv {
            threshold: self.threshold,
            function: self.function,
            table: EntryTable::default(),
            kth_value: 0.0,
        })
    }
}
