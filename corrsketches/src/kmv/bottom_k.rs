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
use std::collections::BinaryHeap;

use crate::aggregate::AggregateFunction;
use crate::error::Error;
use crate::hash::unit_hash;
use crate::kmv::MinValueSketch;
use crate::kmv::ValueHash;
use crate::kmv::entries::EntryTable;

/// Default number of minimum values retained by a [`Kmv`] sketch.
pub const DEFAULT_K: usize = 256;

/// Bottom-k synopsis (KMV) retaining the `k` entries with the smallest unit hashes.
///
/// Implements the KMV synopsis from "On Synopses for Distinct-Value Estimation Under Multiset
/// Operations" by Beyer et al., SIGMOD 2007.
///
/// # Examples
///
/// ```
/// # use corrsketches::kmv::Kmv;
/// # use corrsketches::kmv::MinValueSketch;
/// let mut sketch = Kmv::builder().k(4).build().unwrap();
/// for (i, key) in ["a", "b", "c", "d", "e", "f"].iter().enumerate() {
///     sketch.update_key(key, i as f64);
/// }
/// assert_eq!(sketch.num_retained(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Kmv {
    k: usize,
    function: AggregateFunction,
    table: EntryTable,
    // max-heap over the retained unit hashes; its top is the eviction candidate
    heap: BinaryHeap<Ranked>,
    kth_value: f64,
}

impl Kmv {
    /// Create a new builder for Kmv
    pub fn builder() -> KmvBuilder {
        KmvBuilder::default()
    }

    /// Returns the maximum number of retained entries.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the aggregate function applied to duplicate keys.
    pub fn aggregate_function(&self) -> AggregateFunction {
        self.function
    }

    fn compute_k(&self, other: &Kmv) -> Result<usize, Error> {
        let k = self.table.len().min(other.table.len());
        if k < 1 {
            return Err(Error::empty_sketch(self.table.len(), other.table.len()));
        }
        Ok(k)
    }

    /// The k-th smallest unit hash of the union of both synopses.
    fn kth_value_of_union(&self, other: &Kmv, k: usize) -> f64 {
        let mut hashes = self.table.union_unit_hashes(&other.table);
        let (_, kth, _) = hashes.select_nth_unstable_by(k - 1, f64::total_cmp);
        *kth
    }
}

impl MinValueSketch for Kmv {
    fn update(&mut self, key_hash: i32, value: f64) {
        if let Some(entry) = self.table.get_mut(key_hash) {
            entry.update(value);
            return;
        }

        let hu = unit_hash(key_hash);
        let entry = ValueHash::new(key_hash, hu, value, self.function);
        if self.table.len() < self.k {
            let slot = self.table.push(entry);
            self.heap.push(Ranked::new(&entry, slot));
            if hu > self.kth_value {
                self.kth_value = hu;
            }
        } else if hu < self.kth_value {
            let Some(top) = self.heap.pop() else {
                return;
            };
            self.table.replace(top.slot, entry);
            self.heap.push(Ranked::new(&entry, top.slot));
            if let Some(max) = self.heap.peek() {
                self.kth_value = max.unit_hash;
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
        let kth_value = self.kth_value_of_union(other, k);
        Ok((k as f64 - 1.0) / kth_value)
    }

    fn intersection_size(&self, other: &Self) -> Result<f64, Error> {
        let k = self.compute_k(other)?;
        // p is an unbiased estimate of the jaccard similarity
        let p = self.table.intersection_count(&other.table) as f64 / k as f64;
        let u = (k as f64 - 1.0) / self.kth_value_of_union(other, k);
        Ok(p * u)
    }

    fn jaccard(&self, other: &Self) -> Result<f64, Error> {
        let k = self.compute_k(other)?;
        Ok(self.table.intersection_count(&other.table) as f64 / k as f64)
    }
}

/// Builder for Kmv
#[derive(Debug, Clone, Copy)]
pub struct KmvBuilder {
    k: usize,
    function: AggregateFunction,
}

impl Default for KmvBuilder {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            function: AggregateFunction::First,
        }
    }
}

impl KmvBuilder {
    /// Set the maximum number of retained entries. Must be at least 1.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the aggregate function applied to duplicate keys.
    pub fn aggregate(mut self, function: AggregateFunction) -> Self {
        self.function = function;
        self
    }

    /// Build the Kmv.
    ///
    /// # Errors
    ///
    /// If k is smaller than 1.
    pub fn build(self) -> Result<Kmv, Error> {
        if self.k < 1 {
            return Err(Error::invalid_argument(
                "minimum k size is 1, but larger is recommended",
            )
            .with_context("k", self.k));
        }
        // k is a budget, not a promise of input size
        let capacity = self.k.min(4096);
        Ok(Kmv {
            k: self.k,
            function: self.function,
            table: EntryTable::with_capacity(capacity),
            heap: BinaryHeap::with_capacity(capacity),
            kth_value: 0.0,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Ranked {
    unit_hash: f64,
    key_hash: i32,
    slot: usize,
}

impl Ranked {
    fn new(entry: &ValueHash, slot: usize) -> Self {
        Ranked {
            unit_hash: entry.unit_hash(),
            key_hash: entry.key_hash(),
            slot,
        }
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.unit_hash
            .total_cmp(&other.unit_hash)
            .then(self.key_hash.cmp(&other.key_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_key;

    #[test]
    fn test_retains_smallest_unit_hashes() {
        let mut sketch = Kmv::builder().k(8).build().unwrap();
        let mut all = Vec::new();
        for i in 0..100 {
            let key = format!("key-{i}");
            sketch.update_key(&key, i as f64);
            all.push(unit_hash(hash_key(&key)));
        }
        all.sort_by(f64::total_cmp);

        let mut retained: Vec<f64> = sketch.entries().iter().map(|e| e.unit_hash()).collect();
        retained.sort_by(f64::total_cmp);
        assert_eq!(retained, all[..8].to_vec());
        assert_eq!(sketch.kth_value(), all[7]);
    }

    #[test]
    fn test_duplicate_key_when_full_only_aggregates() {
        let mut sketch = Kmv::builder()
            .k(3)
            .aggregate(AggregateFunction::Sum)
            .build()
            .unwrap();
        for key in ["a", "b", "c", "d", "e", "f", "g"] {
            sketch.update_key(key, 1.0);
        }
        let before: Vec<i32> = sketch.entries().iter().map(|e| e.key_hash()).collect();
        let kth = sketch.kth_value();

        for e in before.clone() {
            sketch.update(e, 1.0);
        }
        let after: Vec<i32> = sketch.entries().iter().map(|e| e.key_hash()).collect();
        assert_eq!(before, after);
        assert_eq!(sketch.kth_value(), kth);
        assert!(sketch.entries().iter().all(|e| e.value() == 2.0));
    }

    #[test]
    fn test_invalid_k() {
        assert!(Kmv::builder().k(0).build().is_err());
    }
}
