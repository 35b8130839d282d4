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

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::column::ColumnCodec;
use crate::column::ColumnPair;
use crate::error::Error;

/// Default number of decoded columns kept by a [`MemoryColumnStore`].
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// A key-value store of encoded columns.
pub trait ColumnStore {
    /// Stores `column` under `id`, replacing any previous column with the same id.
    fn store(&self, id: &str, column: &ColumnPair) -> Result<(), Error>;

    /// Returns the column stored under `id`, if any.
    fn get(&self, id: &str) -> Result<Option<Arc<ColumnPair>>, Error>;
}

/// Decoded columns in insertion order. The oldest entry is evicted first.
#[derive(Debug, Default)]
struct DecodeCache {
    columns: HashMap<String, Arc<ColumnPair>>,
    order: VecDeque<String>,
}

impl DecodeCache {
    fn remove(&mut self, id: &str) {
        if self.columns.remove(id).is_some() {
            self.order.retain(|cached| cached != id);
        }
    }

    fn clear(&mut self) {
        self.columns.clear();
        self.order.clear();
    }

    /// Caches `column` unless another reader cached `id` first; returns the cached column.
    fn insert(&mut self, id: &str, column: Arc<ColumnPair>, capacity: usize) -> Arc<ColumnPair> {
        if capacity == 0 {
            return column;
        }
        if let Some(cached) = self.columns.get(id) {
            return cached.clone();
        }
        while self.columns.len() >= capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.columns.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(id.to_string());
        self.columns.insert(id.to_string(), column.clone());
        column
    }
}

/// An in-memory [`ColumnStore`].
///
/// Columns are kept encoded. Reads decode a column once and share it with later reads while it
/// stays in a bounded cache; the oldest decoded column is dropped when the cache is full.
#[derive(Debug)]
pub struct MemoryColumnStore {
    codec: ColumnCodec,
    cache_capacity: usize,
    encoded: RwLock<HashMap<String, Arc<Vec<u8>>>>,
    decoded: RwLock<DecodeCache>,
}

impl Default for MemoryColumnStore {
    fn default() -> Self {
        Self::new(ColumnCodec::default())
    }
}

impl MemoryColumnStore {
    /// Creates an empty store using `codec` and [`DEFAULT_CACHE_CAPACITY`].
    pub fn new(codec: ColumnCodec) -> Self {
        Self::with_cache_capacity(codec, DEFAULT_CACHE_CAPACITY)
    }

    /// Creates an empty store that keeps at most `capacity` decoded columns.
    ///
    /// A capacity of zero disables the cache; every read decodes.
    pub fn with_cache_capacity(codec: ColumnCodec, capacity: usize) -> Self {
        MemoryColumnStore {
            codec,
            cache_capacity: capacity,
            encoded: RwLock::new(HashMap::new()),
            decoded: RwLock::new(DecodeCache::default()),
        }
    }

    /// Number of stored columns.
    pub fn len(&self) -> usize {
        self.encoded.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.encoded.read().is_empty()
    }

    /// Returns the encoded size of the column stored under `id`.
    pub fn encoded_len(&self, id: &str) -> Option<usize> {
        self.encoded.read().get(id).map(|bytes| bytes.len())
    }

    /// Number of decoded columns currently cached.
    pub fn cached_len(&self) -> usize {
        self.decoded.read().columns.len()
    }

    /// Drops every decoded column. Stored columns are kept.
    pub fn clear_cache(&self) {
        self.decoded.write().clear();
    }
}

impl ColumnStore for MemoryColumnStore {
    fn store(&self, id: &str, column: &ColumnPair) -> Result<(), Error> {
        let bytes = Arc::new(self.codec.encode(column));
        // hold the cache lock across the write so readers never see a stale decoded column
        let mut decoded = self.decoded.write();
        decoded.remove(id);
        self.encoded.write().insert(id.to_string(), bytes);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Arc<ColumnPair>>, Error> {
        if let Some(column) = self.decoded.read().columns.get(id) {
            return Ok(Some(column.clone()));
        }

        let Some(bytes) = self.encoded.read().get(id).cloned() else {
            return Ok(None);
        };
        let column = Arc::new(self.codec.decode(&bytes)?);

        let mut decoded = self.decoded.write();
        // a concurrent store replaced the bytes; hand out what was read without caching it
        let current = self.encoded.read().get(id).is_some_and(|b| Arc::ptr_eq(b, &bytes));
        if !current {
            return Ok(Some(column));
        }
        Ok(Some(decoded.insert(id, column, self.cache_capacity)))
    }
}
