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

use crate::kmv::ValueHash;

/// Arena of retained entries plus an index from key hash to arena slot.
///
/// Slots are never left empty: an evicted entry is overwritten in place by its replacement, so
/// `entries()` always holds exactly the retained entries.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryTable {
    entries: Vec<ValueHash>,
    slots: HashMap<i32, usize>,
}

impl EntryTable {
    pub fn with_capacity(capacity: usize) -> Self {
        EntryTable {
            entries: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ValueHash] {
        &self.entries
    }

    pub fn contains(&self, key_hash: i32) -> bool {
        self.slots.contains_key(&key_hash)
    }

    pub fn get_mut(&mut self, key_hash: i32) -> Option<&mut ValueHash> {
        let slot = *self.slots.get(&key_hash)?;
        Some(&mut self.entries[slot])
    }

    pub fn push(&mut self, entry: ValueHash) -> usize {
        let slot = self.entries.len();
        self.slots.insert(entry.key_hash(), slot);
        self.entries.push(entry);
        slot
    }

    /// Overwrites the entry at `slot`, dropping the old key from the index.
    pub fn replace(&mut self, slot: usize, entry: ValueHash) -> ValueHash {
        let evicted = std::mem::replace(&mut self.entries[slot], entry);
        self.slots.remove(&evicted.key_hash());
        self.slots.insert(entry.key_hash(), slot);
        evicted
    }

    /// Number of key hashes retained by both tables.
    pub fn intersection_count(&self, other: &EntryTable) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .entries
            .iter()
            .filter(|e| large.contains(e.key_hash()))
            .count()
    }

    /// Unit hashes of the union of both tables, deduplicated by key hash, in no particular order.
    pub fn union_unit_hashes(&self, other: &EntryTable) -> Vec<f64> {
        let mut hashes = Vec::with_capacity(self.len() + other.len());
        hashes.extend(self.entries.iter().map(ValueHash::unit_hash));
        hashes.extend(
            other
                .entries
                .iter()
                .filter(|e| !self.contains(e.key_hash()))
                .map(ValueHash::unit_hash),
        );
        hashes
    }
}
