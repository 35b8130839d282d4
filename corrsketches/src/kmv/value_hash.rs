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

use crate::aggregate::Aggregate;
use crate::aggregate::AggregateFunction;

/// One retained sketch entry: a key hash, its unit hash and the aggregated value of every row
/// that carried the key.
///
/// Two entries are the same logical key when their key hashes are equal, even if they were
/// produced by different key strings.
#[derive(Debug, Clone, Copy)]
pub struct ValueHash {
    key_hash: i32,
    unit_hash: f64,
    aggregate: Aggregate,
}

impl ValueHash {
    pub(crate) fn new(
        key_hash: i32,
        unit_hash: f64,
        value: f64,
        function: AggregateFunction,
    ) -> Self {
        ValueHash {
            key_hash,
            unit_hash,
            aggregate: function.start(value),
        }
    }

    pub(crate) fn update(&mut self, value: f64) {
        self.aggregate.update(value);
    }

    /// Returns the 32-bit hash of the key.
    pub fn key_hash(&self) -> i32 {
        self.key_hash
    }

    /// Returns the key hash mapped into `[0, 1)`.
    pub fn unit_hash(&self) -> f64 {
        self.unit_hash
    }

    /// Returns the aggregated value.
    pub fn value(&self) -> f64 {
        self.aggregate.value()
    }
}

impl PartialEq for ValueHash {
    fn eq(&self, other: &Self) -> bool {
        self.key_hash == other.key_hash
    }
}

impl Eq for ValueHash {}
