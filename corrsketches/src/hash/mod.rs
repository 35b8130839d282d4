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

//! Key hashing shared by sketches and index terms.
//!
//! Keys are hashed with the 32-bit MurmurHash3 over their UTF-8 bytes, using seed 0. The
//! resulting integer is the key's identity inside a sketch. Its rank inside a sketch is given by
//! the unit hash, a golden-ratio multiplicative mapping of the key hash into `[0, 1)`.

mod murmurhash;

use std::hash::Hasher;

pub(crate) use self::murmurhash::MurmurHash3X8632;

/// The inverse golden ratio, written out to full double precision.
const INVERSE_GOLDEN_RATIO: f64 = 0.618_033_988_749_894_9;

/// The golden ratio, `(sqrt(5) + 1) / 2`.
const GOLDEN_RATIO: f64 = INVERSE_GOLDEN_RATIO + 1.0;

/// Hashes a key string into the 32-bit key hash used as sketch identity.
pub fn hash_key(key: &str) -> i32 {
    let mut hasher = MurmurHash3X8632::default();
    hasher.write(key.as_bytes());
    hasher.finish32() as i32
}

/// Hashes a pair of 32-bit integers, each written in little-endian order.
///
/// Sign keys of the index layer are built as `hash_pair(key_hash, sign)`.
pub fn hash_pair(a: i32, b: i32) -> i32 {
    let mut hasher = MurmurHash3X8632::default();
    hasher.write(&a.to_le_bytes());
    hasher.write(&b.to_le_bytes());
    hasher.finish32() as i32
}

/// Maps a key hash into `[0, 1)` with the golden-ratio multiplicative hash
/// `frac((hash + 1) * phi)`.
pub fn unit_hash(hash: i32) -> f64 {
    let h = (hash as f64 + 1.0) * GOLDEN_RATIO;
    h - h.floor()
}
