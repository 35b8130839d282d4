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

use std::hash::Hasher;

const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

/// The 32-bit x86 variant of MurmurHash3.
///
/// Bytes are consumed in 4-byte little-endian blocks; a partial block is buffered until
/// more bytes arrive or the hash is finished.
#[derive(Debug)]
pub struct MurmurHash3X8632 {
    h1: u32,
    total: u32,
    buf: [u8; 4],
    buf_len: usize,
}

impl MurmurHash3X8632 {
    pub fn with_seed(seed: u32) -> Self {
        MurmurHash3X8632 {
            h1: seed,
            total: 0,
            buf: [0; 4],
            buf_len: 0,
        }
    }

    pub fn finish32(&self) -> u32 {
        let mut h1 = self.h1;
        let rem = self.buf_len;
        let total = self.total.wrapping_add(rem as u32);

        // tail
        if rem > 0 {
            let mut buf = [0u8; 4];
            buf[..rem].copy_from_slice(&self.buf[..rem]);
            h1 ^= mix_k1(u32::from_le_bytes(buf));
        }

        h1 ^= total;
        fmix32(h1)
    }

    #[inline]
    fn update(&mut self, k1: u32) {
        self.h1 ^= mix_k1(k1);
        self.h1 = self.h1.rotate_left(13);
        self.h1 = self.h1.wrapping_mul(5).wrapping_add(0xe6546b64);
        self.total = self.total.wrapping_add(4);
    }
}

impl Default for MurmurHash3X8632 {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Hasher for MurmurHash3X8632 {
    fn finish(&self) -> u64 {
        self.finish32() as u64
    }

    fn write(&mut self, mut bytes: &[u8]) {
        if self.buf_len + bytes.len() < 4 {
            self.buf[self.buf_len..self.buf_len + bytes.len()].copy_from_slice(bytes);
            self.buf_len += bytes.len();
            return;
        }

        if self.buf_len != 0 {
            let wanted = 4 - self.buf_len;
            self.buf[self.buf_len..].copy_from_slice(&bytes[..wanted]);
            self.update(u32::from_le_bytes(self.buf));
            bytes = &bytes[wanted..];
            self.buf_len = 0;
        }

        let mut blocks = bytes.chunks_exact(4);
        for block in &mut blocks {
            let mut word = [0u8; 4];
            word.copy_from_slice(block);
            self.update(u32::from_le_bytes(word));
        }

        let remainder = blocks.remainder();
        self.buf[..remainder.len()].copy_from_slice(remainder);
        self.buf_len = remainder.len();
    }
}

#[inline]
fn mix_k1(mut k1: u32) -> u32 {
    k1 = k1.wrapping_mul(C1);
    k1 = k1.rotate_left(15);
    k1.wrapping_mul(C2)
}

/// Finalization mix: force all bits of a hash block to avalanche.
#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^ (h >> 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn murmurhash3_x86_32(key: &[u8], seed: u32) -> u32 {
        let mut hasher = MurmurHash3X8632::with_seed(seed);
        hasher.write(key);
        hasher.finish32()
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(murmurhash3_x86_32(b"", 0), 0);
        assert_eq!(murmurhash3_x86_32(b"hello", 0), 0x248bfa47);
        assert_eq!(murmurhash3_x86_32(b"hello", 42), 0xe2dbd2e1);
        assert_eq!(
            murmurhash3_x86_32(b"The quick brown fox jumps over the lazy dog", 0),
            0x2e4ff723
        );
    }

    #[test]
    fn test_incremental_writes() {
        let key = b"The quick brown fox jumps over the lazy dog";
        let expected = murmurhash3_x86_32(key, 0);
        for split in 0..key.len() {
            let mut hasher = MurmurHash3X8632::default();
            hasher.write(&key[..split]);
            hasher.write(&key[split..]);
            assert_eq!(hasher.finish32(), expected, "split at {split}");
        }
    }
}
