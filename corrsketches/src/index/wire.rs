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

//! Binary layout of sketch arrays in stored fields: key hashes as 4-byte big-endian integers and
//! values as 8-byte big-endian IEEE-754 doubles, densely packed.

use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::error::Error;

const KEY_BYTES: usize = 4;
const VALUE_BYTES: usize = 8;

pub(crate) fn encode_keys(keys: &[i32]) -> Vec<u8> {
    let mut bytes = SketchBytes::with_capacity(keys.len() * KEY_BYTES);
    for &key in keys {
        bytes.write_i32_be(key);
    }
    bytes.into_bytes()
}

pub(crate) fn encode_values(values: &[f64]) -> Vec<u8> {
    let mut bytes = SketchBytes::with_capacity(values.len() * VALUE_BYTES);
    for &value in values {
        bytes.write_f64_be(value);
    }
    bytes.into_bytes()
}

pub(crate) fn decode_keys(bytes: &[u8]) -> Result<Vec<i32>, Error> {
    ensure_multiple_of("keys", bytes.len(), KEY_BYTES)?;
    let mut slice = SketchSlice::new(bytes);
    (0..bytes.len() / KEY_BYTES)
        .map(|_| slice.read_i32_be().map_err(|_| corrupt("keys", bytes.len())))
        .collect()
}

pub(crate) fn decode_values(bytes: &[u8]) -> Result<Vec<f64>, Error> {
    ensure_multiple_of("values", bytes.len(), VALUE_BYTES)?;
    let mut slice = SketchSlice::new(bytes);
    (0..bytes.len() / VALUE_BYTES)
        .map(|_| slice.read_f64_be().map_err(|_| corrupt("values", bytes.len())))
        .collect()
}

fn ensure_multiple_of(field: &'static str, len: usize, width: usize) -> Result<(), Error> {
    if len % width == 0 {
        Ok(())
    } else {
        Err(corrupt(field, len))
    }
}

fn corrupt(field: &'static str, len: usize) -> Error {
    Error::backend(format!("corrupt stored field: {field}")).with_context("len", len)
}
