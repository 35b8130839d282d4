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

//! Binary encoding of column pairs.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! byte 0      serial version
//! byte 1      format id
//! ...         dataset id, key name, column name: u32 byte length + UTF-8 bytes each
//! u32         number of rows
//! ...         keys: u32 byte length + UTF-8 bytes each
//! ...         values: f64 each
//! ```

use std::io;

use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::codec::assert::ensure_format_is;
use crate::codec::assert::ensure_serial_version_is;
use crate::codec::assert::insufficient_data;
use crate::column::ColumnPair;
use crate::error::Error;

const SERIAL_VERSION: u8 = 1;
const FORMAT_ID: u8 = 0x43;

/// Encodes and decodes [`ColumnPair`]s.
///
/// The codec holds no state; stores receive an instance instead of reaching for a global one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnCodec;

impl ColumnCodec {
    /// Creates a new codec.
    pub fn new() -> Self {
        ColumnCodec
    }

    /// Encodes a column pair.
    pub fn encode(&self, column: &ColumnPair) -> Vec<u8> {
        let names = [&column.dataset_id, &column.key_name, &column.column_name];
        let strings: usize = names
            .into_iter()
            .chain(&column.key_values)
            .map(|s| 4 + s.len())
            .sum();
        let mut bytes = SketchBytes::with_capacity(6 + strings + 8 * column.len());

        bytes.write_u8(SERIAL_VERSION);
        bytes.write_u8(FORMAT_ID);
        bytes.write_str(&column.dataset_id);
        bytes.write_str(&column.key_name);
        bytes.write_str(&column.column_name);
        bytes.write_u32_le(column.len() as u32);
        for key in &column.key_values {
            bytes.write_str(key);
        }
        for value in &column.column_values {
            bytes.write_f64_le(*value);
        }
        bytes.into_bytes()
    }

    /// Decodes a column pair produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// If the bytes are truncated, carry trailing data, an unknown version or format, or
    /// strings that are not valid UTF-8.
    pub fn decode(&self, bytes: &[u8]) -> Result<ColumnPair, Error> {
        let mut cursor = SketchSlice::new(bytes);

        let serial_version = cursor.read_u8().map_err(insufficient_data("serial_version"))?;
        ensure_serial_version_is(SERIAL_VERSION, serial_version)?;
        let format_id = cursor.read_u8().map_err(insufficient_data("format_id"))?;
        ensure_format_is("column pair", FORMAT_ID, format_id)?;

        let dataset_id = read_string(&mut cursor, "dataset_id")?;
        let key_name = read_string(&mut cursor, "key_name")?;
        let column_name = read_string(&mut cursor, "column_name")?;
        let rows = cursor.read_u32_le().map_err(insufficient_data("rows"))? as usize;

        // every row needs at least 12 bytes: an empty key and its value
        if rows.saturating_mul(12) > cursor.remaining() {
            return Err(Error::insufficient_data("rows").with_context("rows", rows));
        }
        let mut key_values = Vec::with_capacity(rows);
        for _ in 0..rows {
            key_values.push(read_string(&mut cursor, "key_values")?);
        }
        let mut column_values = Vec::with_capacity(rows);
        for _ in 0..rows {
            column_values.push(
                cursor
                    .read_f64_le()
                    .map_err(insufficient_data("column_values"))?,
            );
        }

        if cursor.remaining() > 0 {
            return Err(Error::deserial("trailing bytes after column pair")
                .with_context("remaining", cursor.remaining()));
        }

        ColumnPair::new(dataset_id, key_name, key_values, column_name, column_values)
    }
}

fn read_string(cursor: &mut SketchSlice<'_>, tag: &'static str) -> Result<String, Error> {
    cursor.read_str().map_err(|err| match err.kind() {
        io::ErrorKind::InvalidData => {
            Error::deserial(format!("invalid UTF-8 in {tag}")).with_context("cause", err)
        }
        _ => Error::insufficient_data(tag),
    })
}
