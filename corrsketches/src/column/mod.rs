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

//! Keyed numeric columns and their storage.
//!
//! A [`ColumnPair`] is the unit of data the sketches summarize: a categorical key column and a
//! numeric column of the same table. [`ColumnCodec`] turns it into bytes and back, and a
//! [`ColumnStore`] keeps encoded columns addressable by [`ColumnPair::id`].

mod serialization;
mod store;

pub use self::serialization::ColumnCodec;
pub use self::store::ColumnStore;
pub use self::store::DEFAULT_CACHE_CAPACITY;
pub use self::store::MemoryColumnStore;

use std::fmt;
use std::hash::Hasher;

use crate::error::Error;
use crate::hash::MurmurHash3X8632;

/// A key column paired with a numeric column of the same table.
///
/// Identity is given by the dataset, key column and value column names; the values themselves
/// do not take part in [`id`](Self::id).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPair {
    dataset_id: String,
    key_name: String,
    key_values: Vec<String>,
    column_name: String,
    column_values: Vec<f64>,
}

impl ColumnPair {
    /// Creates a column pair.
    ///
    /// # Errors
    ///
    /// If `key_values` and `column_values` have different lengths.
    pub fn new(
        dataset_id: impl Into<String>,
        key_name: impl Into<String>,
        key_values: Vec<String>,
        column_name: impl Into<String>,
        column_values: Vec<f64>,
    ) -> Result<Self, Error> {
        if key_values.len() != column_values.len() {
            return Err(Error::invalid_argument(
                "key and value columns must have the same number of rows",
            )
            .with_context("keys.len", key_values.len())
            .with_context("values.len", column_values.len()));
        }
        Ok(ColumnPair {
            dataset_id: dataset_id.into(),
            key_name: key_name.into(),
            key_values,
            column_name: column_name.into(),
            column_values,
        })
    }

    /// Returns a column with the same names and new rows.
    pub(crate) fn with_rows(&self, key_values: Vec<String>, column_values: Vec<f64>) -> Self {
        debug_assert_eq!(key_values.len(), column_values.len());
        ColumnPair {
            dataset_id: self.dataset_id.clone(),
            key_name: self.key_name.clone(),
            key_values,
            column_name: self.column_name.clone(),
            column_values,
        }
    }

    /// Name of the dataset (table) the columns come from.
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Name of the key column.
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Rows of the key column.
    pub fn key_values(&self) -> &[String] {
        &self.key_values
    }

    /// Name of the numeric column.
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Rows of the numeric column.
    pub fn column_values(&self) -> &[f64] {
        &self.column_values
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.key_values.len()
    }

    /// Returns `true` if the columns have no rows.
    pub fn is_empty(&self) -> bool {
        self.key_values.is_empty()
    }

    /// Stable identifier derived from the dataset and both column names, as 8 hex digits.
    pub fn id(&self) -> String {
        let mut hasher = MurmurHash3X8632::default();
        for part in [&self.dataset_id, &self.key_name, &self.column_name] {
            hasher.write(&(part.len() as u32).to_le_bytes());
            hasher.write(part.as_bytes());
        }
        format!("{:08x}", hasher.finish32())
    }
}

impl fmt::Display for ColumnPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ColumnPair {{ dataset_id: {:?}, key_name: {:?}, column_name: {:?}, rows: {} }}",
            self.dataset_id,
            self.key_name,
            self.column_name,
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(dataset: &str, key: &str, value: &str) -> ColumnPair {
        ColumnPair::new(dataset, key, vec!["a".to_string()], value, vec![1.0]).unwrap()
    }

    #[test]
    fn test_id_depends_on_names_only() {
        let a = column("t1", "k", "v");
        let mut b = a.clone();
        b.column_values[0] = 42.0;
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id().len(), 8);

        assert_ne!(a.id(), column("t1", "k", "w").id());
        // name boundaries are part of the identity
        assert_ne!(column("t1", "kv", "").id(), column("t1", "k", "v").id());
    }

    #[test]
    fn test_length_mismatch() {
        let err = ColumnPair::new("t", "k", vec!["a".to_string()], "v", vec![]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_display() {
        insta::assert_snapshot!(column("t1", "k", "v").to_string(), @r#"ColumnPair { dataset_id: "t1", key_name: "k", column_name: "v", rows: 1 }"#);
    }
}
