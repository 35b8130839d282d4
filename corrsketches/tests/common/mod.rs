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

#![allow(dead_code)]

use corrsketches::column::ColumnPair;
use rand::Rng;
use rand::rngs::StdRng;

pub fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

pub fn column(dataset: &str, key_values: &[&str], values: &[f64]) -> ColumnPair {
    ColumnPair::new(
        dataset,
        format!("fk_{dataset}"),
        keys(key_values),
        format!("values_{dataset}"),
        values.to_vec(),
    )
    .unwrap()
}

/// An anonymous column, for tests that only care about keys and values.
pub fn unnamed_column(key_values: &[&str], values: &[f64]) -> ColumnPair {
    ColumnPair::new("", "", keys(key_values), "", values.to_vec()).unwrap()
}

/// Exponentially distributed sample with rate 1.
pub fn exponential(rng: &mut StdRng) -> f64 {
    -(1.0 - rng.random::<f64>()).ln()
}
