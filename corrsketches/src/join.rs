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

//! Exact join aggregation.
//!
//! These functions materialize the join that sketches only estimate. They provide the ground
//! truth against which sketch estimates are compared.

use std::collections::HashMap;

use crate::aggregate::AggregateFunction;
use crate::column::ColumnPair;

/// Values of two columns aligned by join key and folded with one aggregate function.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericJoinAggregation {
    /// Aggregated values of the left column, one per joined key.
    pub values_a: Vec<f64>,
    /// Aggregated values of the right column, aligned with `values_a`.
    pub values_b: Vec<f64>,
    /// The function both sides were aggregated with.
    pub function: AggregateFunction,
}

/// Groups the rows of `column` by key and folds each group with every function in `functions`.
///
/// Returns one column per function, in the same order as `functions`. Keys appear once each, in
/// the order of their first occurrence in `column`.
pub fn aggregate_column_pair(
    column: &ColumnPair,
    functions: &[AggregateFunction],
) -> Vec<ColumnPair> {
    let groups = group_by_key(column);
    let keys: Vec<String> = groups.iter().map(|(key, _)| key.to_string()).collect();

    functions
        .iter()
        .map(|function| {
            let values = groups
                .iter()
                .map(|(_, rows)| function.aggregate(rows))
                .collect();
            column.with_rows(keys.clone(), values)
        })
        .collect()
}

/// Joins `a` and `b` on their keys and aggregates both sides with each function.
///
/// Each key of `a` is first reduced to a single value; the rows of `b` sharing that key are then
/// folded with the same function. Keys of `a` absent from `b` are dropped. The result holds one
/// [`NumericJoinAggregation`] per function, in the same order as `functions`.
pub fn numeric_join_aggregate(
    a: &ColumnPair,
    b: &ColumnPair,
    functions: &[AggregateFunction],
) -> Vec<NumericJoinAggregation> {
    let index_b: HashMap<&str, Vec<f64>> = group_by_key(b).into_iter().collect();
    let aggregated_a = aggregate_column_pair(a, functions);

    functions
        .iter()
        .zip(&aggregated_a)
        .map(|(&function, column)| {
            let mut values_a = Vec::with_capacity(column.len());
            let mut values_b = Vec::with_capacity(column.len());
            for (key, &value) in column.key_values().iter().zip(column.column_values()) {
                if let Some(rows) = index_b.get(key.as_str()) {
                    values_a.push(value);
                    values_b.push(function.aggregate(rows));
                }
            }
            NumericJoinAggregation {
                values_a,
                values_b,
                function,
            }
        })
        .collect()
}

fn group_by_key(column: &ColumnPair) -> Vec<(&str, Vec<f64>)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();
    for (key, &value) in column.key_values().iter().zip(column.column_values()) {
        let slot = *positions.entry(key.as_str()).or_insert_with(|| {
            groups.push((key.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(value);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_key_keeps_first_occurrence_order() {
        let keys = ["d", "a", "d", "b", "a"].map(String::from).to_vec();
        let column = ColumnPair::new("t", "k", keys, "v", vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let groups = group_by_key(&column);
        assert_eq!(
            groups,
            vec![
                ("d", vec![1.0, 3.0]),
                ("a", vec![2.0, 5.0]),
                ("b", vec![4.0])
            ]
        );
    }
}
