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

use crate::hash::hash_pair;
use crate::statistics::mean;
use crate::statistics::std;

/// Index terms combining each key hash with the sign of its standardized value.
///
/// The sign is `+1` above the mean, `-1` below it and `0` otherwise, which includes every entry
/// of a constant column.
pub(crate) fn sign_keys(keys: &[i32], values: &[f64]) -> Vec<i32> {
    debug_assert_eq!(keys.len(), values.len());
    let mean = mean(values);
    let std = std(values);
    keys.iter()
        .zip(values)
        .map(|(&key, &value)| hash_pair(key, sign((value - mean) / std)))
        .collect()
}

/// Sign keys of the column with every value negated.
pub(crate) fn negated_sign_keys(keys: &[i32], values: &[f64]) -> Vec<i32> {
    let negated: Vec<f64> = values.iter().map(|v| -v).collect();
    sign_keys(keys, &negated)
}

fn sign(q: f64) -> i32 {
    if q > 0.0 {
        1
    } else if q < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_keys() {
        let keys = [10, 20, 30];
        let keys_pos = sign_keys(&keys, &[1.0, 2.0, 3.0]);
        assert_eq!(
            keys_pos,
            vec![hash_pair(10, -1), hash_pair(20, 0), hash_pair(30, 1)]
        );
        let keys_neg = negated_sign_keys(&keys, &[1.0, 2.0, 3.0]);
        assert_eq!(
            keys_neg,
            vec![hash_pair(10, 1), hash_pair(20, 0), hash_pair(30, -1)]
        );
    }

    #[test]
    fn test_constant_column_has_zero_signs() {
        let keys = [1, 2];
        assert_eq!(
            sign_keys(&keys, &[5.0, 5.0]),
            vec![hash_pair(1, 0), hash_pair(2, 0)]
        );
    }
}
