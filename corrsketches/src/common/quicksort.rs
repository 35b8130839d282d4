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

use std::cmp::Ordering;

/// Sorts `keys` in place by `compare` while applying the same permutation to `values`.
///
/// Three-way partitioning keeps runs of equal keys cheap; recursing only into the smaller
/// side bounds the stack depth by `log2(n)`.
pub(crate) fn sort_by_key_slice<K, V, F>(keys: &mut [K], values: &mut [V], mut compare: F)
where
    F: FnMut(&K, &K) -> Ordering,
{
    debug_assert_eq!(keys.len(), values.len());
    quicksort(keys, values, &mut compare);
}

const INSERTION_SORT_THRESHOLD: usize = 16;

fn quicksort<K, V, F>(mut keys: &mut [K], mut values: &mut [V], compare: &mut F)
where
    F: FnMut(&K, &K) -> Ordering,
{
    while keys.len() > INSERTION_SORT_THRESHOLD {
        let (lt, gt) = partition(keys, values, compare);

        let (k_left, k_rest) = std::mem::take(&mut keys).split_at_mut(lt);
        let (v_left, v_rest) = std::mem::take(&mut values).split_at_mut(lt);
        let (_, k_right) = k_rest.split_at_mut(gt - lt);
        let (_, v_right) = v_rest.split_at_mut(gt - lt);

        if k_left.len() < k_right.len() {
            quicksort(k_left, v_left, compare);
            keys = k_right;
            values = v_right;
        } else {
            quicksort(k_right, v_right, compare);
            keys = k_left;
            values = v_left;
        }
    }
    insertion_sort(keys, values, compare);
}

/// Dutch-flag partition around a median-of-three pivot.
///
/// Returns `(lt, gt)` such that `keys[..lt] < pivot`, `keys[lt..gt] == pivot` and
/// `keys[gt..] > pivot`.
fn partition<K, V, F>(keys: &mut [K], values: &mut [V], compare: &mut F) -> (usize, usize)
where
    F: FnMut(&K, &K) -> Ordering,
{
    let len = keys.len();
    let mid = len / 2;
    // order keys[0], keys[mid], keys[len - 1] so that the median lands at mid
    if compare(&keys[mid], &keys[0]) == Ordering::Less {
        swap(keys, values, mid, 0);
    }
    if compare(&keys[len - 1], &keys[0]) == Ordering::Less {
        swap(keys, values, len - 1, 0);
    }
    if compare(&keys[len - 1], &keys[mid]) == Ordering::Less {
        swap(keys, values, len - 1, mid);
    }
    // pivot is parked at index 0 and moves along with the equal run
    swap(keys, values, 0, mid);

    let mut lt = 0;
    let mut i = 1;
    let mut gt = len;
    while i < gt {
        match compare(&keys[i], &keys[lt]) {
            Ordering::Less => {
                swap(keys, values, i, lt);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                swap(keys, values, i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }
    (lt, gt)
}

fn insertion_sort<K, V, F>(keys: &mut [K], values: &mut [V], compare: &mut F)
where
    F: FnMut(&K, &K) -> Ordering,
{
    for i in 1..keys.len() {
        let mut j = i;
        while j > 0 && compare(&keys[j], &keys[j - 1]) == Ordering::Less {
            swap(keys, values, j, j - 1);
            j -= 1;
        }
    }
}

#[inline]
fn swap<K, V>(keys: &mut [K], values: &mut [V], a: usize, b: usize) {
    keys.swap(a, b);
    values.swap(a, b);
}
