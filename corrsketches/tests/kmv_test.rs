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

use corrsketches::error::ErrorKind;
use corrsketches::hash::unit_hash;
use corrsketches::kmv::Gkmv;
use corrsketches::kmv::GkmvBuilder;
use corrsketches::kmv::Kmv;
use corrsketches::kmv::MinValueSketch;
use corrsketches::kmv::SketchOptions;
use corrsketches::kmv::Synopsis;
use googletest::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

const VALUES: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
const SET_A: [i32; 5] = [1, 2, 3, 4, 5];
const SET_B: [i32; 5] = [1, 2, 3, 8, 9];
const SET_C: [i32; 5] = [6, 7, 8, 9, 0];

fn gkmv_of(builder: GkmvBuilder, hashes: &[i32]) -> Gkmv {
    let mut sketch = builder.build().unwrap();
    sketch.update_all_hashed(hashes, &VALUES).unwrap();
    sketch
}

#[test]
fn test_gkmv_distinct_values() {
    let mut sketch = Gkmv::builder().threshold(0.5).build().unwrap();
    for i in 1..=1000 {
        sketch.update(i, i as f64);
        if i % 100 == 0 {
            let n = i as f64;
            assert_that!(1.0 - sketch.distinct_values() / n, lt(0.15));
            assert_that!(1.0 - sketch.distinct_values_be() / n, lt(0.15));
        }
    }
}

#[test]
fn test_gkmv_intersection() {
    let builder = Gkmv::builder().threshold(0.5);
    let a1 = gkmv_of(builder, &SET_A);
    let a2 = gkmv_of(builder, &SET_A);
    let b1 = gkmv_of(builder, &SET_B);
    let c1 = gkmv_of(builder, &SET_C);
    assert_that!(a1.intersection_size(&a2).unwrap(), near(5.0, 1.0));
    assert_that!(a1.intersection_size(&b1).unwrap(), near(3.0, 1.0));
    assert_that!(a1.intersection_size(&c1).unwrap(), near(0.0, 1.0));
}

#[test]
fn test_gkmv_union() {
    let builder = Gkmv::builder().threshold(0.8);
    let a1 = gkmv_of(builder, &SET_A);
    let a2 = gkmv_of(builder, &SET_A);
    let b1 = gkmv_of(builder, &SET_B);
    let c1 = gkmv_of(builder, &SET_C);
    assert_that!(a1.union_size(&a2).unwrap(), near(5.0, 1.0));
    assert_that!(a1.union_size(&b1).unwrap(), near(7.0, 1.0));
    assert_that!(a1.union_size(&c1).unwrap(), near(10.0, 1.0));
}

#[test]
fn test_gkmv_jaccard() {
    let builder = Gkmv::builder().threshold(0.5);
    let a1 = gkmv_of(builder, &SET_A);
    let a2 = gkmv_of(builder, &SET_A);
    let b1 = gkmv_of(builder, &SET_B);
    let c1 = gkmv_of(builder, &SET_C);
    assert_that!(a1.jaccard(&a2).unwrap(), near(1.0, 0.1));
    assert_that!(a1.jaccard(&b1).unwrap(), near(3.0 / 7.0, 0.1));
    assert_that!(a1.jaccard(&c1).unwrap(), near(0.0, 0.1));
}

#[test]
fn test_gkmv_containment() {
    let builder = Gkmv::builder().threshold(0.5);
    let a1 = gkmv_of(builder, &SET_A);
    let a2 = gkmv_of(builder, &SET_A);
    let b1 = gkmv_of(builder, &SET_B);
    let c1 = gkmv_of(builder, &SET_C);
    assert_that!(a1.containment(&a2).unwrap(), near(1.0, 0.155));
    assert_that!(a1.containment(&b1).unwrap(), near(0.6, 0.155));
    assert_that!(a1.containment(&c1).unwrap(), near(0.0, 0.155));
}

#[test]
fn test_kmv_distinct_values() {
    let mut sketch = Kmv::builder().k(256).build().unwrap();
    for i in 1..=10_000 {
        sketch.update(i, i as f64);
        if i % 1000 == 0 {
            let n = i as f64;
            assert_that!(1.0 - sketch.distinct_values() / n, near(0.0, 0.05));
        }
    }
    assert_eq!(sketch.num_retained(), 256);
}

#[test]
fn test_kmv_bottom_k_invariant() {
    let mut rng = StdRng::seed_from_u64(7);
    for k in [1, 5, 64] {
        let mut sketch = Kmv::builder().k(k).build().unwrap();
        let mut hashes = Vec::new();
        for _ in 0..2_000 {
            let hash = rng.random_range(-500..500);
            hashes.push(hash);
            sketch.update(hash, rng.random());

            assert!(sketch.num_retained() <= k);
            let kth = sketch.kth_value();
            assert!(sketch.entries().iter().all(|e| e.unit_hash() <= kth));
        }

        // the retained entries are exactly the k smallest distinct unit hashes
        hashes.sort_unstable();
        hashes.dedup();
        let mut expected: Vec<f64> = hashes.iter().map(|&h| unit_hash(h)).collect();
        expected.sort_by(f64::total_cmp);
        expected.truncate(k);
        let mut retained: Vec<f64> = sketch.entries().iter().map(|e| e.unit_hash()).collect();
        retained.sort_by(f64::total_cmp);
        assert_eq!(retained, expected);
    }
}

#[test]
fn test_kmv_set_statistics_are_symmetric() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut a = Kmv::builder().k(128).build().unwrap();
    let mut b = Kmv::builder().k(96).build().unwrap();
    for _ in 0..5_000 {
        a.update(rng.random_range(0..4_000), 1.0);
        b.update(rng.random_range(2_000..6_000), 1.0);
    }
    assert_eq!(a.union_size(&b).unwrap(), b.union_size(&a).unwrap());
    assert_eq!(a.jaccard(&b).unwrap(), b.jaccard(&a).unwrap());
    assert_eq!(
        a.intersection_size(&b).unwrap(),
        b.intersection_size(&a).unwrap()
    );
}

#[test]
fn test_empty_synopsis() {
    let empty = Kmv::builder().build().unwrap();
    let mut full = Kmv::builder().build().unwrap();
    full.update(1, 1.0);
    assert_eq!(
        empty.union_size(&full).unwrap_err().kind(),
        ErrorKind::EmptySketch
    );
    assert_eq!(
        full.jaccard(&empty).unwrap_err().kind(),
        ErrorKind::EmptySketch
    );
    assert_eq!(
        full.intersection_size(&empty).unwrap_err().kind(),
        ErrorKind::EmptySketch
    );
}

#[test]
fn test_synopsis_dispatch() {
    let mut kmv = Synopsis::new(SketchOptions::Kmv { k: 4 }, Default::default()).unwrap();
    let mut gkmv = Synopsis::new(SketchOptions::Gkmv { t: 1.0 }, Default::default()).unwrap();
    kmv.update_all(&["a", "b", "c", "d", "e"], &VALUES).unwrap();
    gkmv.update_all(&["a", "b", "c", "d", "e"], &VALUES).unwrap();
    assert_eq!(kmv.num_retained(), 4);
    assert_eq!(gkmv.num_retained(), 5);
    assert_eq!(kmv.jaccard(&kmv).unwrap(), 1.0);
    assert_eq!(
        kmv.jaccard(&gkmv).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}
