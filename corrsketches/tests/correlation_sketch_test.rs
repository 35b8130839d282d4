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

mod common;

use corrsketches::aggregate::AggregateFunction;
use corrsketches::correlation::CorrelationType;
use corrsketches::correlation::pearson;
use corrsketches::error::ErrorKind;
use corrsketches::hash::hash_key;
use corrsketches::kmv::SketchOptions;
use corrsketches::sketch::CorrelationSketch;
use googletest::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::common::exponential;

const PK: [&str; 5] = ["a", "b", "c", "d", "e"];
const Q: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
const C1: [f64; 5] = [1.1, 2.5, 3.0, 4.4, 5.9];
const C2: [f64; 5] = [1.0, 3.2, 3.1, 4.9, 5.4];

#[test]
fn test_estimate_correlation() {
    let builder = CorrelationSketch::builder();
    let q = builder.build_from(&PK, &Q).unwrap();
    let c0 = builder.build_from(&PK, &Q).unwrap();
    let c1 = builder.build_from(&PK, &C1).unwrap();
    let c2 = builder.build_from(&PK, &C2).unwrap();

    assert_that!(q.correlation_to(&q).unwrap().coefficient, near(1.0, 1e-9));
    assert_that!(q.correlation_to(&c0).unwrap().coefficient, near(1.0, 1e-9));
    assert_that!(q.correlation_to(&c1).unwrap().coefficient, near(0.9895, 1e-3));
    assert_that!(q.correlation_to(&c2).unwrap().coefficient, near(0.9558, 1e-3));

    // the frozen form gives the same answers
    let iq = q.to_immutable();
    for c in [&c0, &c1, &c2] {
        let estimate = q.correlation_to(c).unwrap();
        assert_eq!(iq.correlation_to(&c.to_immutable()).unwrap(), estimate);
        assert_eq!(estimate.sample_size, 5);
    }
}

#[test]
fn test_correlation_between_column_aggregations() {
    let kx = ["a", "a", "b", "b", "c", "d"];
    let x = [-20.0, 21.0, 1.0, 1.0, 3.0, 4.0];

    let ky = ["a", "b", "c", "d"];
    let y_sum = [1.0, 2.0, 3.0, 4.0];
    let y_mean = [0.5, 1.0, 3.0, 4.0];
    let y_count = [2.0, 2.0, 1.0, 1.0];

    let builder = CorrelationSketch::builder().aggregate_function(AggregateFunction::First);
    for (function, y) in [
        (AggregateFunction::Sum, y_sum),
        (AggregateFunction::Mean, y_mean),
        (AggregateFunction::Count, y_count),
    ] {
        let sy = builder.build_from(&ky, &y).unwrap();
        let sx = builder
            .aggregate_function(function)
            .build_from(&kx, &x)
            .unwrap();
        let estimate = sx.correlation_to(&sy).unwrap();
        assert_that!(estimate.coefficient, near(1.0, 1e-4), "{function}");
    }
}

#[test]
fn test_bottom_k_pairing() {
    let builder = CorrelationSketch::builder().sketch(SketchOptions::Kmv { k: 5 });
    let xs = builder
        .build_from(&["a", "b", "c", "d", "f"], &[1.0, 2.0, 3.0, 4.0, 5.0])
        .unwrap();
    let ys = builder
        .build_from(&["!", "a", "b", "c", "d", "e"], &[0.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .unwrap();

    let xi = xs.to_immutable();
    let yi = ys.to_immutable();
    let estimate = xs.correlation_to(&ys).unwrap();
    let paired = xi.intersection(&yi);

    assert_eq!(estimate.sample_size, 3);
    assert_eq!(paired.len(), 3);
    assert_eq!(xi.correlation_to(&yi).unwrap(), estimate);
    assert_eq!(estimate.coefficient, 1.0);
}

#[test]
fn test_merge_join_on_shared_keys() {
    let builder = CorrelationSketch::builder();
    let x = builder.build_from(&PK, &Q).unwrap().to_immutable();
    let y = builder
        .build_from(&["a", "b", "c", "d"], &[2.0, 4.0, 6.0, 8.0])
        .unwrap()
        .to_immutable();

    let paired = x.intersection(&y);
    let mut expected: Vec<i32> = ["a", "b", "c", "d"].iter().map(|k| hash_key(k)).collect();
    expected.sort_unstable();
    assert_eq!(paired.keys, expected);
    for (x, y) in paired.x.iter().zip(&paired.y) {
        assert_eq!(2.0 * x, *y);
    }

    let back = y.intersection(&x);
    assert_eq!(back.keys, paired.keys);
    assert_eq!(back.x, paired.y);
    assert_eq!(back.y, paired.x);
}

#[test]
fn test_to_immutable_is_idempotent() {
    let sketch = CorrelationSketch::builder().build_from(&PK, &C2).unwrap();
    let first = sketch.to_immutable();
    let second = sketch.to_immutable();
    assert_eq!(first, second);
    assert!(first.keys().windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_set_statistics() {
    let builder = CorrelationSketch::builder();
    let mut q = builder.build_from(&PK, &Q).unwrap();
    let mut c = builder
        .build_from(&["a", "b", "c", "z", "x"], &Q)
        .unwrap();

    assert_that!(q.jaccard(&c).unwrap(), near(3.0 / 7.0, 1e-12));
    assert_eq!(q.jaccard(&c).unwrap(), c.jaccard(&q).unwrap());
    assert_eq!(q.union_size(&c).unwrap(), c.union_size(&q).unwrap());
    assert_eq!(
        q.intersection_size(&c).unwrap(),
        c.intersection_size(&q).unwrap()
    );

    q.set_cardinality(Some(5));
    c.set_cardinality(Some(5));
    assert_eq!(q.cardinality(), 5.0);
    let expected = q.intersection_size(&c).unwrap() / 5.0;
    assert_eq!(q.containment(&c).unwrap(), expected);
}

#[test]
fn test_empty_sketch() {
    let builder = CorrelationSketch::builder();
    let empty = builder.build().unwrap();
    let q = builder.build_from(&PK, &Q).unwrap();
    assert_eq!(
        q.jaccard(&empty).unwrap_err().kind(),
        ErrorKind::EmptySketch
    );

    // an empty pairing is a value, not an error
    let estimate = q.correlation_to(&empty).unwrap();
    assert_eq!(estimate.sample_size, 0);
    assert!(estimate.coefficient.is_nan());
}

#[test]
fn test_estimator_selection() {
    let builder = CorrelationSketch::builder().estimator(CorrelationType::Spearman);
    let x = builder.build_from(&PK, &Q).unwrap();
    let y = builder
        .build_from(&PK, &[1.0, 8.0, 27.0, 64.0, 125.0])
        .unwrap();
    assert_eq!(x.correlation_to(&y).unwrap().coefficient, 1.0);
    assert!(x.correlation_with(&y, CorrelationType::Pearson).unwrap().coefficient < 1.0);
}

#[test]
fn test_immutable_matches_mutable_on_random_columns() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10 {
        let jc: f64 = rng.random();
        let n = 2_000;
        let (mut kx, mut ky) = (Vec::with_capacity(n), Vec::with_capacity(n));
        let (mut x, mut y) = (Vec::with_capacity(n), Vec::with_capacity(n));
        for _ in 0..n {
            x.push(rng.random::<f64>() * 1e6);
            y.push(exponential(&mut rng));
            if rng.random::<f64>() < jc {
                let k = rng.random::<i32>().to_string();
                kx.push(k.clone());
                ky.push(k);
            } else {
                kx.push(rng.random::<i32>().to_string());
                ky.push(rng.random::<i32>().to_string());
            }
        }

        let builder = CorrelationSketch::builder().sketch(SketchOptions::Kmv { k: 256 });
        let xs = builder.build_from(&kx, &x).unwrap();
        let ys = builder.build_from(&ky, &y).unwrap();
        let estimate = xs.to_immutable().correlation_to(&ys.to_immutable()).unwrap();
        assert_eq!(xs.correlation_to(&ys).unwrap(), estimate);
        assert_eq!(
            estimate.coefficient.to_bits(),
            ys.correlation_to(&xs).unwrap().coefficient.to_bits()
        );
    }
}

#[test]
fn test_sketch_estimate_tracks_full_join() {
    let mut rng = StdRng::seed_from_u64(5);
    let n = 20_000;
    let keys: Vec<String> = (0..n).map(|i| format!("k{i}")).collect();
    let x: Vec<f64> = (0..n).map(|_| rng.random::<f64>()).collect();
    let y: Vec<f64> = x.iter().map(|v| v + 0.5 * rng.random::<f64>()).collect();

    let builder = CorrelationSketch::builder().sketch(SketchOptions::Kmv { k: 1024 });
    let xs = builder.build_from(&keys, &x).unwrap();
    let ys = builder.build_from(&keys, &y).unwrap();
    let estimate = xs.correlation_to(&ys).unwrap();
    assert_eq!(estimate.sample_size, 1024);
    assert_that!(estimate.coefficient, near(pearson::coefficient(&x, &y), 0.1));
}
