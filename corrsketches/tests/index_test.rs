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

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use corrsketches::column::ColumnPair;
use corrsketches::error::Error;
use corrsketches::error::ErrorKind;
use corrsketches::index::Document;
use corrsketches::index::IndexBackend;
use corrsketches::index::IndexKind;
use corrsketches::index::IndexSnapshot;
use corrsketches::index::MemoryIndex;
use corrsketches::index::SketchIndex;
use corrsketches::index::SortBy;
use corrsketches::index::Term;
use googletest::prelude::*;

use crate::common::column;

fn letters(n: usize) -> Vec<&'static str> {
    ["a", "b", "c", "d", "e", "f", "g", "h"][..n].to_vec()
}

fn seq(from: i32, to: i32) -> Vec<f64> {
    if from <= to {
        (from..=to).map(f64::from).collect()
    } else {
        (to..=from).rev().map(f64::from).collect()
    }
}

fn ids(hits: &[corrsketches::index::Hit]) -> Vec<&str> {
    hits.iter().map(|hit| hit.id()).collect()
}

#[test]
fn test_search_reranks_by_correlation() {
    let index = SketchIndex::builder().build();
    let q = column("q", &letters(5), &seq(1, 5));
    let c0 = column("c0", &letters(5), &seq(1, 5));
    let c1 = column("c1", &letters(4), &[1.1, 2.5, 3.0, 4.4]);
    let c2 = column("c2", &letters(3), &[1.0, 3.1, 3.2]);

    index.index("c2", &c2).unwrap();
    index.index("c0", &c0).unwrap();
    index.index("c1", &c1).unwrap();
    index.refresh().unwrap();

    let hits = index.search(&q, 5).unwrap();
    assert_eq!(ids(&hits), ["c0", "c1", "c2"]);

    let scores: Vec<f32> = hits.iter().map(|hit| hit.score()).collect();
    assert_eq!(scores, [5.0, 4.0, 3.0]);

    let expected = [1.0, 0.98535, 0.88545];
    for (hit, expected) in hits.iter().zip(expected) {
        assert_that!(hit.correlation().unwrap(), near(expected, 1e-4), "{hit}");
        assert_that!(hit.rerank_score().unwrap(), near(expected, 1e-4), "{hit}");
    }
    assert_eq!(hits[1].sketch().unwrap().len(), 4);
}

#[test]
fn test_search_sorted_by_overlap() {
    let index = SketchIndex::builder().sort_by(SortBy::Key).build();
    let q = column("q", &letters(5), &seq(1, 5));
    index
        .index("c2", &column("c2", &letters(3), &[1.0, 3.1, 3.2]))
        .unwrap();
    index
        .index("c1", &column("c1", &letters(4), &[1.1, 2.5, 3.0, 4.4]))
        .unwrap();
    index.refresh().unwrap();

    let hits = index.search(&q, 5).unwrap();
    assert_eq!(ids(&hits), ["c1", "c2"]);
    assert!(hits.iter().all(|hit| hit.rerank_score().is_none()));
}

#[test]
fn test_qcr_overlap_scores() {
    for kind in [IndexKind::Qcr, IndexKind::QcrInverted] {
        let index = SketchIndex::builder().kind(kind).build();
        let q = column("q", &letters(5), &seq(1, 5));
        index.index("c0", &column("c0", &letters(5), &seq(1, 5))).unwrap();
        index
            .index("c1", &column("c1", &letters(4), &[1.1, 2.5, 3.0, 4.4]))
            .unwrap();
        index
            .index("c2", &column("c2", &letters(3), &[1.0, 3.1, 3.2]))
            .unwrap();
        index.refresh().unwrap();

        let hits = index.search(&q, 5).unwrap();
        let scores: Vec<f32> = hits.iter().map(|hit| hit.score()).collect();
        assert_eq!(ids(&hits), ["c0", "c1", "c2"], "{kind}");
        assert_eq!(scores, [5.0, 3.0, 1.0], "{kind}");
    }
}

#[test]
fn test_qcr_sign_agreement() {
    let columns: [(&str, Vec<&str>, Vec<f64>); 7] = [
        ("c0", letters(7), seq(1, 7)),
        ("c1", letters(7), seq(7, 1)),
        ("c2", letters(5), vec![1.1, 2.5, 3.0, 4.4, 4.6]),
        ("c3", letters(5), vec![1.1, 2.5, 2.0, 2.7, 3.0]),
        ("c4", letters(5), vec![1.5, 1.5, 1.0, 1.0, 2.0]),
        ("c5", letters(5), vec![5.0, 4.1, 3.1, 2.0, 1.0]),
        ("c6", letters(5), vec![1.0; 5]),
    ];
    let q = column("q", &letters(8), &seq(1, 8));

    for kind in [IndexKind::Qcr, IndexKind::QcrInverted] {
        let index = SketchIndex::builder().kind(kind).build();
        assert_eq!(index.sort_by(), SortBy::Key);
        for (id, keys, values) in &columns {
            index.index(id, &column(id, keys, values)).unwrap();
        }
        index.refresh().unwrap();

        let hits = index.search(&q, 6).unwrap();
        let scores: Vec<f32> = hits.iter().map(|hit| hit.score()).collect();
        assert_eq!(ids(&hits), ["c0", "c1", "c2", "c5", "c3", "c4"], "{kind}");
        assert_eq!(scores, [6.0, 6.0, 4.0, 4.0, 3.0, 3.0], "{kind}");

        let all = index.search(&q, 10).unwrap();
        assert!(all.iter().all(|hit| hit.id() != "c6"), "{kind}");
    }
}

#[test]
fn test_search_without_overlap() {
    let index = SketchIndex::builder().build();
    index
        .index("c0", &column("c0", &["x", "y", "z"], &[1.0, 2.0, 3.0]))
        .unwrap();
    index.refresh().unwrap();

    let q = column("q", &letters(3), &seq(1, 3));
    assert!(index.search(&q, 10).unwrap().is_empty());
    assert_eq!(
        index.search(&q, 0).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn test_reindex_replaces_document() {
    let index = SketchIndex::builder().build();
    let q = column("q", &letters(4), &seq(1, 4));
    index.index("c", &column("c", &letters(4), &seq(1, 4))).unwrap();
    index.refresh().unwrap();
    let hits = index.search(&q, 5).unwrap();
    assert_that!(hits[0].correlation().unwrap(), near(1.0, 1e-9));

    index.index("c", &column("c", &letters(4), &seq(4, 1))).unwrap();
    // not visible until refreshed
    let hits = index.search(&q, 5).unwrap();
    assert_that!(hits[0].correlation().unwrap(), near(1.0, 1e-9));

    index.refresh().unwrap();
    let hits = index.search(&q, 5).unwrap();
    assert_eq!(ids(&hits), ["c"]);
    assert_that!(hits[0].correlation().unwrap(), near(-1.0, 1e-9));
    assert_eq!(index.backend().snapshot().unwrap().num_docs(), 1);
}

#[test]
fn test_hit_survives_newer_snapshot() {
    let index = SketchIndex::builder().build();
    let q = column("q", &letters(4), &seq(1, 4));
    index.index("c", &column("c", &letters(4), &seq(1, 4))).unwrap();
    index.refresh().unwrap();
    let hits = index.search(&q, 1).unwrap();

    index.index("c", &column("c", &letters(4), &seq(4, 1))).unwrap();
    index.refresh().unwrap();
    assert_that!(hits[0].correlation().unwrap(), near(1.0, 1e-9));
}

#[test]
fn test_search_on_empty_index() {
    let index = SketchIndex::builder().build();
    let q = column("q", &letters(3), &seq(1, 3));
    assert!(index.search(&q, 3).unwrap().is_empty());
}

#[derive(Debug, Default)]
struct CountingBackend {
    inner: MemoryIndex,
    updates: AtomicUsize,
    refreshes: AtomicUsize,
}

impl IndexBackend for CountingBackend {
    fn update_document(&self, id: Term, doc: Document) -> Result<(), Error> {
        self.updates.fetch_add(1, Ordering::Relaxed);
        self.inner.update_document(id, doc)
    }

    fn refresh(&self) -> Result<(), Error> {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        self.inner.refresh()
    }

    fn snapshot(&self) -> Result<Arc<dyn IndexSnapshot>, Error> {
        self.inner.snapshot()
    }

    fn close(&self) -> Result<(), Error> {
        self.inner.close()
    }
}

#[test]
fn test_custom_backend() {
    let index = SketchIndex::builder()
        .kind(IndexKind::Qcr)
        .build_with(CountingBackend::default());
    let c: ColumnPair = column("c", &letters(4), &seq(1, 4));
    index.index("c", &c).unwrap();
    index.index("d", &c).unwrap();
    index.refresh().unwrap();

    assert_eq!(index.backend().updates.load(Ordering::Relaxed), 2);
    assert_eq!(index.backend().refreshes.load(Ordering::Relaxed), 1);
    assert_eq!(index.search(&c, 5).unwrap().len(), 2);

    index.close().unwrap();
    assert_eq!(
        index.refresh().unwrap_err().kind(),
        ErrorKind::IndexBackend
    );
}
