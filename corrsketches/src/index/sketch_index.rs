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

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::column::ColumnPair;
use crate::correlation::CorrelationType;
use crate::error::Error;
use crate::index::backend::Document;
use crate::index::backend::IndexBackend;
use crate::index::backend::Query;
use crate::index::backend::Term;
use crate::index::hit::Hit;
use crate::index::hit::SortBy;
use crate::index::hit::rerank_by_correlation;
use crate::index::memory::MemoryIndex;
use crate::index::sign_keys::negated_sign_keys;
use crate::index::sign_keys::sign_keys;
use crate::index::wire;
use crate::sketch::CorrelationSketch;
use crate::sketch::CorrelationSketchBuilder;
use crate::sketch::ImmutableCorrelationSketch;

const ID_FIELD: &str = "i";
const HASHES_FIELD: &str = "h";
const VALUES_FIELD: &str = "v";
const SIGN_KEYS_FIELD: &str = "c";
const NEGATED_SIGN_KEYS_FIELD: &str = "f";

/// The terms a [`SketchIndex`] generates for each column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexKind {
    /// Key hashes only. Hits are ranked by key overlap.
    #[default]
    Std,
    /// One field of sign keys. Queries match both the query signs and their negation against it.
    Qcr,
    /// Sign keys and negated sign keys in two fields. Queries match their signs against both.
    QcrInverted,
}

impl IndexKind {
    /// Returns the canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            IndexKind::Std => "STD",
            IndexKind::Qcr => "QCR",
            IndexKind::QcrInverted => "QCRI",
        }
    }

    /// The hit order used when none is configured: correlation reranking for [`IndexKind::Std`]
    /// and index order for the sign-key indexes.
    pub const fn default_sort_by(self) -> SortBy {
        match self {
            IndexKind::Std => SortBy::Csk,
            IndexKind::Qcr | IndexKind::QcrInverted => SortBy::Key,
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STD" => Ok(IndexKind::Std),
            "QCR" => Ok(IndexKind::Qcr),
            "QCRI" => Ok(IndexKind::QcrInverted),
            other => Err(Error::invalid_argument(format!("unknown index type: {other}"))),
        }
    }
}

/// Builder for SketchIndex
#[derive(Debug, Clone, Copy, Default)]
pub struct SketchIndexBuilder {
    kind: IndexKind,
    sketch: CorrelationSketchBuilder,
    sort_by: Option<SortBy>,
}

impl SketchIndexBuilder {
    /// Set the index kind. Defaults to [`IndexKind::Std`].
    pub fn kind(mut self, kind: IndexKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the builder used for both indexed and query sketches.
    pub fn sketch(mut self, sketch: CorrelationSketchBuilder) -> Self {
        self.sketch = sketch;
        self
    }

    /// Set the hit order. Defaults to [`IndexKind::default_sort_by`].
    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Build an index kept in memory.
    pub fn build(self) -> SketchIndex {
        self.build_with(MemoryIndex::new())
    }

    /// Build an index on top of `backend`.
    pub fn build_with<B: IndexBackend>(self, backend: B) -> SketchIndex<B> {
        SketchIndex {
            kind: self.kind,
            builder: self.sketch,
            sort_by: self.sort_by.unwrap_or(self.kind.default_sort_by()),
            backend,
        }
    }
}

/// An index of correlation sketches answering "which indexed columns are joinable with, and
/// correlated to, this query column".
///
/// Each indexed column stores its frozen sketch. Depending on the [`IndexKind`], the key hashes
/// or the sign keys of the sketch are indexed as terms, and a search ranks columns by the number
/// of terms they share with the query sketch.
///
/// # Usage
///
/// ```
/// # use corrsketches::column::ColumnPair;
/// # use corrsketches::index::SketchIndex;
/// fn column(keys: &[&str], values: &[f64]) -> ColumnPair {
///     let keys = keys.iter().map(|k| k.to_string()).collect();
///     ColumnPair::new("t", "k", keys, "v", values.to_vec()).unwrap()
/// }
///
/// let index = SketchIndex::builder().build();
/// index.index("x", &column(&["a", "b", "c"], &[1.0, 2.0, 3.0])).unwrap();
/// index.index("y", &column(&["x", "y", "z"], &[1.0, 2.0, 3.0])).unwrap();
/// index.refresh().unwrap();
///
/// let hits = index.search(&column(&["a", "b", "c", "d"], &[3.0, 6.0, 9.0, 1.0]), 10).unwrap();
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].id(), "x");
/// ```
#[derive(Debug)]
pub struct SketchIndex<B = MemoryIndex> {
    kind: IndexKind,
    builder: CorrelationSketchBuilder,
    sort_by: SortBy,
    backend: B,
}

impl SketchIndex {
    /// Create a new builder for SketchIndex
    pub fn builder() -> SketchIndexBuilder {
        SketchIndexBuilder::default()
    }
}

impl<B: IndexBackend> SketchIndex<B> {
    /// Returns the index kind.
    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// Returns the hit order.
    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    /// Returns the storage backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Sketches `column` and stores it under `id`, replacing any column indexed with the same id.
    ///
    /// The column becomes searchable after the next [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// If the sketch can not be built or the backend fails.
    pub fn index(&self, id: &str, column: &ColumnPair) -> Result<(), Error> {
        let sketch = self.build_sketch(column)?.to_immutable();
        let keys = sketch.keys();
        let values = sketch.values();

        let id_term = Term::new(ID_FIELD, id.as_bytes());
        let mut doc = Document::new();
        doc.add_term(id_term.clone());
        doc.add_stored(ID_FIELD, id.as_bytes());
        match self.kind {
            IndexKind::Std => {}
            IndexKind::Qcr => {
                add_terms(&mut doc, SIGN_KEYS_FIELD, &sign_keys(keys, values));
            }
            IndexKind::QcrInverted => {
                add_terms(&mut doc, SIGN_KEYS_FIELD, &sign_keys(keys, values));
                add_terms(
                    &mut doc,
                    NEGATED_SIGN_KEYS_FIELD,
                    &negated_sign_keys(keys, values),
                );
            }
        }
        add_terms(&mut doc, HASHES_FIELD, keys);
        doc.add_stored(HASHES_FIELD, wire::encode_keys(keys));
        doc.add_stored(VALUES_FIELD, wire::encode_values(values));

        self.backend.update_document(id_term, doc)?;
        tracing::debug!(id, kind = %self.kind, entries = keys.len(), "indexed column");
        Ok(())
    }

    /// Makes every column indexed so far visible to searches.
    ///
    /// # Errors
    ///
    /// If the backend fails.
    pub fn refresh(&self) -> Result<(), Error> {
        self.backend.refresh()?;
        tracing::debug!(kind = %self.kind, "refreshed index");
        Ok(())
    }

    /// Returns up to `k` indexed columns sharing keys with `column`, best first.
    ///
    /// A column that shares no key with any indexed column yields no hits.
    ///
    /// # Errors
    ///
    /// If `k` is zero, the query sketch can not be built, or the backend fails.
    pub fn search(&self, column: &ColumnPair, k: usize) -> Result<Vec<Hit>, Error> {
        let sketch = self.build_sketch(column)?.to_immutable();
        let query = self.query_of(&sketch);
        let snapshot = self.backend.snapshot()?;
        let score_docs = snapshot.search(&query, k)?;

        let sketch = Arc::new(sketch);
        let mut hits = Vec::with_capacity(score_docs.len());
        for score_doc in score_docs {
            let document = snapshot.document(score_doc.doc)?;
            hits.push(Hit::new(
                read_id(&document)?,
                score_doc.score,
                score_doc.doc,
                sketch.clone(),
                snapshot.clone(),
                self.estimator(),
            ));
        }
        if self.sort_by == SortBy::Csk {
            rerank_by_correlation(&mut hits)?;
        }
        tracing::debug!(
            kind = %self.kind,
            terms = query.num_terms(),
            hits = hits.len(),
            "searched index"
        );
        Ok(hits)
    }

    /// Reads the sketch stored in document `doc` of the current snapshot.
    ///
    /// # Errors
    ///
    /// If the document does not exist or its stored fields are corrupt.
    pub fn load_sketch(&self, doc: usize) -> Result<ImmutableCorrelationSketch, Error> {
        let document = self.backend.snapshot()?.document(doc)?;
        read_sketch(&document, self.estimator())
    }

    /// Closes the backend. Every later call fails.
    ///
    /// # Errors
    ///
    /// If the backend is already closed.
    pub fn close(&self) -> Result<(), Error> {
        self.backend.close()
    }

    fn build_sketch(&self, column: &ColumnPair) -> Result<CorrelationSketch, Error> {
        self.builder
            .build_from(column.key_values(), column.column_values())
    }

    fn estimator(&self) -> CorrelationType {
        self.builder.configured_estimator()
    }

    fn query_of(&self, sketch: &ImmutableCorrelationSketch) -> Query {
        let keys = sketch.keys();
        let values = sketch.values();
        match self.kind {
            IndexKind::Std => Query::any_term(HASHES_FIELD, keys),
            IndexKind::Qcr => Query::DisjunctionMax {
                queries: vec![
                    Query::any_term(SIGN_KEYS_FIELD, &sign_keys(keys, values)),
                    Query::any_term(SIGN_KEYS_FIELD, &negated_sign_keys(keys, values)),
                ],
                tie_breaker: 0.0,
            },
            IndexKind::QcrInverted => {
                let signs = sign_keys(keys, values);
                Query::DisjunctionMax {
                    queries: vec![
                        Query::any_term(SIGN_KEYS_FIELD, &signs),
                        Query::any_term(NEGATED_SIGN_KEYS_FIELD, &signs),
                    ],
                    tie_breaker: 0.0,
                }
            }
        }
    }
}

fn add_terms(doc: &mut Document, field: &'static str, terms: &[i32]) {
    for &term in terms {
        doc.add_term(Term::from_i32(field, term));
    }
}

fn read_id(document: &Document) -> Result<String, Error> {
    let bytes = document
        .stored(ID_FIELD)
        .ok_or_else(|| Error::backend("missing stored field").with_context("field", ID_FIELD))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::backend("corrupt stored field: id").with_context("field", ID_FIELD))
}

/// Rebuilds the frozen sketch stored in `document`.
pub(crate) fn read_sketch(
    document: &Document,
    estimator: CorrelationType,
) -> Result<ImmutableCorrelationSketch, Error> {
    let stored = |field: &'static str| {
        document
            .stored(field)
            .ok_or_else(|| Error::backend("missing stored field").with_context("field", field))
    };
    let keys = wire::decode_keys(stored(HASHES_FIELD)?)?;
    let values = wire::decode_values(stored(VALUES_FIELD)?)?;
    if keys.len() != values.len() {
        return Err(Error::backend("stored keys and values differ in length")
            .with_context("keys.len", keys.len())
            .with_context("values.len", values.len()));
    }
    ImmutableCorrelationSketch::from_parts(keys, values, estimator)
}
