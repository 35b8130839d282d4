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
use std::sync::Arc;

use crate::error::Error;

/// An exact-match term: a field name and an opaque byte value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    field: &'static str,
    bytes: Vec<u8>,
}

impl Term {
    /// Creates a term from raw bytes.
    pub fn new(field: &'static str, bytes: impl Into<Vec<u8>>) -> Self {
        Term {
            field,
            bytes: bytes.into(),
        }
    }

    /// Creates a term holding a 32-bit integer in big-endian order.
    pub fn from_i32(field: &'static str, value: i32) -> Self {
        Term::new(field, value.to_be_bytes())
    }

    /// Returns the field name.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the term value.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A document: indexed terms plus stored binary fields.
///
/// Terms are searchable but not retrievable; stored fields are retrievable but not searchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    terms: Vec<Term>,
    stored: Vec<(&'static str, Vec<u8>)>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an indexed term.
    pub fn add_term(&mut self, term: Term) {
        self.terms.push(term);
    }

    /// Adds a stored field value. A field may hold several values.
    pub fn add_stored(&mut self, field: &'static str, bytes: impl Into<Vec<u8>>) {
        self.stored.push((field, bytes.into()));
    }

    /// Returns the indexed terms, in insertion order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Returns the first value stored under `field`.
    pub fn stored(&self, field: &str) -> Option<&[u8]> {
        self.stored
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

/// A boolean query over terms.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Matches documents containing the term; each match scores 1.
    Term(Term),
    /// Matches documents matching any clause; the score is the sum of the clause scores.
    Disjunction(Vec<Query>),
    /// Matches documents matching any sub-query; the score is the best sub-query score plus
    /// `tie_breaker` times the scores of the other matching sub-queries.
    DisjunctionMax {
        /// The alternatives.
        queries: Vec<Query>,
        /// Weight of the non-maximal sub-query scores.
        tie_breaker: f32,
    },
}

impl Query {
    /// A disjunction with one term clause per value of `terms` in `field`.
    pub fn any_term(field: &'static str, terms: &[i32]) -> Self {
        Query::Disjunction(
            terms
                .iter()
                .map(|&t| Query::Term(Term::from_i32(field, t)))
                .collect(),
        )
    }

    /// Returns the number of term clauses in this query.
    pub fn num_terms(&self) -> usize {
        match self {
            Query::Term(_) => 1,
            Query::Disjunction(clauses) => clauses.iter().map(Query::num_terms).sum(),
            Query::DisjunctionMax { queries, .. } => queries.iter().map(Query::num_terms).sum(),
        }
    }
}

/// A matching document number and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreDoc {
    /// Document number, in the order documents were added.
    pub doc: usize,
    /// Query score.
    pub score: f32,
}

impl fmt::Display for ScoreDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc={} score={:.3}", self.doc, self.score)
    }
}

/// A point-in-time, read-only view of an index.
pub trait IndexSnapshot: fmt::Debug + Send + Sync {
    /// Returns the `top_k` best-scoring documents matching `query`, best first. Documents with
    /// equal scores are ordered by ascending document number.
    ///
    /// # Errors
    ///
    /// If `top_k` is zero or the backend fails.
    fn search(&self, query: &Query, top_k: usize) -> Result<Vec<ScoreDoc>, Error>;

    /// Returns the document with number `doc`.
    ///
    /// # Errors
    ///
    /// If the document does not exist in this snapshot or the backend fails.
    fn document(&self, doc: usize) -> Result<Arc<Document>, Error>;

    /// Number of live documents in this snapshot.
    fn num_docs(&self) -> usize;
}

/// An inverted index holding term-only documents with stored fields.
///
/// There is a single logical writer. Readers work on snapshots, which only observe the writes
/// that happened before the last [`refresh`](Self::refresh).
pub trait IndexBackend: fmt::Debug + Send + Sync {
    /// Adds `doc`, first deleting any live document containing `id`.
    ///
    /// # Errors
    ///
    /// If the index is closed or the backend fails.
    fn update_document(&self, id: Term, doc: Document) -> Result<(), Error>;

    /// Makes all previous writes visible to new snapshots.
    ///
    /// # Errors
    ///
    /// If the index is closed or the backend fails.
    fn refresh(&self) -> Result<(), Error>;

    /// Returns the snapshot published by the last refresh.
    ///
    /// # Errors
    ///
    /// If the index is closed or the backend fails.
    fn snapshot(&self) -> Result<Arc<dyn IndexSnapshot>, Error>;

    /// Closes the index. Every later call fails.
    ///
    /// # Errors
    ///
    /// If the index is already closed.
    fn close(&self) -> Result<(), Error>;
}
