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
use std::sync::OnceLock;

use crate::correlation::CorrelationType;
use crate::correlation::Estimate;
use crate::error::Error;
use crate::index::backend::IndexSnapshot;
use crate::index::sketch_index::read_sketch;
use crate::sketch::ImmutableCorrelationSketch;

/// Order of the hits returned by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortBy {
    /// Keep the term-overlap order of the index.
    Key,
    /// Rerank by the absolute correlation estimated from the stored sketches.
    Csk,
}

impl SortBy {
    /// Returns the canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            SortBy::Key => "KEY",
            SortBy::Csk => "CSK",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KEY" => Ok(SortBy::Key),
            "CSK" => Ok(SortBy::Csk),
            other => Err(Error::invalid_argument(format!("unknown sort order: {other}"))),
        }
    }
}

/// A search result.
///
/// The candidate sketch is read from the index snapshot the first time it is needed, and the
/// correlation with the query is computed at most once.
#[derive(Debug)]
pub struct Hit {
    id: String,
    score: f32,
    doc: usize,
    query: Arc<ImmutableCorrelationSketch>,
    snapshot: Arc<dyn IndexSnapshot>,
    estimator: CorrelationType,
    sketch: OnceLock<ImmutableCorrelationSketch>,
    estimate: OnceLock<Estimate>,
    rerank_score: Option<f64>,
}

impl Hit {
    pub(crate) fn new(
        id: String,
        score: f32,
        doc: usize,
        query: Arc<ImmutableCorrelationSketch>,
        snapshot: Arc<dyn IndexSnapshot>,
        estimator: CorrelationType,
    ) -> Self {
        Hit {
            id,
            score,
            doc,
            query,
            snapshot,
            estimator,
            sketch: OnceLock::new(),
            estimate: OnceLock::new(),
            rerank_score: None,
        }
    }

    /// Identifier the column was indexed under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Term-overlap score given by the index.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Score assigned by reranking, if the hits were reranked.
    pub fn rerank_score(&self) -> Option<f64> {
        self.rerank_score
    }

    /// Returns the sketch of the candidate column, reading it from the index if needed.
    ///
    /// # Errors
    ///
    /// If the document can not be read or its stored fields are corrupt.
    pub fn sketch(&self) -> Result<&ImmutableCorrelationSketch, Error> {
        if let Some(sketch) = self.sketch.get() {
            return Ok(sketch);
        }
        let document = self.snapshot.document(self.doc)?;
        let sketch = read_sketch(&document, self.estimator)?;
        Ok(self.sketch.get_or_init(|| sketch))
    }

    /// Estimates the join correlation between the query and the candidate column.
    ///
    /// # Errors
    ///
    /// See [`sketch`](Self::sketch).
    pub fn estimate(&self) -> Result<Estimate, Error> {
        if let Some(estimate) = self.estimate.get() {
            return Ok(*estimate);
        }
        let estimate = self.query.correlation_to(self.sketch()?)?;
        Ok(*self.estimate.get_or_init(|| estimate))
    }

    /// Shorthand for the coefficient of [`estimate`](Self::estimate).
    ///
    /// # Errors
    ///
    /// See [`sketch`](Self::sketch).
    pub fn correlation(&self) -> Result<f64, Error> {
        self.estimate().map(|e| e.coefficient)
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hit {{ id: {:?}, score: {:.3}", self.id, self.score)?;
        if let Some(rerank_score) = self.rerank_score {
            write!(f, ", rerank_score: {rerank_score:.3}")?;
        }
        if let Some(estimate) = self.estimate.get() {
            write!(f, ", correlation: {:.3}", estimate.coefficient)?;
        }
        write!(f, " }}")
    }
}

/// Sorts hits by decreasing absolute correlation with the query. `NaN` correlations rank as
/// zero; equal scores keep their index order.
pub(crate) fn rerank_by_correlation(hits: &mut [Hit]) -> Result<(), Error> {
    for hit in hits.iter_mut() {
        let abs = hit.correlation()?.abs();
        let score = if abs.is_nan() { 0.0 } else { abs };
        tracing::trace!(id = %hit.id, score, "rerank");
        hit.rerank_score = Some(score);
    }
    hits.sort_by(|a, b| {
        let a = a.rerank_score.unwrap_or_default();
        let b = b.rerank_score.unwrap_or_default();
        b.total_cmp(&a)
    });
    Ok(())
}
