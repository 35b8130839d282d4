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

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;
use parking_lot::RwLock;

use crate::error::Error;
use crate::index::backend::Document;
use crate::index::backend::IndexBackend;
use crate::index::backend::IndexSnapshot;
use crate::index::backend::Query;
use crate::index::backend::ScoreDoc;
use crate::index::backend::Term;

/// Segments with more tombstones than this, and more tombstones than live documents, are
/// renumbered by the writer.
const COMPACT_MIN_TOMBSTONES: usize = 32;

/// Documents and postings. Deleted documents keep their number as a tombstone until the
/// segment is compacted; their postings are removed on delete.
///
/// Posting lists are shared between the writer and published snapshots and copied on write.
#[derive(Debug, Default, Clone)]
struct Segment {
    docs: Vec<Option<Arc<Document>>>,
    postings: HashMap<Term, Arc<Vec<usize>>>,
    live: usize,
}

impl Segment {
    fn delete(&mut self, doc: usize) {
        let Some(removed) = self.docs.get_mut(doc).and_then(Option::take) else {
            return;
        };
        self.live -= 1;
        for term in removed.terms() {
            if let Some(docs) = self.postings.get_mut(term) {
                if docs.contains(&doc) {
                    Arc::make_mut(docs).retain(|&d| d != doc);
                }
                if docs.is_empty() {
                    self.postings.remove(term);
                }
            }
        }
    }

    fn add(&mut self, doc: Arc<Document>) -> usize {
        let number = self.docs.len();
        for term in doc.terms() {
            let docs = self.postings.entry(term.clone()).or_default();
            // a term repeated inside one document is posted once
            if docs.last() != Some(&number) {
                Arc::make_mut(docs).push(number);
            }
        }
        self.docs.push(Some(doc));
        self.live += 1;
        number
    }

    fn tombstones(&self) -> usize {
        self.docs.len() - self.live
    }

    fn needs_compaction(&self) -> bool {
        let tombstones = self.tombstones();
        tombstones > COMPACT_MIN_TOMBSTONES && tombstones > self.live
    }

    /// Renumbers live documents densely, keeping their order. Returns the new number of every
    /// old live document number.
    fn compact(&mut self) -> HashMap<usize, usize> {
        let docs = std::mem::take(&mut self.docs);
        self.postings.clear();
        self.live = 0;
        let mut renumbered = HashMap::with_capacity(docs.len());
        for (old, doc) in docs.into_iter().enumerate() {
            if let Some(doc) = doc {
                renumbered.insert(old, self.add(doc));
            }
        }
        renumbered
    }

    fn score(&self, query: &Query) -> HashMap<usize, f32> {
        match query {
            Query::Term(term) => self
                .postings
                .get(term)
                .into_iter()
                .flat_map(|docs| docs.iter())
                .map(|&doc| (doc, 1.0))
                .collect(),
            Query::Disjunction(clauses) => {
                let mut scores = HashMap::new();
                for clause in clauses {
                    for (doc, score) in self.score(clause) {
                        *scores.entry(doc).or_insert(0.0) += score;
                    }
                }
                scores
            }
            Query::DisjunctionMax {
                queries,
                tie_breaker,
            } => {
                // (max, sum) per document
                let mut best: HashMap<usize, (f32, f32)> = HashMap::new();
                for query in queries {
                    for (doc, score) in self.score(query) {
                        let (max, sum) = best.entry(doc).or_insert((0.0, 0.0));
                        if score > *max {
                            *max = score;
                        }
                        *sum += score;
                    }
                }
                best.into_iter()
                    .map(|(doc, (max, sum))| (doc, max + tie_breaker * (sum - max)))
                    .collect()
            }
        }
    }
}

/// Read-only view published by [`MemoryIndex::refresh`].
#[derive(Debug)]
pub struct MemorySnapshot {
    segment: Segment,
}

impl IndexSnapshot for MemorySnapshot {
    fn search(&self, query: &Query, top_k: usize) -> Result<Vec<ScoreDoc>, Error> {
        if top_k == 0 {
            return Err(Error::invalid_argument("top_k must be at least 1"));
        }
        let mut hits: Vec<ScoreDoc> = self
            .segment
            .score(query)
            .into_iter()
            .map(|(doc, score)| ScoreDoc { doc, score })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc.cmp(&b.doc)));
        hits.truncate(top_k);
        Ok(hits)
    }

    fn document(&self, doc: usize) -> Result<Arc<Document>, Error> {
        match self.segment.docs.get(doc) {
            Some(Some(document)) => Ok(document.clone()),
            _ => Err(Error::backend("document does not exist").with_context("doc", doc)),
        }
    }

    fn num_docs(&self) -> usize {
        self.segment.live
    }
}

#[derive(Debug, Default)]
struct Writer {
    segment: Segment,
    ids: HashMap<Term, usize>,
    dirty: bool,
}

impl Writer {
    fn update(&mut self, id: Term, doc: Document) {
        if let Some(previous) = self.ids.remove(&id) {
            self.segment.delete(previous);
        }
        let number = self.segment.add(Arc::new(doc));
        self.ids.insert(id, number);
        if self.segment.needs_compaction() {
            let renumbered = self.segment.compact();
            for number in self.ids.values_mut() {
                if let Some(&new) = renumbered.get(number) {
                    *number = new;
                }
            }
        }
        self.dirty = true;
    }
}

/// An [`IndexBackend`] kept entirely in memory.
///
/// Writes are serialized by an internal lock. Each [`refresh`](IndexBackend::refresh) publishes
/// the written documents as a new [`MemorySnapshot`]; snapshots taken earlier are not
/// affected. Documents and unchanged posting lists are shared with published snapshots.
#[derive(Debug)]
pub struct MemoryIndex {
    writer: Mutex<Writer>,
    published: RwLock<Arc<MemorySnapshot>>,
    closed: AtomicBool,
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        MemoryIndex {
            writer: Mutex::new(Writer::default()),
            published: RwLock::new(Arc::new(MemorySnapshot {
                segment: Segment::default(),
            })),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::backend("index is closed"));
        }
        Ok(())
    }
}

impl IndexBackend for MemoryIndex {
    fn update_document(&self, id: Term, doc: Document) -> Result<(), Error> {
        self.ensure_open()?;
        self.writer.lock().update(id, doc);
        Ok(())
    }

    fn refresh(&self) -> Result<(), Error> {
        self.ensure_open()?;
        let mut writer = self.writer.lock();
        if !writer.dirty {
            return Ok(());
        }
        let segment = writer.segment.clone();
        writer.dirty = false;
        // publish under the writer lock so refreshes cannot overtake each other
        *self.published.write() = Arc::new(MemorySnapshot { segment });
        Ok(())
    }

    fn snapshot(&self) -> Result<Arc<dyn IndexSnapshot>, Error> {
        self.ensure_open()?;
        let snapshot: Arc<MemorySnapshot> = self.published.read().clone();
        Ok(snapshot)
    }

    fn close(&self) -> Result<(), Error> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(Error::backend("index is already closed"));
        }
        Ok(())
    }
}
