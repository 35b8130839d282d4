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

//! Search over indexed correlation sketches.
//!
//! A [`SketchIndex`] stores the frozen sketch of every indexed column in an [`IndexBackend`] and
//! retrieves the columns whose sketches share the most terms with a query sketch. With
//! [`IndexKind::Std`] the terms are key hashes, so hits are ranked by key overlap. The QCR kinds
//! index sign keys instead: the hash of each key together with the sign of its value relative to
//! the column mean. Sharing a sign key means sharing a key *and* deviating from the mean in the
//! same direction, so term overlap approximates the strength of the correlation. Matching the
//! negated signs as well retrieves negatively correlated columns.
//!
//! Hits can be reranked by the correlation estimated from the stored sketches
//! ([`SortBy::Csk`]).

mod backend;
mod hit;
mod memory;
mod params;
mod sign_keys;
mod sketch_index;
mod wire;

pub use self::backend::Document;
pub use self::backend::IndexBackend;
pub use self::backend::IndexSnapshot;
pub use self::backend::Query;
pub use self::backend::ScoreDoc;
pub use self::backend::Term;
pub use self::hit::Hit;
pub use self::hit::SortBy;
pub use self::memory::MemoryIndex;
pub use self::memory::MemorySnapshot;
pub use self::params::IndexParams;
pub use self::sketch_index::IndexKind;
pub use self::sketch_index::SketchIndex;
pub use self::sketch_index::SketchIndexBuilder;
