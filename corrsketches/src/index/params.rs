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

use crate::error::Error;
use crate::index::IndexKind;
use crate::index::SketchIndexBuilder;
use crate::index::SortBy;
use crate::kmv::SketchOptions;
use crate::kmv::SketchType;
use crate::sketch::CorrelationSketchBuilder;

/// A full index configuration in its textual form `KIND:SORT:TOP_K:SKETCH_TYPE:BUDGET`, for
/// example `QCR:KEY:100:KMV:256` or `STD:CSK:50:GKMV:0.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexParams {
    /// Terms generated per column.
    pub kind: IndexKind,
    /// Hit order.
    pub sort_by: SortBy,
    /// Number of hits to retrieve per query.
    pub top_k: usize,
    /// Synopsis type and budget.
    pub sketch: SketchOptions,
}

impl IndexParams {
    /// Parses a comma separated list of configurations.
    ///
    /// # Errors
    ///
    /// If any configuration is invalid, or the list holds none.
    pub fn parse_list(s: &str) -> Result<Vec<IndexParams>, Error> {
        let params = s
            .split(',')
            .filter(|p| !p.trim().is_empty())
            .map(str::parse::<IndexParams>)
            .collect::<Result<Vec<_>, _>>()?;
        if params.is_empty() {
            return Err(Error::invalid_argument(format!(
                "[{s}] does not have any valid index parameters"
            )));
        }
        Ok(params)
    }

    /// Applies these parameters to an index builder, using `sketch` for everything but the
    /// synopsis options.
    pub fn apply(&self, sketch: CorrelationSketchBuilder) -> SketchIndexBuilder {
        SketchIndexBuilder::default()
            .kind(self.kind)
            .sort_by(self.sort_by)
            .sketch(sketch.sketch(self.sketch))
    }
}

impl fmt::Display for IndexParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let budget = match self.sketch {
            SketchOptions::Kmv { k } => k.to_string(),
            SketchOptions::Gkmv { t } => t.to_string(),
        };
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.kind,
            self.sort_by,
            self.top_k,
            self.sketch.sketch_type(),
            budget
        )
    }
}

impl FromStr for IndexParams {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let [kind, sort_by, top_k, sketch_type, budget] = parts[..] else {
            return Err(Error::invalid_argument(
                "index parameters must have 5 fields: KIND:SORT:TOP_K:SKETCH_TYPE:BUDGET",
            )
            .with_context("input", s));
        };
        let top_k = top_k.trim().parse::<usize>().map_err(|err| {
            Error::invalid_argument(format!("invalid top-k: {err}")).with_context("input", s)
        })?;
        let sketch_type = sketch_type.parse::<SketchType>()?;
        Ok(IndexParams {
            kind: kind.parse()?,
            sort_by: sort_by.parse()?,
            top_k,
            sketch: SketchOptions::parse(sketch_type, budget)?,
        })
    }
}
