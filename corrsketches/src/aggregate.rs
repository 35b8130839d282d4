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

//! Aggregation of values that share a key.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Function used to combine the values of rows that share the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AggregateFunction {
    /// Keep the first value seen.
    #[default]
    First,
    /// Keep the last value seen.
    Last,
    /// Keep the largest value.
    Max,
    /// Keep the smallest value.
    Min,
    /// Sum all values.
    Sum,
    /// Arithmetic mean of all values.
    Mean,
    /// Number of values; the values themselves are ignored.
    Count,
}

impl AggregateFunction {
    /// Returns every aggregate function, in declaration order.
    pub fn all() -> [AggregateFunction; 7] {
        [
            AggregateFunction::First,
            AggregateFunction::Last,
            AggregateFunction::Max,
            AggregateFunction::Min,
            AggregateFunction::Sum,
            AggregateFunction::Mean,
            AggregateFunction::Count,
        ]
    }

    /// Returns the canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            AggregateFunction::First => "FIRST",
            AggregateFunction::Last => "LAST",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Mean => "MEAN",
            AggregateFunction::Count => "COUNT",
        }
    }

    /// Starts a new aggregation with its first value.
    pub fn start(self, value: f64) -> Aggregate {
        let value = match self {
            AggregateFunction::Count => 1.0,
            _ => value,
        };
        Aggregate {
            function: self,
            value,
            count: 1,
        }
    }

    /// Folds a whole slice. Returns `NaN` for an empty slice.
    pub fn aggregate(self, values: &[f64]) -> f64 {
        let Some((first, rest)) = values.split_first() else {
            return f64::NAN;
        };
        let mut aggregate = self.start(*first);
        for v in rest {
            aggregate.update(*v);
        }
        aggregate.value()
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregateFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AggregateFunction::all()
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::invalid_argument(format!("unknown aggregate function: {s}"))
            })
    }
}

/// Running state of one aggregation.
///
/// The number of values folded so far is tracked so that [`AggregateFunction::Mean`] stays exact
/// regardless of how many values arrive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    function: AggregateFunction,
    value: f64,
    count: u64,
}

impl Aggregate {
    /// Folds one more value into the aggregate.
    pub fn update(&mut self, current: f64) {
        self.count += 1;
        let previous = self.value;
        self.value = match self.function {
            AggregateFunction::First => previous,
            AggregateFunction::Last => current,
            AggregateFunction::Max => previous.max(current),
            AggregateFunction::Min => previous.min(current),
            AggregateFunction::Sum => previous + current,
            AggregateFunction::Mean => previous + (current - previous) / self.count as f64,
            AggregateFunction::Count => previous + 1.0,
        };
    }

    /// Returns the aggregated value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the number of values folded into this aggregate.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the function this aggregate applies.
    pub fn function(&self) -> AggregateFunction {
        self.function
    }
}
