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
use crate::kmv::bottom_k::DEFAULT_K;
use crate::kmv::threshold::DEFAULT_THRESHOLD;

/// The kind of min-value synopsis backing a correlation sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SketchType {
    /// Bottom-k synopsis with a fixed number of entries.
    Kmv,
    /// Threshold synopsis with a fixed unit-hash cutoff.
    Gkmv,
}

impl SketchType {
    /// Returns the canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            SketchType::Kmv => "KMV",
            SketchType::Gkmv => "GKMV",
        }
    }
}

impl fmt::Display for SketchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SketchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KMV" => Ok(SketchType::Kmv),
            "GKMV" => Ok(SketchType::Gkmv),
            other => Err(Error::invalid_argument(format!(
                "unknown sketch type: {other}"
            ))),
        }
    }
}

/// A sketch type together with its size budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SketchOptions {
    /// Bottom-k synopsis retaining `k` entries.
    Kmv {
        /// Maximum number of retained entries.
        k: usize,
    },
    /// Threshold synopsis retaining entries with unit hash at most `t`.
    Gkmv {
        /// Unit-hash threshold in `(0, 1]`.
        t: f64,
    },
}

impl Default for SketchOptions {
    fn default() -> Self {
        SketchOptions::Kmv { k: DEFAULT_K }
    }
}

impl SketchOptions {
    /// Parses the budget of the given sketch type, e.g. `"256"` for KMV or `"0.1"` for GKMV.
    ///
    /// The budget is only parsed here; its range is validated when a sketch is built.
    ///
    /// # Examples
    ///
    /// ```
    /// # use corrsketches::kmv::SketchOptions;
    /// # use corrsketches::kmv::SketchType;
    /// let options = SketchOptions::parse(SketchType::Gkmv, "0.5").unwrap();
    /// assert_eq!(options, SketchOptions::Gkmv { t: 0.5 });
    /// assert_eq!(options.name(), "GKMV:t=0.5");
    /// ```
    pub fn parse(sketch_type: SketchType, budget: &str) -> Result<Self, Error> {
        let budget = budget.trim();
        match sketch_type {
            SketchType::Kmv => budget
                .parse::<usize>()
                .map(|k| SketchOptions::Kmv { k })
                .map_err(|err| {
                    Error::invalid_argument(format!("invalid KMV budget: {err}"))
                        .with_context("budget", budget)
                }),
            SketchType::Gkmv => budget
                .parse::<f64>()
                .map(|t| SketchOptions::Gkmv { t })
                .map_err(|err| {
                    Error::invalid_argument(format!("invalid GKMV budget: {err}"))
                        .with_context("budget", budget)
                }),
        }
    }

    /// Options for a GKMV synopsis with the default threshold.
    pub fn default_gkmv() -> Self {
        SketchOptions::Gkmv {
            t: DEFAULT_THRESHOLD,
        }
    }

    /// Returns the sketch type of these options.
    pub fn sketch_type(&self) -> SketchType {
        match self {
            SketchOptions::Kmv { .. } => SketchType::Kmv,
            SketchOptions::Gkmv { .. } => SketchType::Gkmv,
        }
    }

    /// Returns a short label such as `KMV:k=256`.
    pub fn name(&self) -> String {
        match self {
            SketchOptions::Kmv { k } => format!("KMV:k={k}"),
            SketchOptions::Gkmv { t } => format!("GKMV:t={t}"),
        }
    }
}

impl fmt::Display for SketchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("kmv".parse::<SketchType>().unwrap(), SketchType::Kmv);
        assert_eq!(" GKMV ".parse::<SketchType>().unwrap(), SketchType::Gkmv);
        assert!("hll".parse::<SketchType>().is_err());

        let kmv = SketchOptions::parse(SketchType::Kmv, "128").unwrap();
        assert_eq!(kmv, SketchOptions::Kmv { k: 128 });
        assert_eq!(kmv.sketch_type(), SketchType::Kmv);
        assert!(SketchOptions::parse(SketchType::Kmv, "0.1").is_err());
    }

    #[test]
    fn test_name() {
        assert_eq!(SketchOptions::default().name(), "KMV:k=256");
        assert_eq!(SketchOptions::default_gkmv().name(), "GKMV:t=0.1");
    }
}
