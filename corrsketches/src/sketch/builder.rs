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

use crate::aggregate::AggregateFunction;
use crate::correlation::CorrelationType;
use crate::error::Error;
use crate::kmv::SketchOptions;
use crate::kmv::Synopsis;
use crate::sketch::CorrelationSketch;

/// Builder for CorrelationSketch
///
/// The builder is `Copy`, so one configured builder can produce sketches for many columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationSketchBuilder {
    function: AggregateFunction,
    options: SketchOptions,
    estimator: CorrelationType,
    cardinality: Option<usize>,
}

impl CorrelationSketchBuilder {
    /// Set the function combining values of rows that share a key. Defaults to `FIRST`.
    pub fn aggregate_function(mut self, function: AggregateFunction) -> Self {
        self.function = function;
        self
    }

    /// Set the synopsis type and budget. Defaults to KMV with `k = 256`.
    pub fn sketch(mut self, options: SketchOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the default correlation estimator. Defaults to Pearson.
    pub fn estimator(mut self, estimator: CorrelationType) -> Self {
        self.estimator = estimator;
        self
    }

    pub(crate) fn configured_estimator(&self) -> CorrelationType {
        self.estimator
    }

    /// Set a known number of distinct keys, overriding the synopsis estimate.
    pub fn cardinality(mut self, cardinality: usize) -> Self {
        self.cardinality = Some(cardinality);
        self
    }

    /// Build an empty sketch.
    ///
    /// # Errors
    ///
    /// If the synopsis budget is invalid.
    pub fn build(self) -> Result<CorrelationSketch, Error> {
        let synopsis = Synopsis::new(self.options, self.function)?;
        let mut sketch = CorrelationSketch::from_synopsis(synopsis, self.estimator);
        sketch.set_cardinality(self.cardinality);
        Ok(sketch)
    }

    /// Build a sketch of the column made of `keys` and `values`.
    ///
    /// # Errors
    ///
    /// If the synopsis budget is invalid, or `keys` and `values` have different lengths.
    pub fn build_from<S: AsRef<str>>(
        self,
        keys: &[S],
        values: &[f64],
    ) -> Result<CorrelationSketch, Error> {
        let mut sketch = self.build()?;
        sketch.update_all(keys, values)?;
        Ok(sketch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::kmv::SketchType;

    #[test]
    fn test_build_options() {
        let sketch = CorrelationSketch::builder()
            .sketch(SketchOptions::Gkmv { t: 0.5 })
            .estimator(CorrelationType::Spearman)
            .cardinality(10)
            .build()
            .unwrap();
        assert_eq!(sketch.synopsis().sketch_type(), SketchType::Gkmv);
        assert_eq!(sketch.estimator(), CorrelationType::Spearman);
        assert_eq!(sketch.cardinality(), 10.0);
    }

    #[test]
    fn test_invalid_budget() {
        let err = CorrelationSketch::builder()
            .sketch(SketchOptions::Kmv { k: 0 })
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = CorrelationSketch::builder()
            .build_from(&["a"], &[1.0, 2.0])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
