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

//! # Correlation sketches
//!
//! Sketches that estimate, without computing a join, how strongly two numeric columns of
//! different tables would correlate if joined on a shared key column.
//!
//! A [`sketch::CorrelationSketch`] keeps a min-value synopsis ([`kmv`]) of the hashed keys of
//! a column together with the (aggregated) values of the retained keys. Two sketches estimate
//! the overlap of their key sets, and pairing their retained entries by key yields a sample of
//! the joined column pair on which any estimator of [`correlation`] can run.
//!
//! The [`index`] module builds a searchable collection of sketches, retrieving the columns that
//! are joinable with and correlated to a query column.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod aggregate;
pub mod column;
pub mod correlation;
pub mod error;
pub mod hash;
pub mod index;
pub mod join;
pub mod kmv;
pub mod sketch;
pub mod statistics;

pub(crate) mod codec;
pub(crate) mod common;
