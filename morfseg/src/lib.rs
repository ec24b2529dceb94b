/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Unsupervised segmentation of words into morph-like units by
//! minimum-description-length optimization, with a bilingual extension
//! that couples the lexicons of two languages through cognate pairs.
//!
//! Costs are code lengths in nats throughout; no probabilities are stored.

pub mod config;
pub mod construction;
pub mod cost;
pub mod error;
pub mod io;
pub mod model;
pub(crate) mod util;

pub mod prelude {
    pub use crate::{
        config::Algorithm, config::Config, error::MorfsegError, error::MorfsegResult,
        model::baseline::BaselineModel, model::cognate::CognateModel, model::DataPoint,
    };
}
