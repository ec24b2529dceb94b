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

use std::io::Error;
use thiserror::Error;

use crate::config::ConfigError;

pub type MorfsegResult<T> = Result<T, MorfsegError>;

/// Morfseg error
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MorfsegError {
    #[error("{context}: {cause}")]
    Io {
        cause: std::io::Error,
        context: String,
    },

    #[error("Parse Int Error")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config Error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid data format: {1} at line {0}")]
    InvalidDataFormat(usize, String),

    #[error("Count of construction '{key}' is {count}")]
    InvalidConstructionCount { key: String, count: i64 },

    #[error("Model is reduced for segmentation only and cannot be modified")]
    SegmentOnlyModel,

    #[error("Compound '{0}' is not present in the training data")]
    MissingCompound(String),
}

impl From<std::io::Error> for MorfsegError {
    fn from(e: Error) -> Self {
        MorfsegError::Io {
            cause: e,
            context: String::from("IO Error"),
        }
    }
}
