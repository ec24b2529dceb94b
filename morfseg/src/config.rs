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

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_FINISH_THRESHOLD: f64 = 0.005;
const DEFAULT_ADDCOUNT: f64 = 1.0;
const DEFAULT_MAXLEN: usize = 30;
const DEFAULT_EDIT_WEIGHT: f64 = 1.0;

/// Config Error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// The splitting algorithm applied to each compound during an epoch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Recursive binary splitting driven by trial count changes
    Recursive,

    /// Viterbi re-segmentation against the current lexicon
    Viterbi,

    /// Replace every analysis tree by its flat leaf segmentation
    Flatten,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Recursive
    }
}

impl FromStr for Algorithm {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recursive" => Ok(Algorithm::Recursive),
            "viterbi" => Ok(Algorithm::Viterbi),
            "flatten" => Ok(Algorithm::Flatten),
            _ => Err("algorithm must be one of \"recursive\", \"viterbi\" or \"flatten\""),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let repr = match self {
            Algorithm::Recursive => "recursive",
            Algorithm::Viterbi => "viterbi",
            Algorithm::Flatten => "flatten",
        };
        f.write_str(repr)
    }
}

/// Training settings merged from a config file and defaults
#[derive(Clone, Debug)]
pub struct Config {
    pub algorithm: Algorithm,

    /// Weight of the corpus code length; `None` means 1.0
    pub corpusweight: Option<f64>,

    /// Stopping slack per compound token
    pub finish_threshold: f64,

    /// Epoch cap; `None` means unbounded
    pub max_epochs: Option<u32>,

    /// Additive smoothing constant for Viterbi segmentation
    pub addcount: f64,

    /// Maximum segment length for Viterbi segmentation
    pub maxlen: usize,

    /// Weight of the edit sub-model in cognate training
    pub edit_weight: f64,

    /// Seed of the per-epoch shuffle; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            algorithm: Algorithm::default(),
            corpusweight: None,
            finish_threshold: DEFAULT_FINISH_THRESHOLD,
            max_epochs: None,
            addcount: DEFAULT_ADDCOUNT,
            maxlen: DEFAULT_MAXLEN,
            edit_weight: DEFAULT_EDIT_WEIGHT,
            seed: None,
        }
    }
}

/// Struct corresponds with raw config json file.
/// You must use field names defined here as json object keys.
#[derive(Deserialize, Debug, Default)]
pub struct RawConfig {
    algorithm: Option<String>,
    corpusweight: Option<f64>,
    finish_threshold: Option<f64>,
    max_epochs: Option<u32>,
    addcount: Option<f64>,
    maxlen: Option<usize>,
    edit_weight: Option<f64>,
    seed: Option<u64>,
}

impl Config {
    /// Reads a JSON config file; absent keys fall back to the defaults.
    pub fn from_file<P: AsRef<Path>>(config_file: P) -> Result<Self, ConfigError> {
        let file = File::open(config_file)?;
        let reader = BufReader::new(file);
        let raw_config: RawConfig = serde_json::from_reader(reader)?;
        Config::from_raw(raw_config)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let algorithm = match raw.algorithm {
            Some(name) => Algorithm::from_str(&name)
                .map_err(|e| ConfigError::InvalidFormat(String::from(e)))?,
            None => defaults.algorithm,
        };
        Ok(Config {
            algorithm,
            corpusweight: raw.corpusweight,
            finish_threshold: raw.finish_threshold.unwrap_or(defaults.finish_threshold),
            max_epochs: raw.max_epochs,
            addcount: raw.addcount.unwrap_or(defaults.addcount),
            maxlen: raw.maxlen.unwrap_or(defaults.maxlen),
            edit_weight: raw.edit_weight.unwrap_or(defaults.edit_weight),
            seed: raw.seed,
        })
    }
}
