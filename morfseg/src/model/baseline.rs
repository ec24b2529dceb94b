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

use std::fmt::Display;

use itertools::Itertools;

use crate::config::{Algorithm, Config};
use crate::construction::{Atom, ConstructionMethods, Word, WordMethods};
use crate::cost::Cost;
use crate::error::{MorfsegError, MorfsegResult};
use crate::model::{DataPoint, Model};

/// The monolingual model: words are atom sequences, the cost is a
/// single lexicon and corpus pair.
pub type BaselineModel<A> = Model<WordMethods<A>, Cost<A>>;

impl<A> Model<WordMethods<A>, Cost<A>>
where
    A: Atom + Display + From<char>,
{
    pub fn new(corpusweight: Option<f64>) -> BaselineModel<A> {
        Model::with_methods(WordMethods::new(), corpusweight)
    }

    /// Builds a model over a configured algebra (forced splits, nosplit
    /// pattern).
    pub fn with_methods(cc: WordMethods<A>, corpusweight: Option<f64>) -> BaselineModel<A> {
        let weight = corpusweight.unwrap_or(1.0);
        Model::from_parts(cc, Cost::new(weight), corpusweight)
    }

    /// Trains the model in online fashion: every compound from the data
    /// stream is added and optimized once, with model bookkeeping
    /// refreshed every `epoch_interval` compounds. Batch training can be
    /// used afterwards for further optimization.
    pub fn train_online<I>(
        &mut self,
        data: I,
        config: &Config,
        epoch_interval: usize,
    ) -> MorfsegResult<(u32, f64)>
    where
        I: IntoIterator<Item = DataPoint<Word<A>, usize>>,
    {
        self.check_segment_only()?;
        if config.algorithm == Algorithm::Flatten {
            return Err(MorfsegError::InvalidArgument(String::from(
                "flattening is not an online algorithm",
            )));
        }

        log::info!("Starting online training");

        let mut data = data.into_iter();
        let mut epochs = 0u32;
        let mut processed = 0usize;
        let mut more_tokens = true;
        while more_tokens {
            self.epoch_update(epochs);
            log::info!("Tokens processed: {}\tCost: {}", processed, self.get_cost());

            for _ in 0..epoch_interval {
                let dp = match data.next() {
                    Some(dp) => dp,
                    None => {
                        more_tokens = false;
                        break;
                    }
                };
                self.add_compound(&dp.compound, dp.count)?;
                let parts = self.cc.splitn(&dp.compound, &dp.splitlocs);
                self.set_compound_analysis(&dp.compound, &parts)?;

                let segments = match config.algorithm {
                    Algorithm::Recursive => self.recursive_optimize(&dp.compound)?,
                    Algorithm::Viterbi => {
                        self.viterbi_optimize(&dp.compound, config.addcount, config.maxlen)?
                    }
                    Algorithm::Flatten => unreachable!(),
                };
                if log::log_enabled!(log::Level::Debug) {
                    log::debug!(
                        "#{}: {} -> {}",
                        processed,
                        self.cc.to_string(&dp.compound),
                        segments.iter().map(|s| self.cc.to_string(s)).join(" + ")
                    );
                }
                processed += 1;
            }

            epochs += 1;
            if let Some(max_epochs) = config.max_epochs {
                if epochs >= max_epochs {
                    log::info!("Max number of epochs reached, stop training");
                    break;
                }
            }
        }

        self.epoch_update(epochs);
        let newcost = self.get_cost();
        log::info!("Tokens processed: {}\tCost: {}", processed, newcost);
        Ok((epochs, newcost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_training_processes_every_compound() {
        let mut model: BaselineModel<char> = BaselineModel::new(None);
        let data: Vec<DataPoint<Word<char>, usize>> = ["cats", "cat", "dogs", "dog"]
            .iter()
            .map(|&w| DataPoint {
                compound: Word::from(w),
                count: 1,
                splitlocs: Vec::new(),
            })
            .collect();
        let config = Config::default();
        let (epochs, cost) = model.train_online(data, &config, 2).unwrap();
        assert!(epochs >= 2);
        assert!(cost > 0.0);
        assert_eq!(model.get_compounds().unwrap().len(), 4);
    }

    #[test]
    fn online_flatten_is_rejected() {
        let mut model: BaselineModel<char> = BaselineModel::new(None);
        let config = Config {
            algorithm: Algorithm::Flatten,
            ..Config::default()
        };
        assert!(model.train_online(Vec::new(), &config, 10).is_err());
    }
}
