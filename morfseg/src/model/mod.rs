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

//! The segmentation model: a store of analysis trees over an algebra of
//! constructions, kept in exact sync with a cost model through paired
//! count deltas, and the optimizers that reshape the trees.

use std::cmp;
use std::collections::HashMap;
use std::iter;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::{Algorithm, Config};
use crate::construction::ConstructionMethods;
use crate::cost::CostModel;
use crate::error::{MorfsegError, MorfsegResult};
use crate::util::tail;

pub mod baseline;
pub mod cognate;

/// One record of the training data stream.
#[derive(Clone, Debug)]
pub struct DataPoint<C, L> {
    pub compound: C,
    pub count: i64,
    /// Boundaries of an initial segmentation; may be empty.
    pub splitlocs: Vec<L>,
}

/// State of one known construction.
///
/// `rcount` counts real occurrences in the training corpus and is
/// non-zero only for loaded compounds. `count` is the current frequency
/// under the present analysis. A node with split locations is virtual
/// and decomposes into children; a node without is a real morph.
#[derive(Clone, Debug)]
struct ConstrNode<L> {
    rcount: i64,
    count: i64,
    splitloc: Vec<L>,
}

/// A segmentation model over any construction algebra and cost model.
///
/// The analysis store is the canonical tree state: for every compound
/// the sum of `count` contributions of the subtree below it equals its
/// loaded count, and every real leaf with a positive count is present in
/// the cost model's lexicon.
pub struct Model<CC, M>
where
    CC: ConstructionMethods,
    M: CostModel<Construction = CC::Construction>,
{
    cc: CC,
    cost: M,
    analyses: HashMap<CC::Construction, ConstrNode<CC::SplitLoc>>,
    corpus_weight: f64,
    segment_only: bool,
}

impl<CC, M> Model<CC, M>
where
    CC: ConstructionMethods,
    M: CostModel<Construction = CC::Construction>,
{
    pub fn from_parts(cc: CC, cost: M, corpusweight: Option<f64>) -> Model<CC, M> {
        let mut model = Model {
            cc,
            cost,
            analyses: HashMap::new(),
            corpus_weight: corpusweight.unwrap_or(1.0),
            segment_only: false,
        };
        model.epoch_update(0);
        model
    }

    pub fn cc(&self) -> &CC {
        &self.cc
    }

    /// Number of construction tokens under the current analysis.
    pub fn tokens(&self) -> i64 {
        self.cost.tokens()
    }

    /// Number of construction types, not counting the end-of-compound
    /// symbol.
    pub fn types(&self) -> i64 {
        self.cost.types() - 1
    }

    /// Current total code length of lexicon and corpus, in nats.
    pub fn get_cost(&self) -> f64 {
        self.cost.cost()
    }

    pub fn get_corpus_coding_weight(&self) -> f64 {
        self.corpus_weight
    }

    pub fn set_corpus_coding_weight(&mut self, weight: f64) -> MorfsegResult<()> {
        self.check_segment_only()?;
        self.corpus_weight = weight;
        self.cost.set_corpus_coding_weight(weight);
        Ok(())
    }

    fn check_segment_only(&self) -> MorfsegResult<()> {
        if self.segment_only {
            Err(MorfsegError::SegmentOnlyModel)
        } else {
            Ok(())
        }
    }

    /// Model updates between training epochs; returns the number of
    /// forced epochs requested. The fixed corpus weight never forces
    /// any, it is only re-applied to the cost model.
    fn epoch_update(&mut self, _epochs: u32) -> u32 {
        self.cost.set_corpus_coding_weight(self.corpus_weight);
        0
    }

    /// Adds `c` occurrences of a compound to the data. For construction
    /// shapes with coupled projections, the projections are loaded
    /// alongside with the same count.
    pub fn add_compound(&mut self, compound: &CC::Construction, c: i64) -> MorfsegResult<()> {
        self.check_segment_only()?;
        self.add_compound_inner(compound, c);
        for projection in self.cc.projections(compound) {
            self.add_compound_inner(&projection, c);
        }
        Ok(())
    }

    fn add_compound_inner(&mut self, compound: &CC::Construction, c: i64) {
        self.cost.update_boundaries(compound, c);
        self.modify_construction_count(compound, c);
        if let Some(node) = self.analyses.get_mut(compound) {
            node.rcount += c;
        }
    }

    /// Detaches a construction from the counts, returning its
    /// `(rcount, count)` so it can be reinstated.
    fn remove(&mut self, construction: &CC::Construction) -> MorfsegResult<(i64, i64)> {
        let (rcount, count) = match self.analyses.get(construction) {
            Some(node) => (node.rcount, node.count),
            None => {
                return Err(MorfsegError::InvalidConstructionCount {
                    key: self.cc.to_string(construction),
                    count: 0,
                })
            }
        };
        self.modify_construction_count(construction, -count);
        Ok((rcount, count))
    }

    /// Replaces the analysis of a compound with the given segmentation.
    /// Coupled projections present in the store follow the same
    /// boundaries.
    fn set_compound_analysis(
        &mut self,
        compound: &CC::Construction,
        parts: &[CC::Construction],
    ) -> MorfsegResult<()> {
        let locs = if parts.len() == 1 {
            Vec::new()
        } else {
            self.cc.parts_to_splitlocs(parts)
        };

        let (rcount, count) = self.remove(compound)?;
        if parts.len() == 1 {
            self.analyses.insert(
                compound.clone(),
                ConstrNode {
                    rcount,
                    count: 0,
                    splitloc: Vec::new(),
                },
            );
            self.modify_construction_count(compound, count);
        } else {
            self.analyses.insert(
                compound.clone(),
                ConstrNode {
                    rcount,
                    count,
                    splitloc: locs.clone(),
                },
            );
            for part in parts {
                self.modify_construction_count(part, count);
            }
        }

        for projection in self.cc.projections(compound) {
            if !self.analyses.contains_key(&projection) {
                continue;
            }
            let (prcount, pcount) = self.remove(&projection)?;
            if parts.len() == 1 {
                self.analyses.insert(
                    projection.clone(),
                    ConstrNode {
                        rcount: prcount,
                        count: 0,
                        splitloc: Vec::new(),
                    },
                );
                self.modify_construction_count(&projection, pcount);
            } else {
                self.analyses.insert(
                    projection.clone(),
                    ConstrNode {
                        rcount: prcount,
                        count: pcount,
                        splitloc: locs.clone(),
                    },
                );
                for child in self.cc.splitn(&projection, &locs) {
                    self.modify_construction_count(&child, pcount);
                }
            }
        }
        Ok(())
    }

    /// The master delta routine. Virtual constructions recurse into
    /// their children; real constructions flow into the cost model. A
    /// node returning to zero count leaves the store.
    fn modify_construction_count(&mut self, construction: &CC::Construction, dcount: i64) {
        if dcount == 0 {
            return;
        }
        let (rcount, count, splitloc) = match self.analyses.get(construction) {
            Some(node) => (node.rcount, node.count, node.splitloc.clone()),
            None => (0, 0, Vec::new()),
        };
        let newcount = count + dcount;
        if newcount == 0 {
            self.analyses.remove(construction);
        } else {
            self.analyses.insert(
                construction.clone(),
                ConstrNode {
                    rcount,
                    count: newcount,
                    splitloc: splitloc.clone(),
                },
            );
        }
        if !splitloc.is_empty() {
            for child in self.cc.splitn(construction, &splitloc) {
                self.modify_construction_count(&child, dcount);
            }
        } else {
            self.cost.update(construction, dcount);
        }
    }

    /// Current count of a real construction; zero when absent or
    /// virtual. Counts of projections are read from the side books of
    /// the cost model.
    pub fn get_construction_count(&self, construction: &CC::Construction) -> MorfsegResult<i64> {
        if let Some(count) = self.cost.lookup_count(construction) {
            return Ok(count);
        }
        match self.analyses.get(construction) {
            Some(node) if node.splitloc.is_empty() => {
                if node.count <= 0 {
                    return Err(MorfsegError::InvalidConstructionCount {
                        key: self.cc.to_string(construction),
                        count: node.count,
                    });
                }
                Ok(node.count)
            }
            _ => Ok(0),
        }
    }

    /// The compound types stored by the model, in sorted order.
    pub fn get_compounds(&self) -> MorfsegResult<Vec<CC::Construction>> {
        self.check_segment_only()?;
        let mut compounds: Vec<CC::Construction> = self
            .analyses
            .iter()
            .filter(|(_, node)| node.rcount > 0)
            .map(|(c, _)| c.clone())
            .collect();
        compounds.sort();
        Ok(compounds)
    }

    /// The present real constructions and their counts, in sorted order.
    pub fn get_constructions(&self) -> Vec<(CC::Construction, i64)> {
        let mut constructions: Vec<(CC::Construction, i64)> = self
            .analyses
            .iter()
            .filter(|(_, node)| node.splitloc.is_empty())
            .map(|(c, node)| (c.clone(), node.count))
            .collect();
        constructions.sort();
        constructions
    }

    /// Segmentations of every loaded compound as
    /// `(count, compound, segments)` triples, in sorted compound order.
    pub fn get_segmentations(
        &self,
    ) -> MorfsegResult<Vec<(i64, CC::Construction, Vec<CC::Construction>)>> {
        let mut out = Vec::new();
        for compound in self.get_compounds()? {
            let rcount = self.analyses[&compound].rcount;
            let segments = self.segment(&compound)?;
            out.push((rcount, compound, segments));
        }
        Ok(out)
    }

    /// Loads batch training data. Returns the total cost afterwards.
    pub fn load_data<I>(&mut self, data: I) -> MorfsegResult<f64>
    where
        I: IntoIterator<Item = DataPoint<CC::Construction, CC::SplitLoc>>,
    {
        self.check_segment_only()?;
        for dp in data {
            if dp.count == 0 {
                log::warn!(
                    "skipping compound '{}' with zero count",
                    self.cc.to_string(&dp.compound)
                );
                continue;
            }
            self.add_compound(&dp.compound, dp.count)?;
            let parts = self.cc.splitn(&dp.compound, &dp.splitlocs);
            self.set_compound_analysis(&dp.compound, &parts)?;
        }
        Ok(self.get_cost())
    }

    /// Loads existing segmentations as the initial analyses.
    pub fn load_segmentations<I>(&mut self, segmentations: I) -> MorfsegResult<f64>
    where
        I: IntoIterator<Item = (i64, CC::Construction, Vec<CC::Construction>)>,
    {
        self.check_segment_only()?;
        for (count, compound, constructions) in segmentations {
            if !self.cc.is_valid_analysis(&compound, &constructions) {
                return Err(MorfsegError::InvalidArgument(format!(
                    "segmentation of '{}' does not concatenate back to it",
                    self.cc.to_string(&compound)
                )));
            }
            self.add_compound(&compound, count)?;
            self.set_compound_analysis(&compound, &constructions)?;
        }
        Ok(self.get_cost())
    }

    /// Segments a loaded compound by walking its analysis tree.
    pub fn segment(&self, compound: &CC::Construction) -> MorfsegResult<Vec<CC::Construction>> {
        self.check_segment_only()?;
        let node = self
            .analyses
            .get(compound)
            .ok_or_else(|| MorfsegError::MissingCompound(self.cc.to_string(compound)))?;
        if node.splitloc.is_empty() {
            return Ok(vec![compound.clone()]);
        }
        let mut constructions = Vec::new();
        for part in self.cc.splitn(compound, &node.splitloc) {
            constructions.extend(self.segment(&part)?);
        }
        Ok(constructions)
    }

    /// Finds the most probable segmentation of a compound, seen or
    /// unseen, with the Viterbi algorithm.
    ///
    /// With additive smoothing (`addcount > 0`) new construction types
    /// may be selected during the search; without it, only single-atom
    /// novelties are allowed (or longer ones when
    /// `allow_longer_unk_splits` is set). Returns the segments and the
    /// code length of the segmentation; non-finite candidate costs are
    /// never selected.
    pub fn viterbi_segment(
        &self,
        compound: &CC::Construction,
        addcount: f64,
        maxlen: usize,
        allow_longer_unk_splits: bool,
    ) -> MorfsegResult<(Vec<CC::Construction>, f64)> {
        let mut grid: HashMap<Option<CC::SplitLoc>, (f64, Option<CC::SplitLoc>)> = HashMap::new();
        grid.insert(None, (0.0, None));

        let tokens = self.cost.all_tokens() as f64 + addcount;
        let logtokens = if tokens > 0.0 { tokens.ln() } else { 0.0 };
        let newboundcost = if addcount > 0.0 {
            self.cost.newbound_cost(addcount)
        } else {
            0.0
        };
        let badlikelihood = self.cost.bad_likelihood(compound, addcount);

        let targets: Vec<Option<CC::SplitLoc>> = self
            .cc
            .split_locations(compound, None, None)
            .map(Some)
            .chain(iter::once(None))
            .collect();
        for t in targets {
            // best path to the current node; we can come from any node
            // within the window
            let mut bestcost = f64::INFINITY;
            let mut bestpath: Option<CC::SplitLoc> = None;
            let sources = tail(
                maxlen,
                iter::once(None).chain(self.cc.split_locations(compound, None, t).map(Some)),
            );
            for pt in sources {
                let ptcost = match grid.get(&pt) {
                    Some(&(c, _)) => c,
                    None => continue,
                };
                if !ptcost.is_finite() {
                    continue;
                }
                let construction = self.cc.slice(compound, pt, t);
                let count = self.get_construction_count(&construction)?;
                let mut cost = ptcost;
                if count > 0 {
                    cost += logtokens - ((count as f64) + addcount).ln();
                } else if addcount > 0.0 {
                    if self.cost.tokens() == 0 {
                        cost += addcount * addcount.ln()
                            + newboundcost
                            + self.cost.get_coding_cost(&construction);
                    } else {
                        cost += logtokens - addcount.ln()
                            + newboundcost
                            + self.cost.get_coding_cost(&construction);
                    }
                } else if self.cc.is_atom(&construction) {
                    cost += badlikelihood;
                } else if allow_longer_unk_splits {
                    // some boundaries are forbidden, so longer unknown
                    // constructions have to be allowed
                    cost += (self.cc.corpus_key_len(&construction) as f64) * badlikelihood;
                } else {
                    continue;
                }
                if cost.is_finite() && cost < bestcost {
                    bestcost = cost;
                    bestpath = pt;
                }
            }
            grid.insert(t, (bestcost, bestpath));
        }

        let (mut cost, mut path) = grid.get(&None).copied().unwrap_or((f64::INFINITY, None));
        let mut splitlocs = Vec::new();
        while let Some(loc) = path {
            splitlocs.push(loc);
            path = grid.get(&Some(loc)).and_then(|&(_, prev)| prev);
        }
        splitlocs.reverse();
        let constructions = self.cc.splitn(compound, &splitlocs);

        if self.cost.compound_tokens() > 0 {
            cost += ((self.cost.tokens() + self.cost.compound_tokens()) as f64).ln()
                - (self.cost.compound_tokens() as f64).ln();
        }
        Ok((constructions, cost))
    }

    /// Re-segments a compound with the Viterbi algorithm and stores the
    /// result as its new analysis.
    fn viterbi_optimize(
        &mut self,
        compound: &CC::Construction,
        addcount: f64,
        maxlen: usize,
    ) -> MorfsegResult<Vec<CC::Construction>> {
        let forced = self.cc.force_split_locations(compound);
        let mut constructions = Vec::new();
        for part in self.cc.splitn(compound, &forced) {
            let (segments, _) = self.viterbi_segment(&part, addcount, maxlen, false)?;
            constructions.extend(segments);
        }
        self.set_compound_analysis(compound, &constructions)?;
        Ok(constructions)
    }

    /// Re-segments a compound by recursive binary splitting.
    fn recursive_optimize(
        &mut self,
        compound: &CC::Construction,
    ) -> MorfsegResult<Vec<CC::Construction>> {
        let forced = self.cc.force_split_locations(compound);
        if forced.is_empty() {
            return self.recursive_split(compound);
        }
        let parts = self.cc.splitn(compound, &forced);
        self.set_compound_analysis(compound, &parts)?;
        let mut constructions = Vec::new();
        for part in &parts {
            constructions.extend(self.recursive_split(part)?);
        }
        Ok(constructions)
    }

    /// Finds the cheapest analysis of one construction: left unsplit, or
    /// cut at the best binary split with both halves optimized
    /// recursively. Coupled projections present in the store are kept in
    /// lock-step with the construction; their subtrees are inherited,
    /// never optimized on their own.
    fn recursive_split(
        &mut self,
        construction: &CC::Construction,
    ) -> MorfsegResult<Vec<CC::Construction>> {
        if self.cc.is_atom(construction) {
            return Ok(vec![construction.clone()]);
        }
        let (rcount, count) = self.remove(construction)?;

        let mut coupled: Vec<(CC::Construction, i64, i64)> = Vec::new();
        for projection in self.cc.projections(construction) {
            if self.analyses.contains_key(&projection) {
                let (prcount, pcount) = self.remove(&projection)?;
                coupled.push((projection, prcount, pcount));
            }
        }

        // cost of keeping the construction as a single morph
        self.modify_construction_count(construction, count);
        for (projection, _, pcount) in &coupled {
            self.modify_construction_count(projection, *pcount);
        }
        let mut mincost = self.get_cost();
        self.modify_construction_count(construction, -count);
        for (projection, _, pcount) in &coupled {
            self.modify_construction_count(projection, -*pcount);
        }

        let mut best_splitloc: Option<CC::SplitLoc> = None;
        let locations: Vec<CC::SplitLoc> =
            self.cc.split_locations(construction, None, None).collect();
        for loc in locations {
            let (prefix, suffix) = self.cc.split(construction, loc);
            self.modify_construction_count(&prefix, count);
            self.modify_construction_count(&suffix, count);
            for (projection, _, pcount) in &coupled {
                let (pp, ps) = self.cc.split(projection, loc);
                self.modify_construction_count(&pp, *pcount);
                self.modify_construction_count(&ps, *pcount);
            }
            let cost = self.get_cost();
            self.modify_construction_count(&prefix, -count);
            self.modify_construction_count(&suffix, -count);
            for (projection, _, pcount) in &coupled {
                let (pp, ps) = self.cc.split(projection, loc);
                self.modify_construction_count(&pp, -*pcount);
                self.modify_construction_count(&ps, -*pcount);
            }
            // keep updating on ties so the last position with the
            // minimum wins
            if cost <= mincost {
                mincost = cost;
                best_splitloc = Some(loc);
            }
        }

        match best_splitloc {
            Some(loc) => {
                self.analyses.insert(
                    construction.clone(),
                    ConstrNode {
                        rcount,
                        count,
                        splitloc: vec![loc],
                    },
                );
                let (prefix, suffix) = self.cc.split(construction, loc);
                self.modify_construction_count(&prefix, count);
                self.modify_construction_count(&suffix, count);
                for (projection, prcount, pcount) in &coupled {
                    self.analyses.insert(
                        projection.clone(),
                        ConstrNode {
                            rcount: *prcount,
                            count: *pcount,
                            splitloc: vec![loc],
                        },
                    );
                    let (pp, ps) = self.cc.split(projection, loc);
                    self.modify_construction_count(&pp, *pcount);
                    self.modify_construction_count(&ps, *pcount);
                }
                let lp = self.recursive_split(&prefix)?;
                if suffix != prefix {
                    let ls = self.recursive_split(&suffix)?;
                    Ok(lp.into_iter().chain(ls).collect())
                } else {
                    let mut segments = lp.clone();
                    segments.extend(lp);
                    Ok(segments)
                }
            }
            None => {
                self.analyses.insert(
                    construction.clone(),
                    ConstrNode {
                        rcount,
                        count: 0,
                        splitloc: Vec::new(),
                    },
                );
                self.modify_construction_count(construction, count);
                for (projection, prcount, pcount) in &coupled {
                    self.analyses.insert(
                        projection.clone(),
                        ConstrNode {
                            rcount: *prcount,
                            count: 0,
                            splitloc: Vec::new(),
                        },
                    );
                    self.modify_construction_count(projection, *pcount);
                }
                Ok(vec![construction.clone()])
            }
        }
    }

    /// Trains the model in batch fashion on the loaded data.
    ///
    /// Each epoch optimizes every compound once, in an order shuffled by
    /// the seeded generator. Training stops when the cost improvement of
    /// an epoch falls below `finish_threshold` per compound token, or at
    /// the epoch cap. Returns the epoch count and the final cost.
    pub fn train_batch(&mut self, config: &Config) -> MorfsegResult<(u32, f64)> {
        self.check_segment_only()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut epochs = 0u32;
        let mut forced_epochs = cmp::max(1, self.epoch_update(epochs));
        let mut newcost = self.get_cost();
        let mut compounds = self.get_compounds()?;
        log::info!(
            "Compounds in training data: {} types / {} tokens",
            compounds.len(),
            self.cost.compound_tokens()
        );

        if config.algorithm == Algorithm::Flatten {
            log::info!("Flattening analysis tree");
            for compound in &compounds {
                let parts = self.segment(compound)?;
                self.set_compound_analysis(compound, &parts)?;
            }
            log::info!("Done.");
            return Ok((1, self.get_cost()));
        }

        // projections only ever inherit their analyses
        let cc = &self.cc;
        compounds.retain(|w| !cc.is_projection(w));

        log::info!("Starting batch training");
        log::info!("Epochs: {}\tCost: {}", epochs, newcost);
        loop {
            compounds.shuffle(&mut rng);

            for w in &compounds {
                let segments = match config.algorithm {
                    Algorithm::Recursive => self.recursive_optimize(w)?,
                    Algorithm::Viterbi => {
                        self.viterbi_optimize(w, config.addcount, config.maxlen)?
                    }
                    Algorithm::Flatten => unreachable!(),
                };
                if log::log_enabled!(log::Level::Debug) {
                    log::debug!(
                        "#{} -> {}",
                        self.cc.to_string(w),
                        segments.iter().map(|s| self.cc.to_string(s)).join(" + ")
                    );
                }
            }
            epochs += 1;

            log::debug!("Cost before epoch update: {}", self.get_cost());
            forced_epochs = cmp::max(forced_epochs, self.epoch_update(epochs));
            let oldcost = newcost;
            newcost = self.get_cost();

            log::info!("Epochs: {}\tCost: {}", epochs, newcost);
            if forced_epochs == 0
                && newcost
                    >= oldcost - config.finish_threshold * self.cost.compound_tokens() as f64
            {
                break;
            }
            if forced_epochs > 0 {
                forced_epochs -= 1;
            }
            if let Some(max_epochs) = config.max_epochs {
                if epochs >= max_epochs {
                    log::info!("Max number of epochs reached, stop training");
                    break;
                }
            }
        }
        log::info!("Done.");
        Ok((epochs, newcost))
    }

    /// Resets every compound to an unsplit analysis.
    pub fn clear_segmentation(&mut self) -> MorfsegResult<()> {
        for compound in self.get_compounds()? {
            self.set_compound_analysis(&compound, &[compound.clone()])?;
        }
        Ok(())
    }

    /// Shrinks the model to the real morphs only. Afterwards the model
    /// can segment unseen words with [`Self::viterbi_segment`] but can
    /// no longer be trained or enumerated.
    pub fn make_segment_only(&mut self) {
        self.segment_only = true;
        self.analyses.retain(|_, node| node.splitloc.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::{CognateMethods, Word};
    use crate::model::baseline::BaselineModel;
    use crate::model::cognate::CognateModel;
    use claim::{assert_err, assert_ok};

    fn word_data(items: &[(&str, i64)]) -> Vec<DataPoint<Word<char>, usize>> {
        items
            .iter()
            .map(|&(w, count)| DataPoint {
                compound: Word::from(w),
                count,
                splitlocs: Vec::new(),
            })
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn detach_reattach_cycle_is_exact() {
        let mut model: BaselineModel<char> = BaselineModel::new(None);
        model
            .load_data(word_data(&[("cats", 5), ("dogs", 2)]))
            .unwrap();
        let before = model.get_cost();

        let compound = Word::from("cats");
        let (rcount, count) = model.remove(&compound).unwrap();
        assert_eq!(rcount, 5);
        assert_eq!(count, 5);
        model.modify_construction_count(&compound, count);
        assert!(close(model.get_cost(), before));
    }

    #[test]
    fn loaded_counts_flow_into_the_books() {
        let mut model: BaselineModel<char> = BaselineModel::new(None);
        model
            .load_data(word_data(&[("cats", 5), ("cat", 3)]))
            .unwrap();
        assert_eq!(model.tokens(), 8);
        assert_eq!(model.types(), 2);
        assert_eq!(
            model.get_construction_count(&Word::from("cats")).unwrap(),
            5
        );
        assert_eq!(model.get_construction_count(&Word::from("dog")).unwrap(), 0);
    }

    #[test]
    fn initial_splits_are_applied() {
        let mut model: BaselineModel<char> = BaselineModel::new(None);
        let data = vec![DataPoint {
            compound: Word::from("cats"),
            count: 2,
            splitlocs: vec![3],
        }];
        model.load_data(data).unwrap();
        assert_eq!(
            model.segment(&Word::from("cats")).unwrap(),
            vec![Word::from("cat"), Word::from("s")]
        );
        // the compound node is virtual, so its own count is not a morph count
        assert_eq!(model.get_construction_count(&Word::from("cats")).unwrap(), 0);
        assert_eq!(model.get_construction_count(&Word::from("cat")).unwrap(), 2);
    }

    #[test]
    fn segment_of_unknown_compound_is_an_error() {
        let mut model: BaselineModel<char> = BaselineModel::new(None);
        model.load_data(word_data(&[("cats", 1)])).unwrap();
        match model.segment(&Word::from("dogs")) {
            Err(MorfsegError::MissingCompound(w)) => assert_eq!(w, "dogs"),
            other => panic!("expected MissingCompound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn segment_only_model_rejects_mutation() {
        let mut model: BaselineModel<char> = BaselineModel::new(None);
        model.load_data(word_data(&[("cats", 1)])).unwrap();
        model.make_segment_only();
        assert_err!(model.add_compound(&Word::from("dogs"), 1));
        assert_err!(model.load_data(word_data(&[("dogs", 1)])));
        assert_err!(model.get_compounds());
        assert_err!(model.segment(&Word::from("cats")));
        // inference still works
        assert_ok!(model.viterbi_segment(&Word::from("cats"), 1.0, 30, false));
    }

    #[test]
    fn tie_break_prefers_the_later_split() {
        let mut model: BaselineModel<char> = BaselineModel::new(None);
        model.load_data(word_data(&[("abab", 1)])).unwrap();
        let segments = model.recursive_optimize(&Word::from("abab")).unwrap();
        assert_eq!(segments, vec![Word::from("ab"), Word::from("ab")]);
        assert_eq!(
            model.segment(&Word::from("abab")).unwrap(),
            vec![Word::from("ab"), Word::from("ab")]
        );
    }

    #[test]
    fn recursive_split_of_an_atom_is_identity() {
        let mut model: BaselineModel<char> = BaselineModel::new(None);
        model.load_data(word_data(&[("a", 4)])).unwrap();
        let segments = model.recursive_split(&Word::from("a")).unwrap();
        assert_eq!(segments, vec![Word::from("a")]);
        assert_eq!(model.get_construction_count(&Word::from("a")).unwrap(), 4);
    }

    #[test]
    fn cognate_load_creates_projections() {
        let cc = CognateMethods;
        let mut model = CognateModel::new(None);
        let pair = cc.from_string("walked\u{ffe8}kävellyt").unwrap();
        model.add_compound(&pair, 1).unwrap();

        let compounds = model.get_compounds().unwrap();
        assert_eq!(compounds.len(), 3);
        let wild_src = cc.from_string("walked\u{ffe8}").unwrap();
        let wild_trg = cc.from_string("\u{ffe8}kävellyt").unwrap();
        assert!(compounds.contains(&wild_src));
        assert!(compounds.contains(&wild_trg));
        assert_eq!(model.get_construction_count(&wild_src).unwrap(), 1);
    }

    #[test]
    fn cognate_add_remove_restores_empty_model() {
        let cc = CognateMethods;
        let mut model = CognateModel::new(None);
        let pair = cc.from_string("x\u{ffe8}y").unwrap();
        model.add_compound(&pair, 1).unwrap();
        assert!(model.get_cost() > 0.0);
        model.add_compound(&pair, -1).unwrap();
        assert!(model.get_cost().abs() < 1e-9);
        assert!(model.analyses.is_empty());
    }

    #[test]
    fn cognate_recursive_split_keeps_projections_in_lock_step() {
        let cc = CognateMethods;
        let mut model = CognateModel::new(None);
        let data = vec![
            DataPoint {
                compound: cc.from_string("walked\u{ffe8}kävellyt").unwrap(),
                count: 1,
                splitlocs: Vec::new(),
            },
            DataPoint {
                compound: cc.from_string("walks\u{ffe8}kävelee").unwrap(),
                count: 1,
                splitlocs: Vec::new(),
            },
        ];
        model.load_data(data).unwrap();
        let pair = cc.from_string("walked\u{ffe8}kävellyt").unwrap();
        model.recursive_split(&pair).unwrap();

        let wild_src = cc.from_string("walked\u{ffe8}").unwrap();
        let wild_trg = cc.from_string("\u{ffe8}kävellyt").unwrap();
        let pair_split = &model.analyses[&pair].splitloc;
        assert_eq!(&model.analyses[&wild_src].splitloc, pair_split);
        assert_eq!(&model.analyses[&wild_trg].splitloc, pair_split);
    }

    #[test]
    fn projections_are_not_optimized_directly() {
        let cc = CognateMethods;
        let mut model = CognateModel::new(None);
        let pair = cc.from_string("walked\u{ffe8}kävellyt").unwrap();
        model.add_compound(&pair, 1).unwrap();
        let config = Config {
            max_epochs: Some(1),
            seed: Some(1),
            ..Config::default()
        };
        model.train_batch(&config).unwrap();
        // whatever the pair decided, the projections mirror it
        let wild_src = cc.from_string("walked\u{ffe8}").unwrap();
        assert_eq!(
            model.analyses[&wild_src].splitloc,
            model.analyses[&pair].splitloc
        );
    }
}
