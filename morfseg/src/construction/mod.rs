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

//! The construction algebra: everything the segmentation engine needs to
//! know about the things it splits. The engine is agnostic to whether a
//! construction is a plain atom sequence or a pair of cognate words; the
//! algebra value it is handed decides.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::MorfsegResult;

pub mod cognate;
pub mod word;

pub use cognate::{CognateMethods, CognatePair, Side, PAIR_DELIMITER};
pub use word::{Atom, Word, WordMethods};

/// Pure operations on one concrete shape of construction.
///
/// Split locations are opaque to the engine; it only ever feeds back
/// locations obtained from [`split_locations`](Self::split_locations),
/// [`force_split_locations`](Self::force_split_locations) or
/// [`parts_to_splitlocs`](Self::parts_to_splitlocs).
pub trait ConstructionMethods {
    type Construction: Clone + Eq + Ord + Hash + Debug;
    type SplitLoc: Copy + Eq + Hash + Debug;

    /// True when no side of the construction can be split further.
    fn is_atom(&self, c: &Self::Construction) -> bool;

    /// Subsequence between two split locations; `None` means the
    /// corresponding end of the construction.
    fn slice(
        &self,
        c: &Self::Construction,
        start: Option<Self::SplitLoc>,
        stop: Option<Self::SplitLoc>,
    ) -> Self::Construction;

    /// Cuts the construction in two at an interior location.
    fn split(
        &self,
        c: &Self::Construction,
        loc: Self::SplitLoc,
    ) -> (Self::Construction, Self::Construction);

    /// Cuts the construction at every location in `locs`, which must be
    /// monotonically increasing. Empty `locs` yields the construction
    /// itself.
    fn splitn(&self, c: &Self::Construction, locs: &[Self::SplitLoc]) -> Vec<Self::Construction>;

    /// Lazily enumerates every interior split location between `start`
    /// and `stop` (endpoints excluded).
    fn split_locations(
        &self,
        c: &Self::Construction,
        start: Option<Self::SplitLoc>,
        stop: Option<Self::SplitLoc>,
    ) -> Box<dyn Iterator<Item = Self::SplitLoc>>;

    /// Locations at which segmentation is mandatory.
    fn force_split_locations(&self, c: &Self::Construction) -> Vec<Self::SplitLoc>;

    /// Cumulative boundary locations of a segmentation, excluding the
    /// final endpoint. Inverse of [`splitn`](Self::splitn).
    fn parts_to_splitlocs(&self, parts: &[Self::Construction]) -> Vec<Self::SplitLoc>;

    /// Length of the construction as counted by the corpus encoding.
    fn corpus_key_len(&self, c: &Self::Construction) -> usize;

    /// The wildcard projections coupled to this construction, if any.
    fn projections(&self, _c: &Self::Construction) -> Vec<Self::Construction> {
        Vec::new()
    }

    /// True when the construction is itself a wildcard projection and
    /// therefore only ever inherits its analysis from a coupled pair.
    fn is_projection(&self, _c: &Self::Construction) -> bool {
        false
    }

    /// Checks that `parts`, concatenated, reproduce `compound`.
    fn is_valid_analysis(
        &self,
        compound: &Self::Construction,
        parts: &[Self::Construction],
    ) -> bool;

    fn from_string(&self, s: &str) -> MorfsegResult<Self::Construction>;

    fn to_string(&self, c: &Self::Construction) -> String;
}
