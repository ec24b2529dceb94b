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

//! Composition of the encoding books into a total code length. Every
//! count change flows through [`Cost::update`], which keeps the lexicon
//! book, the corpus book and the morph counter consistent with each
//! other; the total after any sequence of paired updates equals the
//! total recomputed from scratch, up to floating-point rounding.

use std::collections::HashMap;

use crate::construction::{Atom, Word};

pub mod cognate;
pub mod encoding;

pub use cognate::{edits, CognateCost};
pub use encoding::{CorpusEncoding, LexiconEncoding};

/// The cost interface the segmentation engine drives. Implemented by the
/// monolingual [`Cost`] and by the coupled [`CognateCost`].
pub trait CostModel {
    type Construction;

    /// Total code length in nats.
    fn cost(&self) -> f64;

    /// Applies a count change for one real construction.
    fn update(&mut self, construction: &Self::Construction, delta: i64);

    /// Applies a compound-token (boundary) change.
    fn update_boundaries(&mut self, compound: &Self::Construction, delta: i64);

    fn set_corpus_coding_weight(&mut self, weight: f64);

    /// Non-boundary morph tokens in the corpus.
    fn tokens(&self) -> i64;

    /// Compound (boundary) tokens in the corpus.
    fn compound_tokens(&self) -> i64;

    /// Morph types including the end-of-compound symbol.
    fn types(&self) -> i64;

    fn all_tokens(&self) -> i64;

    /// Cost of growing the lexicon by `count` morphs.
    fn newbound_cost(&self, count: f64) -> f64;

    /// Penalty cost for an out-of-vocabulary construction.
    fn bad_likelihood(&self, compound: &Self::Construction, addcount: f64) -> f64;

    /// Code length of spelling the construction out in the lexicon.
    fn get_coding_cost(&self, construction: &Self::Construction) -> f64;

    /// A count kept outside the analysis store, if the model has one for
    /// this construction.
    fn lookup_count(&self, _construction: &Self::Construction) -> Option<i64> {
        None
    }
}

/// Code length of a single corpus and its lexicon.
#[derive(Debug)]
pub struct Cost<A: Atom> {
    lexicon: LexiconEncoding<A>,
    corpus: CorpusEncoding,
    counts: HashMap<Word<A>, i64>,
}

impl<A: Atom> Cost<A> {
    pub fn new(corpusweight: f64) -> Cost<A> {
        Cost {
            lexicon: LexiconEncoding::new(),
            corpus: CorpusEncoding::new(corpusweight),
            counts: HashMap::new(),
        }
    }

    pub fn cost(&self) -> f64 {
        self.lexicon.get_cost() + self.corpus.get_cost(self.lexicon.boundaries())
    }

    /// Current count of a morph, zero when absent.
    pub fn count(&self, construction: &Word<A>) -> i64 {
        self.counts.get(construction).copied().unwrap_or(0)
    }

    pub fn update(&mut self, construction: &Word<A>, delta: i64) {
        if delta == 0 {
            return;
        }
        let old_count = self.count(construction);
        if old_count == 0 {
            self.lexicon.add(construction);
        }
        let new_count = old_count + delta;
        self.corpus.update_count(old_count, new_count);
        if new_count == 0 {
            self.counts.remove(construction);
            self.lexicon.remove(construction);
        } else {
            self.counts.insert(construction.clone(), new_count);
        }
    }

    pub fn update_boundaries(&mut self, delta: i64) {
        self.corpus.update_boundaries(delta);
    }

    pub fn set_corpus_coding_weight(&mut self, weight: f64) {
        self.corpus.set_weight(weight);
    }

    pub fn tokens(&self) -> i64 {
        self.corpus.tokens()
    }

    pub fn compound_tokens(&self) -> i64 {
        self.corpus.boundaries()
    }

    pub fn types(&self) -> i64 {
        self.lexicon.boundaries() + 1
    }

    pub fn all_tokens(&self) -> i64 {
        self.corpus.tokens() + self.corpus.boundaries()
    }

    pub fn newbound_cost(&self, count: f64) -> f64 {
        let b = self.lexicon.boundaries() as f64;
        let mut cost = if b + count > 0.0 {
            (b + count) * (b + count).ln()
        } else {
            0.0
        };
        if b > 0.0 {
            cost -= b * b.ln();
        }
        cost / self.corpus.weight()
    }

    pub fn bad_likelihood(&self, compound: &Word<A>, addcount: f64) -> f64 {
        let lt = if addcount > 0.0 {
            ((self.all_tokens() as f64) + addcount).ln()
        } else {
            0.0
        };
        let nb = if addcount > 0.0 {
            self.newbound_cost(addcount)
        } else {
            0.0
        };
        1.0 + (compound.len() as f64) * lt + nb + self.get_coding_cost(compound)
    }

    pub fn get_coding_cost(&self, construction: &Word<A>) -> f64 {
        self.lexicon.get_codelength(construction) / self.corpus.weight()
    }
}

impl<A: Atom> CostModel for Cost<A> {
    type Construction = Word<A>;

    fn cost(&self) -> f64 {
        Cost::cost(self)
    }

    fn update(&mut self, construction: &Word<A>, delta: i64) {
        Cost::update(self, construction, delta)
    }

    fn update_boundaries(&mut self, _compound: &Word<A>, delta: i64) {
        Cost::update_boundaries(self, delta)
    }

    fn set_corpus_coding_weight(&mut self, weight: f64) {
        Cost::set_corpus_coding_weight(self, weight)
    }

    fn tokens(&self) -> i64 {
        Cost::tokens(self)
    }

    fn compound_tokens(&self) -> i64 {
        Cost::compound_tokens(self)
    }

    fn types(&self) -> i64 {
        Cost::types(self)
    }

    fn all_tokens(&self) -> i64 {
        Cost::all_tokens(self)
    }

    fn newbound_cost(&self, count: f64) -> f64 {
        Cost::newbound_cost(self, count)
    }

    fn bad_likelihood(&self, compound: &Word<A>, addcount: f64) -> f64 {
        Cost::bad_likelihood(self, compound, addcount)
    }

    fn get_coding_cost(&self, construction: &Word<A>) -> f64 {
        Cost::get_coding_cost(self, construction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn update_is_invertible() {
        let mut cost: Cost<char> = Cost::new(1.0);
        cost.update_boundaries(3);
        cost.update(&Word::from("cat"), 3);
        cost.update(&Word::from("s"), 5);
        let before = cost.cost();

        cost.update(&Word::from("dog"), 2);
        cost.update(&Word::from("s"), 2);
        cost.update(&Word::from("dog"), -2);
        cost.update(&Word::from("s"), -2);

        assert!(close(cost.cost(), before));
        assert_eq!(cost.count(&Word::from("dog")), 0);
        assert_eq!(cost.count(&Word::from("s")), 5);
    }

    #[test]
    fn morph_leaves_lexicon_at_zero_count() {
        let mut cost: Cost<char> = Cost::new(1.0);
        cost.update_boundaries(1);
        cost.update(&Word::from("ab"), 2);
        assert_eq!(cost.types(), 2);
        cost.update(&Word::from("ab"), -2);
        assert_eq!(cost.types(), 1);
        assert_eq!(cost.tokens(), 0);
        cost.update_boundaries(-1);
        assert!(close(cost.cost(), 0.0));
    }

    #[test]
    fn zero_delta_is_ignored() {
        let mut cost: Cost<char> = Cost::new(1.0);
        cost.update(&Word::from("ab"), 0);
        assert_eq!(cost.types(), 1);
        assert_eq!(cost.count(&Word::from("ab")), 0);
    }

    #[test]
    fn newbound_cost_of_zero_is_zero() {
        let mut cost: Cost<char> = Cost::new(1.0);
        assert_eq!(cost.newbound_cost(0.0), 0.0);
        cost.update_boundaries(1);
        cost.update(&Word::from("ab"), 1);
        assert_eq!(cost.newbound_cost(0.0), 0.0);
        assert!(cost.newbound_cost(1.0) > 0.0);
    }

    #[test]
    fn bad_likelihood_skips_log_terms_without_smoothing() {
        let mut cost: Cost<char> = Cost::new(1.0);
        cost.update_boundaries(1);
        cost.update(&Word::from("abc"), 1);
        let w = Word::from("xy");
        let plain = cost.bad_likelihood(&w, 0.0);
        assert!(close(plain, 1.0 + cost.get_coding_cost(&w)));
        assert!(cost.bad_likelihood(&w, 1.0) > plain);
    }
}
