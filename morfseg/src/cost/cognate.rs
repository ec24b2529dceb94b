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

//! Cost model for cognate pairs: a source lexicon, a target lexicon and
//! an edit lexicon scoring the non-matching Levenshtein spans between
//! the two sides. A single count change is applied to all three books.

use crate::construction::{CognatePair, Word};
use crate::cost::{Cost, CostModel};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum EditOp {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One aligned span: `src[i0..i1]` corresponds to `trg[j0..j1]`.
#[derive(Clone, Copy, Debug)]
struct OpSpan {
    op: EditOp,
    i0: usize,
    i1: usize,
    j0: usize,
    j1: usize,
}

/// Levenshtein opcodes covering both strings completely, in order.
fn opcodes(src: &[char], trg: &[char]) -> Vec<OpSpan> {
    let m = src.len();
    let n = trg.len();
    let mut dist = vec![vec![0u32; n + 1]; m + 1];
    for i in 0..=m {
        dist[i][0] = i as u32;
    }
    for j in 0..=n {
        dist[0][j] = j as u32;
    }
    for i in 1..=m {
        for j in 1..=n {
            let sub = dist[i - 1][j - 1] + if src[i - 1] == trg[j - 1] { 0 } else { 1 };
            dist[i][j] = sub.min(dist[i - 1][j] + 1).min(dist[i][j - 1] + 1);
        }
    }

    // walk back from the corner, preferring matches over substitutions
    let mut steps = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        let op = if i > 0 && j > 0 && src[i - 1] == trg[j - 1] && dist[i][j] == dist[i - 1][j - 1]
        {
            EditOp::Equal
        } else if i > 0 && j > 0 && dist[i][j] == dist[i - 1][j - 1] + 1 {
            EditOp::Replace
        } else if i > 0 && dist[i][j] == dist[i - 1][j] + 1 {
            EditOp::Delete
        } else {
            EditOp::Insert
        };
        match op {
            EditOp::Equal | EditOp::Replace => {
                i -= 1;
                j -= 1;
            }
            EditOp::Delete => i -= 1,
            EditOp::Insert => j -= 1,
        }
        steps.push((op, i, j));
    }
    steps.reverse();

    let mut spans: Vec<OpSpan> = Vec::new();
    for (op, i, j) in steps {
        let (di, dj) = match op {
            EditOp::Equal | EditOp::Replace => (1, 1),
            EditOp::Delete => (1, 0),
            EditOp::Insert => (0, 1),
        };
        match spans.last_mut() {
            Some(span) if span.op == op && span.i1 == i && span.j1 == j => {
                span.i1 = i + di;
                span.j1 = j + dj;
            }
            _ => spans.push(OpSpan {
                op,
                i0: i,
                i1: i + di,
                j0: j,
                j1: j + dj,
            }),
        }
    }
    spans
}

/// Merges non-matching spans whose ranges abut on both sides into a
/// single replacement span.
fn merge_consecutive(spans: Vec<OpSpan>) -> Vec<OpSpan> {
    let mut merged: Vec<OpSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(prev) if span.i0 == prev.i1 && span.j0 == prev.j1 => {
                prev.op = EditOp::Replace;
                prev.i1 = span.i1;
                prev.j1 = span.j1;
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Represents lengthening sounds as longer replacements rather than
/// insertions or deletions: an empty-sided span flanked by copies of its
/// own atom is widened one atom and relabeled a replacement.
fn lengthening(src: &[char], trg: &[char], spans: Vec<OpSpan>) -> Vec<OpSpan> {
    spans
        .into_iter()
        .map(|mut span| {
            if (span.i1 - span.i0).min(span.j1 - span.j0) > 0 {
                // only extend spans with one empty side
                return span;
            }
            let use_trg = span.i1 == span.i0;
            if span.i0 > 0 && span.j0 > 0 {
                let cursor = if use_trg { trg[span.j0] } else { src[span.i0] };
                if src[span.i0 - 1] == cursor && trg[span.j0 - 1] == cursor {
                    span.i0 -= 1;
                    span.j0 -= 1;
                    span.op = EditOp::Replace;
                }
            }
            if span.i1 + 1 < src.len() && span.j1 + 1 < trg.len() {
                let cursor = if use_trg {
                    trg[span.j1 - 1]
                } else {
                    src[span.i1 - 1]
                };
                if src[span.i1] == cursor && trg[span.j1] == cursor {
                    span.i1 += 1;
                    span.j1 += 1;
                    span.op = EditOp::Replace;
                }
            }
            span
        })
        .collect()
}

/// The sequence of edit operations relating the two sides of a cognate
/// pair, each rendered as `srcPart/trgPart` with empty sides left blank.
pub fn edits(src: &Word<char>, trg: &Word<char>) -> Vec<Word<char>> {
    let s = src.atoms();
    let t = trg.atoms();
    let mut spans = opcodes(s, t);
    spans.retain(|span| span.op != EditOp::Equal);
    let spans = lengthening(s, t, merge_consecutive(spans));

    spans
        .into_iter()
        .filter(|span| span.op != EditOp::Equal)
        .map(|span| {
            let mut atoms: Vec<char> = Vec::with_capacity(span.i1 - span.i0 + span.j1 - span.j0 + 1);
            atoms.extend_from_slice(&s[span.i0..span.i1]);
            atoms.push('/');
            atoms.extend_from_slice(&t[span.j0..span.j1]);
            Word::new(atoms)
        })
        .collect()
}

/// Code length of a bilingual corpus of cognate pairs: source cost plus
/// target cost plus the weighted cost of the edit operations between the
/// coupled sides. Wildcard sides touch only the books of the other side.
#[derive(Debug)]
pub struct CognateCost {
    src_cost: Cost<char>,
    trg_cost: Cost<char>,
    edit_cost: Cost<char>,
    edit_weight: f64,
}

impl CognateCost {
    pub fn new(corpusweight: f64) -> CognateCost {
        CognateCost {
            src_cost: Cost::new(corpusweight),
            trg_cost: Cost::new(corpusweight),
            edit_cost: Cost::new(1.0),
            edit_weight: 1.0,
        }
    }

    pub fn set_edit_weight(&mut self, weight: f64) {
        self.edit_weight = weight;
    }

    pub fn edit_weight(&self) -> f64 {
        self.edit_weight
    }
}

impl CostModel for CognateCost {
    type Construction = CognatePair;

    fn cost(&self) -> f64 {
        self.src_cost.cost() + self.trg_cost.cost() + self.edit_weight * self.edit_cost.cost()
    }

    fn update(&mut self, construction: &CognatePair, delta: i64) {
        if delta == 0 {
            return;
        }
        if let Some(s) = construction.src().word() {
            self.src_cost.update(s, delta);
        }
        if let Some(t) = construction.trg().word() {
            self.trg_cost.update(t, delta);
        }
        if let (Some(s), Some(t)) = (construction.src().word(), construction.trg().word()) {
            for edit in edits(s, t) {
                self.edit_cost.update(&edit, delta);
            }
        }
    }

    fn update_boundaries(&mut self, compound: &CognatePair, delta: i64) {
        if !compound.src().is_wildcard() {
            self.src_cost.update_boundaries(delta);
        }
        if !compound.trg().is_wildcard() {
            self.trg_cost.update_boundaries(delta);
        }
        if let (Some(s), Some(t)) = (compound.src().word(), compound.trg().word()) {
            for _ in edits(s, t) {
                self.edit_cost.update_boundaries(delta);
            }
        }
    }

    fn set_corpus_coding_weight(&mut self, weight: f64) {
        self.src_cost.set_corpus_coding_weight(weight);
        self.trg_cost.set_corpus_coding_weight(weight);
    }

    fn tokens(&self) -> i64 {
        self.src_cost.tokens() + self.trg_cost.tokens()
    }

    fn compound_tokens(&self) -> i64 {
        self.src_cost.compound_tokens() + self.trg_cost.compound_tokens()
    }

    fn types(&self) -> i64 {
        self.src_cost.types() + self.trg_cost.types()
    }

    fn all_tokens(&self) -> i64 {
        self.src_cost.all_tokens() + self.trg_cost.all_tokens()
    }

    fn newbound_cost(&self, count: f64) -> f64 {
        self.src_cost.newbound_cost(count) + self.trg_cost.newbound_cost(count)
    }

    fn bad_likelihood(&self, compound: &CognatePair, addcount: f64) -> f64 {
        let mut cost = 0.0;
        if let Some(s) = compound.src().word() {
            cost += self.src_cost.bad_likelihood(s, addcount);
        }
        if let Some(t) = compound.trg().word() {
            cost += self.trg_cost.bad_likelihood(t, addcount);
        }
        cost
    }

    fn get_coding_cost(&self, construction: &CognatePair) -> f64 {
        let mut cost = 0.0;
        if let Some(s) = construction.src().word() {
            cost += self.src_cost.get_coding_cost(s);
        }
        if let Some(t) = construction.trg().word() {
            cost += self.trg_cost.get_coding_cost(t);
        }
        cost
    }

    fn lookup_count(&self, construction: &CognatePair) -> Option<i64> {
        match (construction.src().word(), construction.trg().word()) {
            (None, Some(t)) => Some(self.trg_cost.count(t)),
            (Some(s), None) => Some(self.src_cost.count(s)),
            _ => None,
        }
    }
}
