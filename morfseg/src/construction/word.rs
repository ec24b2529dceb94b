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

use std::collections::BTreeSet;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use regex::Regex;

use crate::construction::ConstructionMethods;
use crate::error::{MorfsegError, MorfsegResult};

/// Anything usable as the unit of a construction.
/// Implemented for free by `char` and any other small value type.
pub trait Atom: Copy + Eq + Ord + Hash + Debug {}

impl<T: Copy + Eq + Ord + Hash + Debug> Atom for T {}

/// An immutable sequence of atoms with value semantics.
///
/// Words are the constructions of the monolingual model and also the
/// sides of a cognate pair. Slicing produces a new owned word; words
/// are small and short-lived, so no interning is performed.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Word<A>(Box<[A]>);

impl<A: Atom> Word<A> {
    pub fn new<I: Into<Box<[A]>>>(atoms: I) -> Word<A> {
        Word(atoms.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn atoms(&self) -> &[A] {
        &self.0
    }

    /// Owned copy of the half-open atom range `start..stop`.
    pub fn subword(&self, start: usize, stop: usize) -> Word<A> {
        Word(self.0[start..stop].into())
    }
}

impl From<&str> for Word<char> {
    fn from(s: &str) -> Self {
        Word(s.chars().collect::<Vec<_>>().into())
    }
}

impl<A: Atom + Display> Display for Word<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for atom in self.0.iter() {
            write!(f, "{}", atom)?;
        }
        Ok(())
    }
}

/// The construction algebra over plain atom sequences.
///
/// Carries the only two tunable pieces of the algebra: a set of atoms at
/// which segmentation is forced (isolating e.g. hyphens), and an optional
/// regular expression that forbids a boundary when it matches the two
/// rendered atoms surrounding the candidate position.
#[derive(Clone, Debug, Default)]
pub struct WordMethods<A: Atom> {
    force_split: BTreeSet<A>,
    nosplit: Option<Regex>,
}

impl<A: Atom> WordMethods<A> {
    pub fn new() -> WordMethods<A> {
        WordMethods {
            force_split: BTreeSet::new(),
            nosplit: None,
        }
    }

    pub fn with_force_split<I: IntoIterator<Item = A>>(mut self, atoms: I) -> WordMethods<A> {
        self.force_split = atoms.into_iter().collect();
        self
    }

    pub fn with_nosplit(mut self, pattern: &str) -> MorfsegResult<WordMethods<A>> {
        let re = Regex::new(pattern)
            .map_err(|e| MorfsegError::InvalidArgument(format!("nosplit pattern: {}", e)))?;
        self.nosplit = Some(re);
        Ok(self)
    }
}

impl<A> ConstructionMethods for WordMethods<A>
where
    A: Atom + Display + From<char>,
{
    type Construction = Word<A>;
    type SplitLoc = usize;

    fn is_atom(&self, c: &Word<A>) -> bool {
        c.len() <= 1
    }

    fn slice(&self, c: &Word<A>, start: Option<usize>, stop: Option<usize>) -> Word<A> {
        c.subword(start.unwrap_or(0), stop.unwrap_or_else(|| c.len()))
    }

    fn split(&self, c: &Word<A>, loc: usize) -> (Word<A>, Word<A>) {
        assert!(
            0 < loc && loc < c.len(),
            "split location {} outside word of length {}",
            loc,
            c.len()
        );
        (c.subword(0, loc), c.subword(loc, c.len()))
    }

    fn splitn(&self, c: &Word<A>, locs: &[usize]) -> Vec<Word<A>> {
        let mut parts = Vec::with_capacity(locs.len() + 1);
        let mut prev = 0;
        for &loc in locs {
            assert!(
                prev < loc && loc < c.len(),
                "split location {} outside word of length {}",
                loc,
                c.len()
            );
            parts.push(c.subword(prev, loc));
            prev = loc;
        }
        parts.push(c.subword(prev, c.len()));
        parts
    }

    fn split_locations(
        &self,
        c: &Word<A>,
        start: Option<usize>,
        stop: Option<usize>,
    ) -> Box<dyn Iterator<Item = usize>> {
        let start = start.unwrap_or(0);
        let stop = stop.unwrap_or_else(|| c.len());
        match &self.nosplit {
            None => Box::new(start + 1..stop),
            Some(re) => {
                let allowed: Vec<usize> = (start + 1..stop)
                    .filter(|&i| {
                        let window = format!("{}{}", c.atoms()[i - 1], c.atoms()[i]);
                        !re.is_match(&window)
                    })
                    .collect();
                Box::new(allowed.into_iter())
            }
        }
    }

    fn force_split_locations(&self, c: &Word<A>) -> Vec<usize> {
        if self.force_split.is_empty() {
            return Vec::new();
        }
        // isolate each forced atom with a boundary on both sides
        (1..c.len())
            .filter(|&i| {
                self.force_split.contains(&c.atoms()[i]) || self.force_split.contains(&c.atoms()[i - 1])
            })
            .collect()
    }

    fn parts_to_splitlocs(&self, parts: &[Word<A>]) -> Vec<usize> {
        let mut locs = Vec::new();
        let mut cur = 0;
        for p in parts.iter().take(parts.len().saturating_sub(1)) {
            cur += p.len();
            locs.push(cur);
        }
        locs
    }

    fn corpus_key_len(&self, c: &Word<A>) -> usize {
        c.len()
    }

    fn is_valid_analysis(&self, compound: &Word<A>, parts: &[Word<A>]) -> bool {
        let total: usize = parts.iter().map(|p| p.len()).sum();
        if total != compound.len() {
            return false;
        }
        let mut atoms = compound.atoms().iter();
        parts
            .iter()
            .flat_map(|p| p.atoms().iter())
            .all(|a| atoms.next() == Some(a))
    }

    fn from_string(&self, s: &str) -> MorfsegResult<Word<A>> {
        if s.is_empty() {
            return Err(MorfsegError::InvalidArgument(String::from(
                "empty compound",
            )));
        }
        Ok(Word::new(
            s.chars().map(A::from).collect::<Vec<A>>(),
        ))
    }

    fn to_string(&self, c: &Word<A>) -> String {
        format!("{}", c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_err;

    fn cc() -> WordMethods<char> {
        WordMethods::new()
    }

    #[test]
    fn split_and_splitn() {
        let w = Word::from("abcd");
        let (p, s) = cc().split(&w, 1);
        assert_eq!(p, Word::from("a"));
        assert_eq!(s, Word::from("bcd"));
        let parts = cc().splitn(&w, &[1, 3]);
        assert_eq!(
            parts,
            vec![Word::from("a"), Word::from("bc"), Word::from("d")]
        );
        assert_eq!(cc().splitn(&w, &[]), vec![w]);
    }

    #[test]
    fn split_locations_are_interior() {
        let w = Word::from("abcd");
        let locs: Vec<usize> = cc().split_locations(&w, None, None).collect();
        assert_eq!(locs, vec![1, 2, 3]);
        let upto: Vec<usize> = cc().split_locations(&w, None, Some(2)).collect();
        assert_eq!(upto, vec![1]);
    }

    #[test]
    fn split_locations_of_atom_is_empty() {
        let w = Word::from("a");
        assert_eq!(cc().split_locations(&w, None, None).count(), 0);
        assert!(cc().is_atom(&w));
    }

    #[test]
    fn splitlocs_round_trip() {
        let w = Word::from("uneven");
        let locs = vec![2, 3];
        let parts = cc().splitn(&w, &locs);
        assert_eq!(cc().parts_to_splitlocs(&parts), locs);
    }

    #[test]
    fn force_split_isolates_atoms() {
        let cc = WordMethods::new().with_force_split(vec!['-']);
        let w = Word::from("ab-cd");
        assert_eq!(cc.force_split_locations(&w), vec![2, 3]);
        let plain = Word::from("abcd");
        assert!(cc.force_split_locations(&plain).is_empty());
    }

    #[test]
    fn nosplit_blocks_boundaries() {
        let cc = WordMethods::new().with_nosplit("^-|-$").unwrap();
        let w = Word::from("ab-cd");
        let locs: Vec<usize> = cc.split_locations(&w, None, None).collect();
        // boundaries touching the hyphen are forbidden
        assert_eq!(locs, vec![1, 4]);
    }

    #[test]
    fn string_round_trip() {
        let w = cc().from_string("kävellä").unwrap();
        assert_eq!(cc().to_string(&w), "kävellä");
        assert_eq!(w.len(), 7);
        assert_err!(cc().from_string(""));
    }

    #[test]
    fn analysis_validation() {
        let w = Word::from("cats");
        assert!(cc().is_valid_analysis(&w, &[Word::from("cat"), Word::from("s")]));
        assert!(!cc().is_valid_analysis(&w, &[Word::from("ca"), Word::from("s")]));
        assert!(!cc().is_valid_analysis(&w, &[Word::from("cat"), Word::from("z")]));
    }
}
