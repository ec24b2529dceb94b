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

use crate::construction::word::Word;
use crate::construction::ConstructionMethods;
use crate::error::{MorfsegError, MorfsegResult};

/// Separates the two sides of a serialized pair. U+FFE8 is a halfwidth
/// forms character that does not occur in natural-language words.
pub const PAIR_DELIMITER: char = '\u{ffe8}';

/// Split enumeration treats a wildcard side as spanning the open interval
/// `(0, 2)`, so exactly one phantom split index exists on that side.
const WILDCARD_SPLIT_LEN: usize = 2;

/// One side of a cognate pair: a concrete atom sequence, or the wildcard
/// that blanks the side out in a projection.
///
/// The wildcard is a dedicated variant rather than an empty sequence, so
/// a blanked side never compares equal to an empty one.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Side {
    Wildcard,
    Seq(Word<char>),
}

impl Side {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Side::Wildcard)
    }

    pub fn word(&self) -> Option<&Word<char>> {
        match self {
            Side::Wildcard => None,
            Side::Seq(w) => Some(w),
        }
    }

    fn split_len(&self) -> usize {
        match self {
            Side::Wildcard => WILDCARD_SPLIT_LEN,
            Side::Seq(w) => w.len(),
        }
    }

    /// Slices a concrete side; the wildcard absorbs any range.
    fn sub_slice(&self, start: usize, stop: Option<usize>) -> Side {
        match self {
            Side::Wildcard => Side::Wildcard,
            Side::Seq(w) => Side::Seq(w.subword(start, stop.unwrap_or_else(|| w.len()))),
        }
    }
}

impl From<&str> for Side {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Side::Wildcard
        } else {
            Side::Seq(Word::from(s))
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Wildcard => Ok(()),
            Side::Seq(w) => write!(f, "{}", w),
        }
    }
}

/// A pair of cognate words, or the projection of one with a side blanked
/// by the wildcard. Both sides wildcard is not a construction.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CognatePair {
    src: Side,
    trg: Side,
}

impl CognatePair {
    pub fn new(src: Side, trg: Side) -> MorfsegResult<CognatePair> {
        if src.is_wildcard() && trg.is_wildcard() {
            return Err(MorfsegError::InvalidArgument(String::from(
                "a cognate pair must have at least one concrete side",
            )));
        }
        Ok(CognatePair { src, trg })
    }

    pub fn src(&self) -> &Side {
        &self.src
    }

    pub fn trg(&self) -> &Side {
        &self.trg
    }

    /// True when exactly one side is the wildcard.
    pub fn is_projection(&self) -> bool {
        self.src.is_wildcard() != self.trg.is_wildcard()
    }
}

impl Display for CognatePair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.src, PAIR_DELIMITER, self.trg)
    }
}

/// The construction algebra over cognate pairs. Split locations are
/// `(i, j)` index pairs, one per side.
#[derive(Clone, Copy, Debug, Default)]
pub struct CognateMethods;

impl CognateMethods {
    pub fn pair(src: &str, trg: &str) -> MorfsegResult<CognatePair> {
        CognatePair::new(Side::from(src), Side::from(trg))
    }
}

impl ConstructionMethods for CognateMethods {
    type Construction = CognatePair;
    type SplitLoc = (usize, usize);

    fn is_atom(&self, c: &CognatePair) -> bool {
        c.src.word().map_or(true, |w| w.len() <= 1) && c.trg.word().map_or(true, |w| w.len() <= 1)
    }

    fn slice(
        &self,
        c: &CognatePair,
        start: Option<(usize, usize)>,
        stop: Option<(usize, usize)>,
    ) -> CognatePair {
        let (s0, t0) = start.unwrap_or((0, 0));
        let (s1, t1) = match stop {
            Some((s1, t1)) => (Some(s1), Some(t1)),
            None => (None, None),
        };
        CognatePair {
            src: c.src.sub_slice(s0, s1),
            trg: c.trg.sub_slice(t0, t1),
        }
    }

    fn split(&self, c: &CognatePair, loc: (usize, usize)) -> (CognatePair, CognatePair) {
        if let Side::Seq(w) = &c.src {
            assert!(
                0 < loc.0 && loc.0 < w.len(),
                "split location {:?} outside pair {:?}",
                loc,
                c
            );
        }
        if let Side::Seq(w) = &c.trg {
            assert!(
                0 < loc.1 && loc.1 < w.len(),
                "split location {:?} outside pair {:?}",
                loc,
                c
            );
        }
        (
            CognatePair {
                src: c.src.sub_slice(0, Some(loc.0)),
                trg: c.trg.sub_slice(0, Some(loc.1)),
            },
            CognatePair {
                src: c.src.sub_slice(loc.0, None),
                trg: c.trg.sub_slice(loc.1, None),
            },
        )
    }

    fn splitn(&self, c: &CognatePair, locs: &[(usize, usize)]) -> Vec<CognatePair> {
        let mut parts = Vec::with_capacity(locs.len() + 1);
        let mut prev = (0, 0);
        for &loc in locs {
            if let Side::Seq(w) = &c.src {
                assert!(
                    prev.0 < loc.0 && loc.0 < w.len(),
                    "split location {:?} outside pair {:?}",
                    loc,
                    c
                );
            }
            if let Side::Seq(w) = &c.trg {
                assert!(
                    prev.1 < loc.1 && loc.1 < w.len(),
                    "split location {:?} outside pair {:?}",
                    loc,
                    c
                );
            }
            parts.push(CognatePair {
                src: c.src.sub_slice(prev.0, Some(loc.0)),
                trg: c.trg.sub_slice(prev.1, Some(loc.1)),
            });
            prev = loc;
        }
        parts.push(CognatePair {
            src: c.src.sub_slice(prev.0, None),
            trg: c.trg.sub_slice(prev.1, None),
        });
        parts
    }

    fn split_locations(
        &self,
        c: &CognatePair,
        start: Option<(usize, usize)>,
        stop: Option<(usize, usize)>,
    ) -> Box<dyn Iterator<Item = (usize, usize)>> {
        let (s0, t0) = start.unwrap_or((0, 0));
        let (s1, t1) = stop.unwrap_or_else(|| (c.src.split_len(), c.trg.split_len()));
        Box::new((s0 + 1..s1).flat_map(move |gi| (t0 + 1..t1).map(move |pi| (gi, pi))))
    }

    fn force_split_locations(&self, _c: &CognatePair) -> Vec<(usize, usize)> {
        Vec::new()
    }

    fn parts_to_splitlocs(&self, parts: &[CognatePair]) -> Vec<(usize, usize)> {
        let mut locs = Vec::new();
        let mut cur = (0, 0);
        for p in parts.iter().take(parts.len().saturating_sub(1)) {
            if let Side::Seq(w) = &p.src {
                cur.0 += w.len();
            }
            if let Side::Seq(w) = &p.trg {
                cur.1 += w.len();
            }
            locs.push(cur);
        }
        locs
    }

    fn corpus_key_len(&self, _c: &CognatePair) -> usize {
        2
    }

    fn projections(&self, c: &CognatePair) -> Vec<CognatePair> {
        match (&c.src, &c.trg) {
            (Side::Seq(_), Side::Seq(_)) => vec![
                CognatePair {
                    src: c.src.clone(),
                    trg: Side::Wildcard,
                },
                CognatePair {
                    src: Side::Wildcard,
                    trg: c.trg.clone(),
                },
            ],
            _ => Vec::new(),
        }
    }

    fn is_projection(&self, c: &CognatePair) -> bool {
        c.is_projection()
    }

    fn is_valid_analysis(&self, compound: &CognatePair, parts: &[CognatePair]) -> bool {
        fn side_ok<'a>(
            whole: &Side,
            parts: impl Iterator<Item = &'a Side>,
        ) -> bool {
            match whole {
                Side::Wildcard => parts.into_iter().all(|s| s.is_wildcard()),
                Side::Seq(w) => {
                    let mut atoms = w.atoms().iter();
                    let mut total = 0;
                    for s in parts {
                        match s {
                            Side::Wildcard => return false,
                            Side::Seq(p) => {
                                total += p.len();
                                if !p.atoms().iter().all(|a| atoms.next() == Some(a)) {
                                    return false;
                                }
                            }
                        }
                    }
                    total == w.len()
                }
            }
        }
        side_ok(&compound.src, parts.iter().map(|p| &p.src))
            && side_ok(&compound.trg, parts.iter().map(|p| &p.trg))
    }

    fn from_string(&self, s: &str) -> MorfsegResult<CognatePair> {
        let mut halves = s.splitn(2, PAIR_DELIMITER);
        let src = halves.next().unwrap_or("");
        let trg = match halves.next() {
            Some(t) => t,
            None => {
                return Err(MorfsegError::InvalidArgument(format!(
                    "cognate pair '{}' has no delimiter",
                    s
                )))
            }
        };
        CognatePair::new(Side::from(src), Side::from(trg))
    }

    fn to_string(&self, c: &CognatePair) -> String {
        format!("{}", c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_err;

    fn pair(src: &str, trg: &str) -> CognatePair {
        CognateMethods::pair(src, trg).unwrap()
    }

    #[test]
    fn both_sides_wildcard_is_forbidden() {
        assert_err!(CognatePair::new(Side::Wildcard, Side::Wildcard));
        assert_err!(CognateMethods.from_string(&format!("{}", PAIR_DELIMITER)));
    }

    #[test]
    fn string_round_trip() {
        let cc = CognateMethods;
        let p = pair("walk", "kävellä");
        let s = cc.to_string(&p);
        assert_eq!(cc.from_string(&s).unwrap(), p);

        let proj = pair("walk", "");
        assert!(proj.is_projection());
        let s = cc.to_string(&proj);
        assert!(s.ends_with(PAIR_DELIMITER));
        assert_eq!(cc.from_string(&s).unwrap(), proj);
    }

    #[test]
    fn wildcard_differs_from_empty_serialization_only() {
        // the wildcard never parses back as an empty sequence
        let proj = CognateMethods.from_string("ab\u{ffe8}").unwrap();
        assert!(proj.trg().is_wildcard());
        assert_eq!(proj.trg().word(), None);
    }

    #[test]
    fn split_locations_cover_both_sides() {
        let cc = CognateMethods;
        let p = pair("abc", "xy");
        let locs: Vec<(usize, usize)> = cc.split_locations(&p, None, None).collect();
        assert_eq!(locs, vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn wildcard_side_has_one_phantom_location() {
        let cc = CognateMethods;
        let p = pair("abc", "");
        let locs: Vec<(usize, usize)> = cc.split_locations(&p, None, None).collect();
        assert_eq!(locs, vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn split_keeps_wildcard_sides() {
        let cc = CognateMethods;
        let p = pair("abc", "");
        let (prefix, suffix) = cc.split(&p, (2, 5));
        assert_eq!(prefix, pair("ab", ""));
        assert_eq!(suffix, pair("c", ""));
    }

    #[test]
    fn splitn_slices_each_side() {
        let cc = CognateMethods;
        let p = pair("abcd", "xyz");
        let parts = cc.splitn(&p, &[(1, 1), (3, 2)]);
        assert_eq!(parts, vec![pair("a", "x"), pair("bc", "y"), pair("d", "z")]);
        assert_eq!(cc.parts_to_splitlocs(&parts), vec![(1, 1), (3, 2)]);
    }

    #[test]
    fn projections_of_a_full_pair() {
        let cc = CognateMethods;
        let p = pair("walk", "kävellä");
        let projs = cc.projections(&p);
        assert_eq!(projs, vec![pair("walk", ""), pair("", "kävellä")]);
        assert!(cc.projections(&projs[0]).is_empty());
    }

    #[test]
    fn analysis_validation_respects_wildcards() {
        let cc = CognateMethods;
        let p = pair("abc", "xy");
        assert!(cc.is_valid_analysis(&p, &[pair("a", "x"), pair("bc", "y")]));
        assert!(!cc.is_valid_analysis(&p, &[pair("a", "x"), pair("bc", "z")]));
        let proj = pair("abc", "");
        assert!(cc.is_valid_analysis(&proj, &[pair("a", ""), pair("bc", "")]));
        assert!(!cc.is_valid_analysis(&proj, &[pair("a", "x"), pair("bc", "")]));
    }
}
