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

use crate::construction::CognateMethods;
use crate::cost::CognateCost;
use crate::model::Model;

/// The bilingual model: compounds are cognate pairs, the cost couples a
/// source, a target and an edit lexicon. Loading a pair also loads its
/// two wildcard projections, which from then on mirror the analysis of
/// the pair.
pub type CognateModel = Model<CognateMethods, CognateCost>;

impl Model<CognateMethods, CognateCost> {
    pub fn new(corpusweight: Option<f64>) -> CognateModel {
        let weight = corpusweight.unwrap_or(1.0);
        Model::from_parts(CognateMethods, CognateCost::new(weight), corpusweight)
    }

    /// Scales the edit sub-model relative to the two lexicons.
    pub fn set_edit_weight(&mut self, weight: f64) {
        self.cost.set_edit_weight(weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::ConstructionMethods;

    #[test]
    fn edit_weight_scales_the_total_cost() {
        let cc = CognateMethods;
        let pair = cc.from_string("walk\u{ffe8}walked").unwrap();

        let mut light = CognateModel::new(None);
        light.add_compound(&pair, 1).unwrap();
        let mut heavy = CognateModel::new(None);
        heavy.set_edit_weight(3.0);
        heavy.add_compound(&pair, 1).unwrap();

        assert!(heavy.get_cost() > light.get_cost());
    }
}
