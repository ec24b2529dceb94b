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

extern crate morfseg;

use morfseg::config::{Algorithm, Config};
use morfseg::construction::Word;
use morfseg::model::DataPoint;
use morfseg::prelude::*;

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

fn trained_cat_dog_model() -> BaselineModel<char> {
    let mut model: BaselineModel<char> = BaselineModel::new(Some(1.0));
    model
        .load_data(word_data(&[
            ("cats", 5),
            ("cat", 3),
            ("dogs", 2),
            ("dog", 4),
        ]))
        .unwrap();
    let config = Config {
        algorithm: Algorithm::Recursive,
        max_epochs: Some(1),
        seed: Some(42),
        ..Config::default()
    };
    model.train_batch(&config).unwrap();
    model
}

#[test]
fn shared_suffix_is_found_in_one_epoch() {
    let model = trained_cat_dog_model();

    assert_eq!(
        model.segment(&Word::from("cats")).unwrap(),
        vec![Word::from("cat"), Word::from("s")]
    );
    assert_eq!(
        model.segment(&Word::from("dogs")).unwrap(),
        vec![Word::from("dog"), Word::from("s")]
    );
    // the suffix morph is shared by both compounds
    assert_eq!(model.get_construction_count(&Word::from("s")).unwrap(), 7);
}

#[test]
fn training_reduces_the_cost() {
    let mut model: BaselineModel<char> = BaselineModel::new(None);
    let initial = model
        .load_data(word_data(&[
            ("cats", 5),
            ("cat", 3),
            ("dogs", 2),
            ("dog", 4),
        ]))
        .unwrap();
    let config = Config {
        max_epochs: Some(3),
        seed: Some(7),
        ..Config::default()
    };
    let (epochs, cost) = model.train_batch(&config).unwrap();
    assert!(epochs >= 1);
    assert!(cost < initial);
}

#[test]
fn viterbi_segments_unseen_words_against_the_lexicon() {
    let model = trained_cat_dog_model();
    let (segments, cost) = model
        .viterbi_segment(&Word::from("cater"), 1.0, 30, false)
        .unwrap();
    assert_eq!(segments, vec![Word::from("cat"), Word::from("er")]);
    assert!(cost.is_finite());
    assert!(cost > 0.0);
}

#[test]
fn viterbi_without_smoothing_falls_back_to_atoms() {
    let model = trained_cat_dog_model();
    let (segments, cost) = model
        .viterbi_segment(&Word::from("xyz"), 0.0, 30, false)
        .unwrap();
    // every atom is out of vocabulary, so each gets the penalty cost
    assert_eq!(
        segments,
        vec![Word::from("x"), Word::from("y"), Word::from("z")]
    );
    assert!(cost.is_finite());
}

#[test]
fn flatten_preserves_the_leaf_segmentation() {
    let mut model = trained_cat_dog_model();
    let before = model.segment(&Word::from("cats")).unwrap();
    let config = Config {
        algorithm: Algorithm::Flatten,
        ..Config::default()
    };
    let (epochs, _) = model.train_batch(&config).unwrap();
    assert_eq!(epochs, 1);
    assert_eq!(model.segment(&Word::from("cats")).unwrap(), before);
}

#[test]
fn segmentations_listing_covers_every_compound() {
    let model = trained_cat_dog_model();
    let segmentations = model.get_segmentations().unwrap();
    assert_eq!(segmentations.len(), 4);
    // sorted by compound, with the loaded counts
    assert_eq!(segmentations[0].0, 3);
    assert_eq!(segmentations[0].1, Word::from("cat"));
    let (count, compound, segments) = &segmentations[1];
    assert_eq!(*count, 5);
    assert_eq!(compound, &Word::from("cats"));
    assert_eq!(segments, &vec![Word::from("cat"), Word::from("s")]);
}

#[test]
fn clear_segmentation_resets_every_analysis() {
    let mut model = trained_cat_dog_model();
    model.clear_segmentation().unwrap();
    assert_eq!(
        model.segment(&Word::from("cats")).unwrap(),
        vec![Word::from("cats")]
    );
    assert_eq!(model.get_construction_count(&Word::from("s")).unwrap(), 0);
}

#[test]
fn fixed_seed_makes_training_reproducible() {
    let run = |seed: u64| {
        let mut model: BaselineModel<char> = BaselineModel::new(None);
        model
            .load_data(word_data(&[
                ("cats", 5),
                ("cat", 3),
                ("dogs", 2),
                ("dog", 4),
                ("walked", 2),
                ("walker", 1),
            ]))
            .unwrap();
        let config = Config {
            max_epochs: Some(2),
            seed: Some(seed),
            ..Config::default()
        };
        model.train_batch(&config).unwrap();
        model.get_segmentations().unwrap()
    };
    assert_eq!(run(11), run(11));
}
