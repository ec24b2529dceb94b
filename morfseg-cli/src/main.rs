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

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use structopt::StructOpt;

use morfseg::config::{Algorithm, Config};
use morfseg::construction::WordMethods;
use morfseg::io::{read_segmentations, read_word_counts, write_segmentations};
use morfseg::prelude::*;

/// An unsupervised morph segmentation trainer
///
/// Reads training words (or cognate pairs) with counts, learns a
/// segmentation by minimum description length and prints the resulting
/// segmentations.
#[derive(StructOpt)]
#[structopt(name = "morfseg")]
struct Cli {
    /// Input text file: If not present, read from STDIN
    #[structopt(parse(from_os_str))]
    file: Option<PathBuf>,

    /// Path to the setting file in JSON format
    #[structopt(short = "r", long = "config-file", parse(from_os_str))]
    config_file: Option<PathBuf>,

    /// Output text file: If not present, use stdout
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output_file: Option<PathBuf>,

    /// Treat input records as cognate pairs
    #[structopt(long = "cognate")]
    cognate: bool,

    /// Input is a segmentation listing instead of word counts
    #[structopt(long = "load-segmentations")]
    load_segmentations: bool,

    /// Splitting algorithm: "recursive", "viterbi" or "flatten"
    #[structopt(short = "a", long = "algorithm")]
    algorithm: Option<Algorithm>,

    /// Weight of the corpus code length
    #[structopt(short = "w", long = "corpusweight")]
    corpusweight: Option<f64>,

    /// Weight of the edit sub-model (cognate only)
    #[structopt(long = "edit-weight")]
    edit_weight: Option<f64>,

    /// Maximum number of training epochs
    #[structopt(short = "e", long = "max-epochs")]
    max_epochs: Option<u32>,

    /// Seed of the per-epoch shuffle
    #[structopt(short = "s", long = "seed")]
    seed: Option<u64>,

    /// Atoms at which splitting is forced, e.g. "-"
    #[structopt(long = "forcesplit")]
    forcesplit: Option<String>,

    /// Regular expression forbidding a boundary between two atoms
    #[structopt(long = "nosplit")]
    nosplit: Option<String>,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = match &self.config_file {
            Some(path) => Config::from_file(path).expect("Failed to load config file"),
            None => Config::default(),
        };
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(weight) = self.corpusweight {
            config.corpusweight = Some(weight);
        }
        if let Some(weight) = self.edit_weight {
            config.edit_weight = weight;
        }
        if let Some(max_epochs) = self.max_epochs {
            config.max_epochs = Some(max_epochs);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config
    }
}

fn main() {
    env_logger::init();

    let args: Cli = Cli::from_args();
    let config = args.config();

    let inner_reader: Box<dyn Read> = match args.file.as_ref() {
        Some(input_path) => Box::new(
            File::open(input_path)
                .unwrap_or_else(|_| panic!("Failed to open input file {:?}", &input_path)),
        ),
        None => Box::new(io::stdin()),
    };
    let reader = BufReader::new(inner_reader);

    let inner_writer: Box<dyn Write> = match &args.output_file {
        Some(output_path) => Box::new(
            File::create(&output_path)
                .unwrap_or_else(|_| panic!("Failed to open output file {:?}", &output_path)),
        ),
        None => Box::new(io::stdout()),
    };
    let mut writer = BufWriter::new(inner_writer);

    if args.cognate {
        run_cognate(&args, &config, reader, &mut writer);
    } else {
        run_baseline(&args, &config, reader, &mut writer);
    }

    writer.flush().expect("flush failed");
}

fn run_baseline<R: BufRead, W: Write>(args: &Cli, config: &Config, reader: R, writer: &mut W) {
    let mut cc: WordMethods<char> = WordMethods::new();
    if let Some(forcesplit) = &args.forcesplit {
        cc = cc.with_force_split(forcesplit.chars());
    }
    if let Some(nosplit) = &args.nosplit {
        cc = cc.with_nosplit(nosplit).expect("Invalid nosplit pattern");
    }

    let mut model: BaselineModel<char> = BaselineModel::with_methods(cc, config.corpusweight);
    load(args, config, reader, &mut model);
    model.train_batch(config).expect("Training failed");
    write_segmentations(&model, writer).expect("Failed to write segmentations");
}

fn run_cognate<R: BufRead, W: Write>(args: &Cli, config: &Config, reader: R, writer: &mut W) {
    let mut model = CognateModel::new(config.corpusweight);
    model.set_edit_weight(config.edit_weight);
    load(args, config, reader, &mut model);
    model.train_batch(config).expect("Training failed");
    write_segmentations(&model, writer).expect("Failed to write segmentations");
}

fn load<CC, M, R>(
    args: &Cli,
    _config: &Config,
    reader: R,
    model: &mut morfseg::model::Model<CC, M>,
) where
    CC: morfseg::construction::ConstructionMethods,
    M: morfseg::cost::CostModel<Construction = CC::Construction>,
    R: BufRead,
{
    if args.load_segmentations {
        let segmentations =
            read_segmentations(model.cc(), reader).expect("Failed to read segmentations");
        model
            .load_segmentations(segmentations)
            .expect("Failed to load segmentations");
    } else {
        let data = read_word_counts(model.cc(), reader).expect("Failed to read training data");
        model.load_data(data).expect("Failed to load training data");
    }
}
