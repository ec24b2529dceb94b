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

//! Tabular readers and writers for the training and segmentation data
//! streams. Word-count lines are `count SP compound`; segmentation lines
//! are `count TAB compound TAB seg1 + seg2 + …`. Lines starting with `#`
//! are comments.

use std::io::{BufRead, Write};

use itertools::Itertools;

use crate::construction::ConstructionMethods;
use crate::cost::CostModel;
use crate::error::{MorfsegError, MorfsegResult};
use crate::model::{DataPoint, Model};

const COMMENT_START: char = '#';
const CONSTRUCTION_SEPARATOR: &str = " + ";

/// Reads `count SP compound` lines into data points without initial
/// splits.
pub fn read_word_counts<CC, R>(
    cc: &CC,
    reader: R,
) -> MorfsegResult<Vec<DataPoint<CC::Construction, CC::SplitLoc>>>
where
    CC: ConstructionMethods,
    R: BufRead,
{
    let mut data = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_START) {
            continue;
        }
        let mut fields = trimmed.splitn(2, char::is_whitespace);
        let count_field = fields.next().unwrap_or("");
        let compound_field = match fields.next() {
            Some(w) => w.trim(),
            None => {
                return Err(MorfsegError::InvalidDataFormat(
                    number + 1,
                    String::from("expected 'count compound'"),
                ))
            }
        };
        let count: i64 = count_field.parse()?;
        let compound = cc.from_string(compound_field)?;
        data.push(DataPoint {
            compound,
            count,
            splitlocs: Vec::new(),
        });
    }
    Ok(data)
}

/// Reads `count TAB compound TAB seg1 + seg2 + …` lines, the format
/// written by [`write_segmentations`].
pub fn read_segmentations<CC, R>(
    cc: &CC,
    reader: R,
) -> MorfsegResult<Vec<(i64, CC::Construction, Vec<CC::Construction>)>>
where
    CC: ConstructionMethods,
    R: BufRead,
{
    let mut segmentations = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with(COMMENT_START) {
            continue;
        }
        let fields: Vec<&str> = line.trim_end_matches('\n').split('\t').collect();
        if fields.len() != 3 {
            return Err(MorfsegError::InvalidDataFormat(
                number + 1,
                String::from("expected 'count<TAB>compound<TAB>segmentation'"),
            ));
        }
        let count: i64 = fields[0].parse()?;
        let compound = cc.from_string(fields[1])?;
        let parts = fields[2]
            .split(CONSTRUCTION_SEPARATOR)
            .map(|p| cc.from_string(p))
            .collect::<MorfsegResult<Vec<CC::Construction>>>()?;
        if !cc.is_valid_analysis(&compound, &parts) {
            return Err(MorfsegError::InvalidDataFormat(
                number + 1,
                format!("segmentation does not concatenate to '{}'", fields[1]),
            ));
        }
        segmentations.push((count, compound, parts));
    }
    Ok(segmentations)
}

/// Writes every loaded compound as `count TAB compound TAB seg1 + seg2 + …`.
pub fn write_segmentations<CC, M, W>(model: &Model<CC, M>, writer: &mut W) -> MorfsegResult<()>
where
    CC: ConstructionMethods,
    M: CostModel<Construction = CC::Construction>,
    W: Write,
{
    let cc = model.cc();
    for (count, compound, segments) in model.get_segmentations()? {
        writeln!(
            writer,
            "{}\t{}\t{}",
            count,
            cc.to_string(&compound),
            segments.iter().map(|s| cc.to_string(s)).join(CONSTRUCTION_SEPARATOR)
        )?;
    }
    Ok(())
}
