// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Wavefront OBJ parsing
//!
//! Only the records needed to build a textured, lit triangle list are read:
//!
//! ```text
//! v  <x> <y> <z>          position
//! vt <u> <v>              texel
//! vn <x> <y> <z>          normal
//! f  <v/vt/vn> x3         triangle
//! ```
//!
//! Every other line (comments, object names, smoothing groups, material
//! statements, blank lines) is skipped. Records are classified first and then
//! parsed kind by kind, so attribute errors are reported before face errors.
//!
//! # Example
//!
//! ```
//! use dxsandbox::core::obj::ObjDocument;
//!
//! let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 -1\nf 1/1/1 2/1/1 3/1/1\n";
//! let doc = ObjDocument::parse(text).unwrap();
//! assert_eq!(doc.positions.len(), 3);
//! assert_eq!(doc.faces.len(), 1);
//! ```


use super::error::ObjError;

/// Record kinds the converter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Position,
    Texel,
    Normal,
    Face,
}

impl LineKind {
    /// Leading keyword for this record
    pub fn keyword(self) -> &'static str {
        match self {
            LineKind::Position => "v",
            LineKind::Texel => "vt",
            LineKind::Normal => "vn",
            LineKind::Face => "f",
        }
    }

    /// Number of tokens expected after the keyword
    pub fn arity(self) -> usize {
        match self {
            LineKind::Position | LineKind::Normal => 3,
            LineKind::Texel => 2,
            LineKind::Face => 3,
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "v" => Some(LineKind::Position),
            "vt" => Some(LineKind::Texel),
            "vn" => Some(LineKind::Normal),
            "f" => Some(LineKind::Face),
            _ => None,
        }
    }
}

/// A line of the input along with its 1-based position in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Relevant input lines, grouped by record kind
#[derive(Debug, Default)]
pub struct LineBuckets<'a> {
    pub positions: Vec<SourceLine<'a>>,
    pub texels: Vec<SourceLine<'a>>,
    pub normals: Vec<SourceLine<'a>>,
    pub faces: Vec<SourceLine<'a>>,

    /// Lines with an unknown or missing keyword
    pub skipped: usize,
}

impl LineBuckets<'_> {
    /// Number of lines that will be parsed
    pub fn relevant(&self) -> usize {
        self.positions.len() + self.texels.len() + self.normals.len() + self.faces.len()
    }
}

/// Sort the lines of `text` into per-kind buckets
///
/// A line belongs to a bucket when its first whitespace-separated token is
/// exactly one of `v`, `vt`, `vn` or `f`. Texture (`vt`) and normal (`vn`)
/// records are therefore never mistaken for positions.
pub fn classify_lines(text: &str) -> LineBuckets<'_> {
    let mut buckets = LineBuckets::default();

    for (index, text) in text.lines().enumerate() {
        let line = SourceLine {
            number: index + 1,
            text,
        };

        let kind = text
            .split_whitespace()
            .next()
            .and_then(LineKind::from_keyword);

        match kind {
            Some(LineKind::Position) => buckets.positions.push(line),
            Some(LineKind::Texel) => buckets.texels.push(line),
            Some(LineKind::Normal) => buckets.normals.push(line),
            Some(LineKind::Face) => buckets.faces.push(line),
            None => {
                log::debug!(
                    "Skipping line {} with unknown prefix: '{}'",
                    line.number,
                    text
                );
                buckets.skipped += 1;
            }
        }
    }

    buckets
}

/// Parse a vertex attribute record of exactly `N` floats after the keyword
pub fn parse_attribute<const N: usize>(line: SourceLine<'_>) -> Result<[f32; N], ObjError> {
    let mut tokens = line.text.split_whitespace();

    if tokens.next().is_none() {
        return Err(ObjError::Empty {
            line: line.number,
            text: line.text.to_string(),
        });
    }

    let mut values = [0.0f32; N];
    for (parsed, slot) in values.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| ObjError::NotEnoughTokens {
            line: line.number,
            text: line.text.to_string(),
            expected: N,
            got: parsed,
        })?;

        *slot = token.parse::<f32>().map_err(|_| ObjError::InvalidFloat {
            line: line.number,
            token: token.to_string(),
        })?;
    }

    if let Some(extra) = tokens.next() {
        return Err(ObjError::TooManyTokens {
            line: line.number,
            text: line.text.to_string(),
            expected: N,
            extra: extra.to_string(),
        });
    }

    Ok(values)
}

/// One corner of a face: raw 1-based (or negative, relative) OBJ indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    pub position: i64,
    pub texel: i64,
    pub normal: i64,
}

impl FaceCorner {
    /// Decode a `v/vt/vn` triplet
    pub fn parse(token: &str, line: usize) -> Result<Self, ObjError> {
        let invalid = |reason| ObjError::InvalidFaceCorner {
            line,
            corner: token.to_string(),
            reason,
        };

        let mut parts = token.split('/');
        let mut next_index = || -> Result<i64, ObjError> {
            let part = parts.next().ok_or_else(|| invalid("expected v/vt/vn"))?;
            if part.is_empty() {
                return Err(invalid("missing index component"));
            }
            let index = part
                .parse::<i64>()
                .map_err(|_| invalid("index is not an integer"))?;
            if index == 0 {
                return Err(invalid("OBJ indices start at 1"));
            }
            Ok(index)
        };

        let position = next_index()?;
        let texel = next_index()?;
        let normal = next_index()?;

        if parts.next().is_some() {
            return Err(invalid("too many index components"));
        }

        Ok(Self {
            position,
            texel,
            normal,
        })
    }
}

/// A triangular face and the line it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub corners: [FaceCorner; 3],
    pub line: usize,
}

/// Parse an `f` record of exactly three corners
pub fn parse_face(line: SourceLine<'_>) -> Result<Face, ObjError> {
    let mut tokens = line.text.split_whitespace();

    if tokens.next().is_none() {
        return Err(ObjError::Empty {
            line: line.number,
            text: line.text.to_string(),
        });
    }

    let corners: Vec<&str> = tokens.collect();
    if corners.len() != LineKind::Face.arity() {
        return Err(ObjError::FaceArity {
            line: line.number,
            got: corners.len(),
        });
    }

    Ok(Face {
        corners: [
            FaceCorner::parse(corners[0], line.number)?,
            FaceCorner::parse(corners[1], line.number)?,
            FaceCorner::parse(corners[2], line.number)?,
        ],
        line: line.number,
    })
}

/// Parsed contents of an OBJ file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjDocument {
    pub positions: Vec<[f32; 3]>,
    pub texels: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<Face>,

    /// Lines ignored during classification
    pub skipped_lines: usize,
}

impl ObjDocument {
    /// Parse OBJ text
    ///
    /// # Errors
    ///
    /// Returns the first [`ObjError`] encountered. Positions are checked
    /// first, then texels, normals and faces.
    pub fn parse(text: &str) -> Result<Self, ObjError> {
        let buckets = classify_lines(text);
        log::info!(
            "Extracted {} relevant lines ({} skipped)",
            buckets.relevant(),
            buckets.skipped
        );

        let positions = buckets
            .positions
            .iter()
            .map(|line| parse_attribute::<3>(*line))
            .collect::<Result<Vec<_>, _>>()?;
        let texels = buckets
            .texels
            .iter()
            .map(|line| parse_attribute::<2>(*line))
            .collect::<Result<Vec<_>, _>>()?;
        let normals = buckets
            .normals
            .iter()
            .map(|line| parse_attribute::<3>(*line))
            .collect::<Result<Vec<_>, _>>()?;
        let faces = buckets
            .faces
            .iter()
            .map(|line| parse_face(*line))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Parsed {} positions, {} texels, {} normals, {} faces",
            positions.len(),
            texels.len(),
            normals.len(),
            faces.len()
        );

        Ok(Self {
            positions,
            texels,
            normals,
            faces,
            skipped_lines: buckets.skipped,
        })
    }
}
