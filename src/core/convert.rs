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

//! OBJ to sandbox model conversion
//!
//! Each triangle of the OBJ file is expanded into three material vertices,
//! one per corner, by looking up the position, texel and normal that the
//! corner references. OBJ texel space has its origin at the bottom-left while
//! textures are sampled from the top-left, so the V coordinate is flipped on
//! the way through.

use super::error::{ObjError, Result, SandboxError};
use super::model::{ModelFile, ModelFormat, ModelRow};
use super::obj::{FaceCorner, ObjDocument};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Turn a raw OBJ index into a zero-based array index
///
/// Positive indices are 1-based. Negative indices count back from the end of
/// the attribute list, so `-1` is the last one in the file.
pub fn resolve_index(
    raw: i64,
    len: usize,
    kind: &'static str,
    line: usize,
) -> Result<usize, ObjError> {
    let out_of_range = || ObjError::IndexOutOfRange {
        line,
        kind,
        index: raw,
        len,
    };

    let resolved = if raw > 0 {
        usize::try_from(raw - 1).map_err(|_| out_of_range())?
    } else if raw < 0 {
        let back = usize::try_from(raw.unsigned_abs()).map_err(|_| out_of_range())?;
        len.checked_sub(back).ok_or_else(out_of_range)?
    } else {
        return Err(out_of_range());
    };

    if resolved < len {
        Ok(resolved)
    } else {
        Err(out_of_range())
    }
}

/// Flip a texel from bottom-left to top-left origin
#[inline]
pub fn flip_texel(texel: [f32; 2]) -> [f32; 2] {
    [texel[0], 1.0 - texel[1]]
}

fn materialize_corner(
    doc: &ObjDocument,
    corner: &FaceCorner,
    line: usize,
) -> Result<ModelRow, ObjError> {
    let position = resolve_index(corner.position, doc.positions.len(), "position", line)?;
    let texel = resolve_index(corner.texel, doc.texels.len(), "texel", line)?;
    let normal = resolve_index(corner.normal, doc.normals.len(), "normal", line)?;

    Ok(ModelRow {
        position: doc.positions[position],
        texel: flip_texel(doc.texels[texel]),
        normal: doc.normals[normal],
    })
}

/// Expand every face into three material vertices, in corner order
pub fn materialize(doc: &ObjDocument) -> Result<Vec<ModelRow>, ObjError> {
    let mut rows = Vec::with_capacity(doc.faces.len() * 3);

    for face in &doc.faces {
        for corner in &face.corners {
            rows.push(materialize_corner(doc, corner, face.line)?);
        }
    }

    log::debug!(
        "Materialized {} vertices from {} faces",
        rows.len(),
        doc.faces.len()
    );
    Ok(rows)
}

/// Parse OBJ text and build the sandbox model
pub fn convert_str(text: &str) -> Result<(ModelFile, ConversionReport), ObjError> {
    let doc = ObjDocument::parse(text)?;
    let rows = materialize(&doc)?;

    let report = ConversionReport {
        positions: doc.positions.len(),
        texels: doc.texels.len(),
        normals: doc.normals.len(),
        faces: doc.faces.len(),
        skipped_lines: doc.skipped_lines,
        vertices: rows.len(),
    };

    Ok((ModelFile::new(rows), report))
}

/// Summary of a finished conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub positions: usize,
    pub texels: usize,
    pub normals: usize,
    pub faces: usize,
    pub skipped_lines: usize,
    pub vertices: usize,
}

impl ConversionReport {
    /// Lines that contributed to the output
    pub fn relevant_lines(&self) -> usize {
        self.positions + self.texels + self.normals + self.faces
    }
}

/// Convert an OBJ file on disk into a sandbox model file
///
/// # Errors
///
/// Returns [`SandboxError::Io`] if the input can't be read, [`SandboxError::Obj`]
/// for malformed input and [`SandboxError::Model`] if the output can't be
/// written.
pub fn convert_file<P, Q>(input: P, output: Q, format: ModelFormat) -> Result<ConversionReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input = input.as_ref();
    let output = output.as_ref();

    log::info!("Attempting to convert model file: {}", input.display());
    let text = fs::read_to_string(input).map_err(|source| SandboxError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let (model, report) = convert_str(&text)?;
    log::info!(
        "Extracted {} relevant lines, materialized {} vertices",
        report.relevant_lines(),
        report.vertices
    );

    model.save(output, format)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
v -1 -1 0
v -1 1 0
v 1 1 0
v 1 -1 0
vt 0 0
vt 0 1
vt 1 1
vt 1 0
vn 0 0 -1
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

    #[test]
    fn test_resolve_positive_index() {
        assert_eq!(resolve_index(1, 4, "position", 1).unwrap(), 0);
        assert_eq!(resolve_index(4, 4, "position", 1).unwrap(), 3);
    }

    #[test]
    fn test_resolve_negative_index() {
        assert_eq!(resolve_index(-1, 4, "texel", 1).unwrap(), 3);
        assert_eq!(resolve_index(-4, 4, "texel", 1).unwrap(), 0);
    }

    #[test]
    fn test_resolve_out_of_range() {
        let err = resolve_index(5, 4, "normal", 12).unwrap_err();
        assert_eq!(
            err,
            ObjError::IndexOutOfRange {
                line: 12,
                kind: "normal",
                index: 5,
                len: 4,
            }
        );
        assert!(resolve_index(-5, 4, "normal", 12).is_err());
        assert!(resolve_index(0, 4, "normal", 12).is_err());
        assert!(resolve_index(1, 0, "normal", 12).is_err());
        assert!(resolve_index(i64::MIN, 4, "normal", 12).is_err());
    }

    #[test]
    fn test_flip_texel() {
        assert_eq!(flip_texel([0.25, 0.0]), [0.25, 1.0]);
        assert_eq!(flip_texel([0.25, 1.0]), [0.25, 0.0]);
        assert_eq!(flip_texel([0.5, 0.25]), [0.5, 0.75]);
    }

    #[test]
    fn test_materialize_quad() {
        let doc = ObjDocument::parse(QUAD).unwrap();
        let rows = materialize(&doc).unwrap();

        assert_eq!(rows.len(), 6);
        // Second triangle, third corner references v4/vt4
        assert_eq!(rows[5].position, [1.0, -1.0, 0.0]);
        assert_eq!(rows[5].texel, [1.0, 1.0]);
        // vt2 = (0, 1) flips to (0, 0)
        assert_eq!(rows[1].texel, [0.0, 0.0]);
        assert!(rows.iter().all(|row| row.normal == [0.0, 0.0, -1.0]));
    }

    #[test]
    fn test_materialize_reports_bad_index() {
        let doc = ObjDocument::parse("v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 1/1/1 1/2/1\n").unwrap();
        let err = materialize(&doc).unwrap_err();
        assert!(matches!(
            err,
            ObjError::IndexOutOfRange {
                line: 4,
                kind: "texel",
                index: 2,
                len: 1,
            }
        ));
    }

    #[test]
    fn test_convert_str_report() {
        let (model, report) = convert_str(QUAD).unwrap();
        assert_eq!(model.vertex_count(), 6);
        assert_eq!(report.faces, 2);
        assert_eq!(report.vertices, 6);
        assert_eq!(report.relevant_lines(), 11);
        assert_eq!(report.skipped_lines, 0);
    }

    #[test]
    fn test_convert_str_output_text() {
        let (model, _) =
            convert_str("v 1 2 3\nvt 0.25 0.25\nvn 0 1 0\nf 1/1/1 1/1/1 1/1/1\n").unwrap();
        let text = model.to_text();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("3"));
        assert_eq!(
            lines.next(),
            Some("1.000000 2.000000 3.000000 0.250000 0.750000 0.000000 1.000000 0.000000")
        );
        assert_eq!(lines.count(), 2);
    }
}
