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

//! Sandbox model file format
//!
//! The renderer consumes a pre-materialized triangle list: every row is one
//! vertex and every three rows form a triangle, so no index data is stored.
//!
//! # Text Format
//!
//! ```text
//! 3
//! -1.000000 -1.000000 0.000000 0.000000 1.000000 0.000000 0.000000 -1.000000
//! -1.000000 1.000000 0.000000 0.000000 0.000000 0.000000 0.000000 -1.000000
//! 1.000000 1.000000 0.000000 1.000000 0.000000 0.000000 0.000000 -1.000000
//! ```
//!
//! The first non-empty line is the vertex count. Each following non-empty
//! line holds `posX posY posZ texU texV normX normY normZ`.
//!
//! # Binary Cache
//!
//! [`ModelCache`] stores the same rows with bincode behind an 8-byte magic,
//! so large models skip float parsing. [`ModelFile::load`] accepts either form.


use super::error::ModelError;
use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Values per model row
pub const ROW_VALUES: usize = 8;

/// Model cache version for compatibility checking
pub const MODEL_CACHE_VERSION: u32 = 1;

/// Leading bytes of a binary model cache
pub const CACHE_MAGIC: &[u8; 8] = b"DXSMODEL";

/// On-disk model format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ModelFormat {
    /// Line-based text rows
    #[default]
    Text,
    /// bincode cache
    Binary,
}

/// One material vertex: position, texel and normal
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct ModelRow {
    pub position: [f32; 3],
    pub texel: [f32; 2],
    pub normal: [f32; 3],
}

impl ModelRow {
    pub fn from_values(v: [f32; ROW_VALUES]) -> Self {
        Self {
            position: [v[0], v[1], v[2]],
            texel: [v[3], v[4]],
            normal: [v[5], v[6], v[7]],
        }
    }

    /// Values in file column order
    pub fn values(&self) -> [f32; ROW_VALUES] {
        let [px, py, pz] = self.position;
        let [u, v] = self.texel;
        let [nx, ny, nz] = self.normal;
        [px, py, pz, u, v, nx, ny, nz]
    }
}

/// A loaded sandbox model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelFile {
    pub rows: Vec<ModelRow>,
}

impl ModelFile {
    pub fn new(rows: Vec<ModelRow>) -> Self {
        Self { rows }
    }

    pub fn vertex_count(&self) -> usize {
        self.rows.len()
    }

    /// Parse the text format
    ///
    /// # Errors
    ///
    /// - [`ModelError::EmptyFile`] if there is no header line
    /// - [`ModelError::InvalidHeader`] if the header is not a vertex count
    /// - [`ModelError::ShortRow`] / [`ModelError::InvalidFloat`] for bad rows
    /// - [`ModelError::TooManyRows`] / [`ModelError::TooFewRows`] when the
    ///   row count disagrees with the header
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let header = lines.next().ok_or(ModelError::EmptyFile)?;
        let expected: usize = header
            .parse()
            .map_err(|_| ModelError::InvalidHeader(header.to_string()))?;

        // The header is untrusted, so don't let it drive a huge allocation
        let mut rows = Vec::with_capacity(expected.min(1 << 16));

        for line in lines {
            if rows.len() == expected {
                return Err(ModelError::TooManyRows { expected });
            }
            let row = rows.len() + 1;

            let mut values = [0.0f32; ROW_VALUES];
            let mut tokens = line.split_whitespace();
            for (parsed, slot) in values.iter_mut().enumerate() {
                let token = tokens
                    .next()
                    .ok_or(ModelError::ShortRow { row, got: parsed })?;
                *slot = token.parse().map_err(|_| ModelError::InvalidFloat {
                    row,
                    token: token.to_string(),
                })?;
            }

            let extra = tokens.count();
            if extra > 0 {
                log::warn!("Row {} has {} extra values, ignoring them", row, extra);
            }

            log::trace!("Row {}: {:?}", row, values);
            rows.push(ModelRow::from_values(values));
        }

        if rows.len() < expected {
            return Err(ModelError::TooFewRows {
                expected,
                got: rows.len(),
            });
        }

        Ok(Self { rows })
    }

    /// Load a model from disk, text or binary cache
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let model = if bytes.starts_with(CACHE_MAGIC) {
            ModelCache::decode(&bytes)?.into_model()
        } else {
            let text = String::from_utf8_lossy(&bytes);
            Self::parse(&text)?
        };

        log::info!(
            "Loaded model '{}' ({} vertices)",
            path.display(),
            model.vertex_count()
        );
        Ok(model)
    }

    /// Write the text format
    ///
    /// Values are printed with six decimal places.
    pub fn write_text<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self.rows.len())?;
        for row in &self.rows {
            let [px, py, pz, u, v, nx, ny, nz] = row.values();
            writeln!(
                writer,
                "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
                px, py, pz, u, v, nx, ny, nz
            )?;
        }
        Ok(())
    }

    pub fn to_text(&self) -> String {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_text(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Save in the given format
    pub fn save<P: AsRef<Path>>(&self, path: P, format: ModelFormat) -> Result<(), ModelError> {
        let path = path.as_ref();
        let io_error = |source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        };

        match format {
            ModelFormat::Text => {
                let file = fs::File::create(path).map_err(io_error)?;
                let mut writer = io::BufWriter::new(file);
                self.write_text(&mut writer).map_err(io_error)?;
                writer.flush().map_err(io_error)?;
            }
            ModelFormat::Binary => {
                let source = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let encoded = ModelCache::new(self, source).encode()?;
                fs::write(path, encoded).map_err(io_error)?;
            }
        }

        log::info!("Output written to: {}", path.display());
        Ok(())
    }
}

/// Binary model cache
#[derive(Serialize, Deserialize, Encode, Decode)]
pub struct ModelCache {
    /// Version number for compatibility checking
    pub version: u32,

    pub metadata: CacheMetadata,

    pub rows: Vec<ModelRow>,
}

/// Where and when a cache was produced
#[derive(Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct CacheMetadata {
    #[bincode(with_serde)]
    pub created: DateTime<Utc>,

    /// Name of the model the cache was built from
    pub source: String,
}

impl ModelCache {
    pub fn new(model: &ModelFile, source: impl Into<String>) -> Self {
        Self {
            version: MODEL_CACHE_VERSION,
            metadata: CacheMetadata {
                created: Utc::now(),
                source: source.into(),
            },
            rows: model.rows.clone(),
        }
    }

    /// Encode with the magic prefix
    pub fn encode(&self) -> Result<Vec<u8>, ModelError> {
        let mut out = CACHE_MAGIC.to_vec();
        out.extend(bincode::encode_to_vec(self, config::standard())?);
        Ok(out)
    }

    /// Decode bytes produced by [`ModelCache::encode`]
    pub fn decode(bytes: &[u8]) -> Result<Self, ModelError> {
        let payload = bytes.strip_prefix(CACHE_MAGIC.as_slice()).ok_or_else(|| {
            let head = &bytes[..bytes.len().min(8)];
            ModelError::InvalidHeader(String::from_utf8_lossy(head).into_owned())
        })?;

        let (cache, _): (ModelCache, usize) =
            bincode::decode_from_slice(payload, config::standard())?;

        if cache.version != MODEL_CACHE_VERSION {
            return Err(ModelError::CacheVersion {
                expected: MODEL_CACHE_VERSION,
                got: cache.version,
            });
        }

        Ok(cache)
    }

    pub fn into_model(self) -> ModelFile {
        ModelFile { rows: self.rows }
    }
}
