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

/// Sandbox error types
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sandbox operations
pub type Result<T, E = SandboxError> = std::result::Result<T, E>;

/// Main error type for the sandbox
#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("OBJ error: {0}")]
    Obj(#[from] ObjError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SandboxError {
    /// Process exit code reported by the command line tools
    ///
    /// Attribute parse failures and face parse failures keep distinct codes so
    /// scripts driving the converter can tell them apart.
    pub fn exit_code(&self) -> u8 {
        match self {
            SandboxError::Obj(ObjError::IndexOutOfRange { .. }) => 20,
            SandboxError::Obj(e) if e.is_face_error() => 15,
            SandboxError::Obj(_) => 10,
            SandboxError::Model(ModelError::Io { .. }) | SandboxError::Io { .. } => 30,
            SandboxError::Model(_) => 40,
            SandboxError::Texture(_) => 50,
            SandboxError::Config(_) => 60,
            SandboxError::Render(_) => 70,
        }
    }

    /// Status returned by `model-converter`, which reports failures as the
    /// negated exit code
    pub fn converter_status(&self) -> i32 {
        -i32::from(self.exit_code())
    }
}

/// OBJ parsing and face resolution errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObjError {
    #[error("line {line}: no tokens in '{text}'")]
    Empty { line: usize, text: String },

    #[error("line {line}: not enough tokens in '{text}' (expected {expected}, got {got})")]
    NotEnoughTokens {
        line: usize,
        text: String,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: too many tokens in '{text}' (expected {expected}, first extra '{extra}')")]
    TooManyTokens {
        line: usize,
        text: String,
        expected: usize,
        extra: String,
    },

    #[error("line {line}: failed to convert token '{token}' to float")]
    InvalidFloat { line: usize, token: String },

    #[error("line {line}: face has {got} corners, expected a triangle")]
    FaceArity { line: usize, got: usize },

    #[error("line {line}: invalid face corner '{corner}': {reason}")]
    InvalidFaceCorner {
        line: usize,
        corner: String,
        reason: &'static str,
    },

    #[error("line {line}: {kind} index {index} out of range (have {len})")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
        len: usize,
    },
}

impl ObjError {
    /// Whether the error came from an `f` record rather than a vertex attribute
    pub fn is_face_error(&self) -> bool {
        matches!(
            self,
            ObjError::FaceArity { .. }
                | ObjError::InvalidFaceCorner { .. }
                | ObjError::IndexOutOfRange { .. }
        )
    }
}

/// Sandbox model file errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("could not open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model file is empty")]
    EmptyFile,

    #[error("could not parse vertex count from '{0}', expected a single integer")]
    InvalidHeader(String),

    #[error("row {row}: expected 8 values, got {got}")]
    ShortRow { row: usize, got: usize },

    #[error("row {row}: failed to convert token '{token}' to float")]
    InvalidFloat { row: usize, token: String },

    #[error("more vertices in file than specified (expected {expected})")]
    TooManyRows { expected: usize },

    #[error("parsed fewer rows ({got}) than vertex count specified ({expected})")]
    TooFewRows { expected: usize, got: usize },

    #[error("vertex count {0} does not fit a 32-bit index buffer")]
    TooManyVertices(usize),

    #[error("cache encode failed: {0}")]
    CacheEncode(#[from] bincode::error::EncodeError),

    #[error("cache decode failed: {0}")]
    CacheDecode(#[from] bincode::error::DecodeError),

    #[error("incompatible model cache version: expected {expected}, got {got}")]
    CacheVersion { expected: u32, got: u32 },
}

/// TGA texture errors
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("could not open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file too small for a TGA header: {0} bytes")]
    HeaderTooShort(usize),

    #[error("unsupported TGA image type {0} (only uncompressed true-color is accepted)")]
    UnsupportedImageType(u8),

    #[error("unsupported TGA depth {0} bpp (only 32-bit is accepted)")]
    UnsupportedDepth(u8),

    #[error("TGA has zero-sized dimensions {width}x{height}")]
    EmptyImage { width: u16, height: u16 },

    #[error("truncated TGA pixel data: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Rendering backend errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("missing shader file '{0}'")]
    MissingShader(PathBuf),

    #[error("unknown buffer {0}")]
    UnknownBuffer(u32),

    #[error("unknown texture {0}")]
    UnknownTexture(u32),

    #[error("buffer {id} is {expected} bytes, upload was {got}")]
    SizeMismatch {
        id: u32,
        expected: usize,
        got: usize,
    },

    #[error("buffer {id} is not bindable as {usage}")]
    InvalidBinding { id: u32, usage: &'static str },

    #[error("draw call issued outside begin_scene/end_scene")]
    NotInScene,

    #[error("draw of {count} indices exceeds bound index buffer ({available})")]
    IndexOverrun { count: u32, available: u32 },

    #[error("input layout mismatch: layout covers {layout} bytes, vertex stride is {stride}")]
    LayoutMismatch { layout: u32, stride: u32 },

    #[error("backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_split_attribute_and_face_errors() {
        let attr: SandboxError = ObjError::InvalidFloat {
            line: 3,
            token: "x".to_string(),
        }
        .into();
        assert_eq!(attr.exit_code(), 10);

        let face: SandboxError = ObjError::FaceArity { line: 9, got: 4 }.into();
        assert_eq!(face.exit_code(), 15);

        let index: SandboxError = ObjError::IndexOutOfRange {
            line: 9,
            kind: "normal",
            index: 7,
            len: 2,
        }
        .into();
        assert_eq!(index.exit_code(), 20);
    }

    #[test]
    fn test_converter_status_is_negated() {
        let face: SandboxError = ObjError::FaceArity { line: 4, got: 5 }.into();
        assert_eq!(face.converter_status(), -15);

        let io = SandboxError::Io {
            path: PathBuf::from("out.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(io.converter_status(), -30);
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = ObjError::TooManyTokens {
            line: 2,
            text: "vt 0.1 0.2 0.3".to_string(),
            expected: 2,
            extra: "0.3".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("line 2"));
        assert!(message.contains("first extra '0.3'"));
    }
}
