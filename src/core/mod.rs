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

//! Sandbox components
//!
//! The conversion side turns Wavefront OBJ text into the model format:
//! - OBJ line parsing ([`obj`])
//! - Face materialization ([`convert`])
//! - Model text format and binary cache ([`model`])
//!
//! The rendering side loads those models and draws them:
//! - TGA textures and mip chains ([`texture`])
//! - Vector and matrix math ([`math`])
//! - Render backend seam and headless implementation ([`device`])
//! - Mesh buffers, light shader, camera and light
//! - Frame loop ([`graphics`], [`system`])

pub mod camera;
pub mod config;
pub mod convert;
pub mod device;
pub mod error;
pub mod graphics;
pub mod input;
pub mod light;
pub mod math;
pub mod mesh;
pub mod model;
pub mod obj;
pub mod shader;
pub mod system;
pub mod texture;

// Re-export commonly used types
pub use camera::Camera;
pub use config::SandboxConfig;
pub use convert::{convert_file, convert_str, ConversionReport};
pub use device::{Device, DeviceSettings, HeadlessBackend, RenderBackend};
pub use error::{ConfigError, ModelError, ObjError, RenderError, Result, SandboxError, TextureError};
pub use graphics::Graphics;
pub use input::Input;
pub use light::Light;
pub use mesh::{Mesh, Model};
pub use model::{ModelFile, ModelFormat, ModelRow};
pub use obj::ObjDocument;
pub use shader::LightShader;
pub use system::{RunSummary, ScriptedEvents, StopReason, System, WindowEvent};
pub use texture::Texture;
