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

//! Light shader pipeline
//!
//! Describes the vertex input layout, shader sources, sampler and constant
//! buffers used by the directional light shader, and packs the per-frame
//! parameters into byte layouts that match the HLSL `cbuffer` declarations.
//!
//! # Constant Buffers
//!
//! ```text
//! VS b0  MatrixBuffer  world, view, projection         192 bytes
//! VS b1  CameraBuffer  cameraPosition, padding          16 bytes
//! PS b0  LightBuffer   ambient, diffuse, direction,
//!                      specularPower, specularColor     64 bytes
//! ```
//!
//! The HLSL side reads matrices column-major, so they are transposed before
//! packing. Every buffer size is a multiple of 16 bytes.

use super::device::{BufferDesc, BufferId, RenderBackend, ShaderStage, TextureId};
use super::error::RenderError;
use super::light::Light;
use super::math::{Mat4, Vec3, Vec4};
use std::path::{Path, PathBuf};

/// Vertex attribute format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    R32G32Float,
    R32G32B32Float,
}

impl Format {
    pub fn size(self) -> u32 {
        match self {
            Format::R32G32Float => 8,
            Format::R32G32B32Float => 12,
        }
    }
}

/// Byte offset of an element within a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOffset {
    Fixed(u32),
    /// Directly after the previous element
    AppendAligned,
}

/// One entry of the vertex input layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputElement {
    pub semantic: &'static str,
    pub semantic_index: u32,
    pub format: Format,
    pub input_slot: u32,
    pub offset: ElementOffset,
}

/// Layout matching [`crate::core::mesh::Vertex`]
pub const LIGHT_LAYOUT: [InputElement; 3] = [
    InputElement {
        semantic: "POSITION",
        semantic_index: 0,
        format: Format::R32G32B32Float,
        input_slot: 0,
        offset: ElementOffset::Fixed(0),
    },
    InputElement {
        semantic: "TEXCOORD",
        semantic_index: 0,
        format: Format::R32G32Float,
        input_slot: 0,
        offset: ElementOffset::AppendAligned,
    },
    InputElement {
        semantic: "NORMAL",
        semantic_index: 0,
        format: Format::R32G32B32Float,
        input_slot: 0,
        offset: ElementOffset::AppendAligned,
    },
];

/// Resolve every element's byte offset
pub fn resolve_offsets(layout: &[InputElement]) -> Vec<u32> {
    let mut cursor = 0;
    layout
        .iter()
        .map(|element| {
            let offset = match element.offset {
                ElementOffset::Fixed(offset) => offset,
                ElementOffset::AppendAligned => cursor,
            };
            cursor = offset + element.format.size();
            offset
        })
        .collect()
}

/// Bytes spanned by the layout
pub fn layout_size(layout: &[InputElement]) -> u32 {
    resolve_offsets(layout)
        .iter()
        .zip(layout)
        .map(|(offset, element)| offset + element.format.size())
        .max()
        .unwrap_or(0)
}

/// Shader source file plus its entry point and target profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub path: PathBuf,
    pub entry_point: &'static str,
    pub profile: &'static str,
}

impl ShaderSource {
    pub fn light_vertex(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry_point: "LightVertexShader",
            profile: "vs_5_0",
        }
    }

    pub fn light_pixel(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry_point: "LightPixelShader",
            profile: "ps_5_0",
        }
    }

    /// Fail early if the source file is missing
    pub fn check_exists(&self) -> Result<(), RenderError> {
        if Path::new(&self.path).is_file() {
            Ok(())
        } else {
            Err(RenderError::MissingShader(self.path.clone()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    MinMagMipLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    /// Coordinates past 1.0 wrap back to 0.0
    Wrap,
}

/// Texture sampler state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDesc {
    pub filter: Filter,
    pub address: [AddressMode; 3],
    pub mip_lod_bias: f32,
    pub max_anisotropy: u32,
    pub min_lod: f32,
    pub max_lod: f32,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            filter: Filter::MinMagMipLinear,
            address: [AddressMode::Wrap; 3],
            mip_lod_bias: 0.0,
            max_anisotropy: 1,
            min_lod: 0.0,
            max_lod: f32::MAX,
        }
    }
}

/// A value with a fixed GPU byte layout
pub trait ConstantBuffer {
    const SIZE: usize;

    fn write_bytes(&self, out: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE);
        self.write_bytes(&mut out);
        debug_assert_eq!(out.len(), Self::SIZE);
        out
    }
}

fn put_floats(out: &mut Vec<u8>, values: &[f32]) {
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// World, view and projection matrices for the vertex shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixBuffer {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl ConstantBuffer for MatrixBuffer {
    const SIZE: usize = 3 * 64;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        for matrix in [&self.world, &self.view, &self.projection] {
            put_floats(out, &matrix.transpose().to_row_major());
        }
    }
}

/// Directional light parameters for the pixel shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightBuffer {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub direction: Vec3,
    /// Packed after `direction` to complete its 16-byte register
    pub specular_power: f32,
    pub specular: Vec4,
}

impl LightBuffer {
    pub fn from_light(light: &Light) -> Self {
        Self {
            ambient: light.ambient_color(),
            diffuse: light.diffuse_color(),
            direction: light.direction(),
            specular_power: light.specular_power(),
            specular: light.specular_color(),
        }
    }
}

impl ConstantBuffer for LightBuffer {
    const SIZE: usize = 64;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        put_floats(out, &self.ambient.to_array());
        put_floats(out, &self.diffuse.to_array());
        put_floats(out, &self.direction.to_array());
        put_floats(out, &[self.specular_power]);
        put_floats(out, &self.specular.to_array());
    }
}

/// Camera position for specular highlights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBuffer {
    pub position: Vec3,
}

impl ConstantBuffer for CameraBuffer {
    const SIZE: usize = 16;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        put_floats(out, &self.position.to_array());
        put_floats(out, &[0.0]); // padding
    }
}

/// Per-draw inputs to [`LightShader::render`]
#[derive(Debug, Clone, Copy)]
pub struct ShaderParams<'a> {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub light: &'a Light,
    pub camera_position: Vec3,
}

/// Directional light shader with specular highlights
pub struct LightShader {
    vertex: ShaderSource,
    pixel: ShaderSource,
    sampler: SamplerDesc,
    matrix_buffer: BufferId,
    camera_buffer: BufferId,
    light_buffer: BufferId,
}

impl LightShader {
    /// Check the shader sources and create the constant buffers
    pub fn init<B: RenderBackend>(
        backend: &mut B,
        vertex_path: &Path,
        pixel_path: &Path,
    ) -> Result<Self, RenderError> {
        let vertex = ShaderSource::light_vertex(vertex_path);
        let pixel = ShaderSource::light_pixel(pixel_path);
        vertex.check_exists()?;
        pixel.check_exists()?;

        let matrix_buffer = backend.create_buffer(&BufferDesc::constant(MatrixBuffer::SIZE), None)?;
        let camera_buffer = backend.create_buffer(&BufferDesc::constant(CameraBuffer::SIZE), None)?;
        let light_buffer = backend.create_buffer(&BufferDesc::constant(LightBuffer::SIZE), None)?;

        log::info!(
            "Light shader ready ({} / {})",
            vertex.path.display(),
            pixel.path.display()
        );

        Ok(Self {
            vertex,
            pixel,
            sampler: SamplerDesc::default(),
            matrix_buffer,
            camera_buffer,
            light_buffer,
        })
    }

    /// Upload the parameters, bind the pipeline and draw `index_count` indices
    pub fn render<B: RenderBackend>(
        &self,
        backend: &mut B,
        index_count: u32,
        texture: TextureId,
        params: &ShaderParams<'_>,
    ) -> Result<(), RenderError> {
        self.set_shader_params(backend, texture, params)?;
        self.render_shader(backend, index_count)
    }

    fn set_shader_params<B: RenderBackend>(
        &self,
        backend: &mut B,
        texture: TextureId,
        params: &ShaderParams<'_>,
    ) -> Result<(), RenderError> {
        let matrices = MatrixBuffer {
            world: params.world,
            view: params.view,
            projection: params.projection,
        };
        backend.update_buffer(self.matrix_buffer, &matrices.to_bytes())?;
        backend.set_constant_buffer(ShaderStage::Vertex, 0, self.matrix_buffer)?;

        let camera = CameraBuffer {
            position: params.camera_position,
        };
        backend.update_buffer(self.camera_buffer, &camera.to_bytes())?;
        backend.set_constant_buffer(ShaderStage::Vertex, 1, self.camera_buffer)?;

        let light = LightBuffer::from_light(params.light);
        backend.update_buffer(self.light_buffer, &light.to_bytes())?;
        backend.set_constant_buffer(ShaderStage::Pixel, 0, self.light_buffer)?;

        backend.set_texture(ShaderStage::Pixel, 0, texture)
    }

    fn render_shader<B: RenderBackend>(
        &self,
        backend: &mut B,
        index_count: u32,
    ) -> Result<(), RenderError> {
        backend.set_input_layout(&LIGHT_LAYOUT, layout_size(&LIGHT_LAYOUT))?;
        backend.set_shaders(&self.vertex, &self.pixel)?;
        backend.set_sampler(ShaderStage::Pixel, 0, &self.sampler);
        backend.draw_indexed(index_count, 0, 0)
    }

    pub fn matrix_buffer(&self) -> BufferId {
        self.matrix_buffer
    }

    pub fn camera_buffer(&self) -> BufferId {
        self.camera_buffer
    }

    pub fn light_buffer(&self) -> BufferId {
        self.light_buffer
    }
}
