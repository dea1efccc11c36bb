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

//! Render device abstraction
//!
//! [`RenderBackend`] is the seam between the sandbox and a GPU API. It covers
//! exactly the calls the scene makes: resource creation, constant buffer
//! updates, pipeline binding and indexed drawing. [`Device`] owns a backend
//! together with the swap-chain settings and the fixed world, projection and
//! orthographic matrices derived from them.
//!
//! [`HeadlessBackend`] validates and records every call without a GPU.

mod headless;

pub use headless::{FrameStats, HeadlessBackend};

use super::error::RenderError;
use super::math::Mat4;
use super::shader::{InputElement, SamplerDesc, ShaderSource};
use super::texture::Texture;
use bitflags::bitflags;
use std::f32::consts::FRAC_PI_4;

bitflags! {
    /// Pipeline stages a buffer or texture can be bound to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BindFlags: u32 {
        const VERTEX_BUFFER   = 1 << 0;
        const INDEX_BUFFER    = 1 << 1;
        const CONSTANT_BUFFER = 1 << 2;
        const SHADER_RESOURCE = 1 << 3;
        const RENDER_TARGET   = 1 << 4;
    }
}

bitflags! {
    /// CPU access to a resource after creation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CpuAccess: u32 {
        const WRITE = 1 << 0;
        const READ  = 1 << 1;
    }
}

/// Expected update frequency of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// Written once at creation
    Default,
    /// Rewritten every frame by the CPU
    Dynamic,
}

/// Buffer creation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc {
    pub size: usize,
    pub usage: Usage,
    pub bind: BindFlags,
    pub cpu_access: CpuAccess,
}

impl BufferDesc {
    pub fn vertex(size: usize) -> Self {
        Self {
            size,
            usage: Usage::Default,
            bind: BindFlags::VERTEX_BUFFER,
            cpu_access: CpuAccess::empty(),
        }
    }

    pub fn index(size: usize) -> Self {
        Self {
            size,
            usage: Usage::Default,
            bind: BindFlags::INDEX_BUFFER,
            cpu_access: CpuAccess::empty(),
        }
    }

    /// Dynamic, CPU-writable constant buffer
    pub fn constant(size: usize) -> Self {
        Self {
            size,
            usage: Usage::Dynamic,
            bind: BindFlags::CONSTANT_BUFFER,
            cpu_access: CpuAccess::WRITE,
        }
    }
}

/// Handle to a backend buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// Handle to a backend texture view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Programmable stage a resource is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    TriangleList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    U32,
}

impl IndexFormat {
    pub fn size(self) -> usize {
        match self {
            IndexFormat::U32 => 4,
        }
    }
}

/// Calls the sandbox makes into a graphics API
pub trait RenderBackend {
    /// Create a buffer, optionally filled with `initial` data
    fn create_buffer(&mut self, desc: &BufferDesc, initial: Option<&[u8]>)
        -> Result<BufferId, RenderError>;

    /// Replace the contents of a CPU-writable buffer
    fn update_buffer(&mut self, id: BufferId, bytes: &[u8]) -> Result<(), RenderError>;

    /// Upload a texture along with its mip chain
    fn create_texture(&mut self, texture: &Texture) -> Result<TextureId, RenderError>;

    fn set_vertex_buffer(&mut self, id: BufferId, stride: u32) -> Result<(), RenderError>;

    fn set_index_buffer(&mut self, id: BufferId, format: IndexFormat) -> Result<(), RenderError>;

    fn set_topology(&mut self, topology: Topology);

    fn set_input_layout(&mut self, layout: &[InputElement], stride: u32) -> Result<(), RenderError>;

    fn set_shaders(
        &mut self,
        vertex: &ShaderSource,
        pixel: &ShaderSource,
    ) -> Result<(), RenderError>;

    fn set_constant_buffer(
        &mut self,
        stage: ShaderStage,
        slot: u32,
        id: BufferId,
    ) -> Result<(), RenderError>;

    fn set_texture(&mut self, stage: ShaderStage, slot: u32, id: TextureId)
        -> Result<(), RenderError>;

    fn set_sampler(&mut self, stage: ShaderStage, slot: u32, sampler: &SamplerDesc);

    /// Clear the back buffer and depth buffer
    fn begin_scene(&mut self, color: [f32; 4]) -> Result<(), RenderError>;

    fn draw_indexed(&mut self, count: u32, start: u32, base_vertex: i32) -> Result<(), RenderError>;

    /// Present the back buffer
    fn end_scene(&mut self, vsync: bool) -> Result<(), RenderError>;
}

/// Swap-chain and projection settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceSettings {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub fullscreen: bool,
    pub screen_depth: f32,
    pub screen_near: f32,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            vsync: true,
            fullscreen: false,
            screen_depth: 1000.0,
            screen_near: 0.1,
        }
    }
}

/// A backend plus the matrices derived from the screen settings
pub struct Device<B: RenderBackend> {
    backend: B,
    settings: DeviceSettings,
    world: Mat4,
    projection: Mat4,
    ortho: Mat4,
}

impl<B: RenderBackend> Device<B> {
    /// Field of view used for the perspective projection
    pub const FIELD_OF_VIEW: f32 = FRAC_PI_4;

    pub fn new(backend: B, settings: DeviceSettings) -> Result<Self, RenderError> {
        if settings.width == 0 || settings.height == 0 {
            return Err(RenderError::InvalidViewport {
                width: settings.width,
                height: settings.height,
            });
        }

        let width = settings.width as f32;
        let height = settings.height as f32;
        let projection = Mat4::perspective_fov_lh(
            Self::FIELD_OF_VIEW,
            width / height,
            settings.screen_near,
            settings.screen_depth,
        );
        let ortho =
            Mat4::orthographic_lh(width, height, settings.screen_near, settings.screen_depth);

        let mode = if settings.fullscreen {
            "fullscreen"
        } else {
            "windowed"
        };
        log::info!(
            "Device initialized: {}x{} ({}, vsync {})",
            settings.width,
            settings.height,
            mode,
            if settings.vsync { "on" } else { "off" }
        );

        Ok(Self {
            backend,
            settings,
            world: Mat4::IDENTITY,
            projection,
            ortho,
        })
    }

    pub fn begin_scene(&mut self, color: [f32; 4]) -> Result<(), RenderError> {
        self.backend.begin_scene(color)
    }

    pub fn end_scene(&mut self) -> Result<(), RenderError> {
        self.backend.end_scene(self.settings.vsync)
    }

    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn ortho_matrix(&self) -> Mat4 {
        self.ortho
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
