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

//! Headless render backend
//!
//! Keeps every resource in memory and validates calls the way a debug
//! runtime would: uploads must match the declared buffer size, buffers must
//! carry the bind flag for the slot they are bound to, and draws must happen
//! inside a scene against a large enough index buffer.

use super::{
    BindFlags, BufferDesc, BufferId, CpuAccess, IndexFormat, RenderBackend, ShaderStage,
    TextureId, Topology,
};
use crate::core::error::RenderError;
use crate::core::shader::{InputElement, SamplerDesc, ShaderSource};
use crate::core::texture::Texture;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Counters accumulated across frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub frames_presented: u64,
    pub draw_calls: u64,
    pub indices_drawn: u64,
    pub buffer_updates: u64,
}

struct BufferRecord {
    desc: BufferDesc,
    data: Vec<u8>,
}

struct TextureRecord {
    width: u32,
    height: u32,
    mip_levels: usize,
}

#[derive(Default)]
struct PipelineState {
    vertex_buffer: Option<(BufferId, u32)>,
    index_buffer: Option<(BufferId, IndexFormat)>,
    topology: Option<Topology>,
    layout_stride: Option<u32>,
    shaders: Option<(PathBuf, PathBuf)>,
    constant_buffers: BTreeMap<(ShaderStage, u32), BufferId>,
    textures: BTreeMap<(ShaderStage, u32), TextureId>,
    samplers: BTreeMap<(ShaderStage, u32), SamplerDesc>,
}

/// In-memory backend for headless runs and tests
#[derive(Default)]
pub struct HeadlessBackend {
    buffers: Vec<BufferRecord>,
    textures: Vec<TextureRecord>,
    pipeline: PipelineState,
    in_scene: bool,
    clear_color: Option<[f32; 4]>,
    stats: FrameStats,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Current contents of a buffer
    pub fn buffer_data(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(id.0 as usize).map(|b| b.data.as_slice())
    }

    pub fn buffer_desc(&self, id: BufferId) -> Option<&BufferDesc> {
        self.buffers.get(id.0 as usize).map(|b| &b.desc)
    }

    /// Dimensions and mip level count of a texture
    pub fn texture_info(&self, id: TextureId) -> Option<(u32, u32, usize)> {
        self.textures
            .get(id.0 as usize)
            .map(|t| (t.width, t.height, t.mip_levels))
    }

    /// Buffer bound to a constant buffer slot
    pub fn constant_buffer(&self, stage: ShaderStage, slot: u32) -> Option<BufferId> {
        self.pipeline.constant_buffers.get(&(stage, slot)).copied()
    }

    pub fn bound_texture(&self, stage: ShaderStage, slot: u32) -> Option<TextureId> {
        self.pipeline.textures.get(&(stage, slot)).copied()
    }

    pub fn bound_sampler(&self, stage: ShaderStage, slot: u32) -> Option<&SamplerDesc> {
        self.pipeline.samplers.get(&(stage, slot))
    }

    pub fn topology(&self) -> Option<Topology> {
        self.pipeline.topology
    }

    /// Last clear color passed to `begin_scene`
    pub fn clear_color(&self) -> Option<[f32; 4]> {
        self.clear_color
    }

    pub fn in_scene(&self) -> bool {
        self.in_scene
    }

    fn buffer(&self, id: BufferId) -> Result<&BufferRecord, RenderError> {
        self.buffers
            .get(id.0 as usize)
            .ok_or(RenderError::UnknownBuffer(id.0))
    }

    fn require_bind(
        &self,
        id: BufferId,
        flag: BindFlags,
        usage: &'static str,
    ) -> Result<(), RenderError> {
        if self.buffer(id)?.desc.bind.contains(flag) {
            Ok(())
        } else {
            Err(RenderError::InvalidBinding { id: id.0, usage })
        }
    }

    fn next_id(len: usize) -> Result<u32, RenderError> {
        u32::try_from(len).map_err(|_| RenderError::Backend("resource limit reached".into()))
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_buffer(
        &mut self,
        desc: &BufferDesc,
        initial: Option<&[u8]>,
    ) -> Result<BufferId, RenderError> {
        let id = Self::next_id(self.buffers.len())?;

        let data = match initial {
            Some(bytes) if bytes.len() != desc.size => {
                return Err(RenderError::SizeMismatch {
                    id,
                    expected: desc.size,
                    got: bytes.len(),
                });
            }
            Some(bytes) => bytes.to_vec(),
            None => vec![0; desc.size],
        };

        log::debug!(
            "Created buffer {} ({} bytes, {:?})",
            id,
            desc.size,
            desc.bind
        );
        self.buffers.push(BufferRecord { desc: *desc, data });
        Ok(BufferId(id))
    }

    fn update_buffer(&mut self, id: BufferId, bytes: &[u8]) -> Result<(), RenderError> {
        let record = self
            .buffers
            .get_mut(id.0 as usize)
            .ok_or(RenderError::UnknownBuffer(id.0))?;

        if !record.desc.cpu_access.contains(CpuAccess::WRITE) {
            return Err(RenderError::InvalidBinding {
                id: id.0,
                usage: "CPU write",
            });
        }
        if bytes.len() != record.desc.size {
            return Err(RenderError::SizeMismatch {
                id: id.0,
                expected: record.desc.size,
                got: bytes.len(),
            });
        }

        record.data.copy_from_slice(bytes);
        self.stats.buffer_updates += 1;
        Ok(())
    }

    fn create_texture(&mut self, texture: &Texture) -> Result<TextureId, RenderError> {
        let id = Self::next_id(self.textures.len())?;
        let mips = texture.generate_mips();

        log::debug!(
            "Created texture {} ({}x{}, {} mip levels)",
            id,
            texture.width(),
            texture.height(),
            mips.len()
        );
        self.textures.push(TextureRecord {
            width: texture.width(),
            height: texture.height(),
            mip_levels: mips.len(),
        });
        Ok(TextureId(id))
    }

    fn set_vertex_buffer(&mut self, id: BufferId, stride: u32) -> Result<(), RenderError> {
        self.require_bind(id, BindFlags::VERTEX_BUFFER, "vertex buffer")?;
        self.pipeline.vertex_buffer = Some((id, stride));
        Ok(())
    }

    fn set_index_buffer(&mut self, id: BufferId, format: IndexFormat) -> Result<(), RenderError> {
        self.require_bind(id, BindFlags::INDEX_BUFFER, "index buffer")?;
        self.pipeline.index_buffer = Some((id, format));
        Ok(())
    }

    fn set_topology(&mut self, topology: Topology) {
        self.pipeline.topology = Some(topology);
    }

    fn set_input_layout(
        &mut self,
        layout: &[InputElement],
        stride: u32,
    ) -> Result<(), RenderError> {
        let covered = crate::core::shader::layout_size(layout);
        if covered != stride {
            return Err(RenderError::LayoutMismatch {
                layout: covered,
                stride,
            });
        }
        self.pipeline.layout_stride = Some(stride);
        Ok(())
    }

    fn set_shaders(
        &mut self,
        vertex: &ShaderSource,
        pixel: &ShaderSource,
    ) -> Result<(), RenderError> {
        self.pipeline.shaders = Some((vertex.path.clone(), pixel.path.clone()));
        Ok(())
    }

    fn set_constant_buffer(
        &mut self,
        stage: ShaderStage,
        slot: u32,
        id: BufferId,
    ) -> Result<(), RenderError> {
        self.require_bind(id, BindFlags::CONSTANT_BUFFER, "constant buffer")?;
        self.pipeline.constant_buffers.insert((stage, slot), id);
        Ok(())
    }

    fn set_texture(
        &mut self,
        stage: ShaderStage,
        slot: u32,
        id: TextureId,
    ) -> Result<(), RenderError> {
        if id.0 as usize >= self.textures.len() {
            return Err(RenderError::UnknownTexture(id.0));
        }
        self.pipeline.textures.insert((stage, slot), id);
        Ok(())
    }

    fn set_sampler(&mut self, stage: ShaderStage, slot: u32, sampler: &SamplerDesc) {
        self.pipeline.samplers.insert((stage, slot), *sampler);
    }

    fn begin_scene(&mut self, color: [f32; 4]) -> Result<(), RenderError> {
        if self.in_scene {
            return Err(RenderError::Backend("begin_scene called twice".to_string()));
        }
        self.in_scene = true;
        self.clear_color = Some(color);
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        count: u32,
        start: u32,
        base_vertex: i32,
    ) -> Result<(), RenderError> {
        if !self.in_scene {
            return Err(RenderError::NotInScene);
        }

        let available = match self.pipeline.index_buffer {
            Some((id, format)) => (self.buffer(id)?.desc.size / format.size()) as u32,
            None => 0,
        };
        if start.saturating_add(count) > available {
            return Err(RenderError::IndexOverrun { count, available });
        }
        if self.pipeline.vertex_buffer.is_none() || self.pipeline.shaders.is_none() {
            return Err(RenderError::Backend("draw with incomplete pipeline".into()));
        }

        log::trace!(
            "draw_indexed(count={}, start={}, base={})",
            count,
            start,
            base_vertex
        );
        self.stats.draw_calls += 1;
        self.stats.indices_drawn += count as u64;
        Ok(())
    }

    fn end_scene(&mut self, vsync: bool) -> Result<(), RenderError> {
        if !self.in_scene {
            return Err(RenderError::NotInScene);
        }
        self.in_scene = false;
        self.stats.frames_presented += 1;
        log::trace!(
            "Presented frame {} (vsync {})",
            self.stats.frames_presented,
            vsync
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_buffer_with_data() {
        let mut backend = HeadlessBackend::new();
        let id = backend
            .create_buffer(&BufferDesc::vertex(4), Some(&[1u8, 2, 3, 4][..]))
            .unwrap();
        assert_eq!(backend.buffer_data(id), Some(&[1u8, 2, 3, 4][..]));
        assert_eq!(backend.buffer_count(), 1);
    }

    #[test]
    fn test_create_buffer_size_mismatch() {
        let mut backend = HeadlessBackend::new();
        let err = backend
            .create_buffer(&BufferDesc::vertex(8), Some(&[0u8; 4][..]))
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::SizeMismatch {
                id: 0,
                expected: 8,
                got: 4
            }
        );
    }

    #[test]
    fn test_update_requires_cpu_write() {
        let mut backend = HeadlessBackend::new();
        let vb = backend.create_buffer(&BufferDesc::vertex(4), None).unwrap();
        assert!(matches!(
            backend.update_buffer(vb, &[0; 4]),
            Err(RenderError::InvalidBinding { .. })
        ));

        let cb = backend
            .create_buffer(&BufferDesc::constant(16), None)
            .unwrap();
        backend.update_buffer(cb, &[7; 16]).unwrap();
        assert_eq!(backend.buffer_data(cb).unwrap()[0], 7);
        assert_eq!(backend.stats().buffer_updates, 1);

        assert!(matches!(
            backend.update_buffer(cb, &[0; 12]),
            Err(RenderError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_bind_checks_flags() {
        let mut backend = HeadlessBackend::new();
        let vb = backend.create_buffer(&BufferDesc::vertex(4), None).unwrap();
        assert!(backend
            .set_constant_buffer(ShaderStage::Vertex, 0, vb)
            .is_err());
        assert!(backend.set_index_buffer(vb, IndexFormat::U32).is_err());
        assert!(backend.set_vertex_buffer(vb, 4).is_ok());
        assert!(matches!(
            backend.set_vertex_buffer(BufferId(42), 4),
            Err(RenderError::UnknownBuffer(42))
        ));
    }

    #[test]
    fn test_draw_outside_scene() {
        let mut backend = HeadlessBackend::new();
        assert_eq!(backend.draw_indexed(3, 0, 0), Err(RenderError::NotInScene));
        assert_eq!(backend.end_scene(false), Err(RenderError::NotInScene));
    }

    #[test]
    fn test_draw_index_overrun() {
        let mut backend = HeadlessBackend::new();
        let ib = backend.create_buffer(&BufferDesc::index(12), None).unwrap();
        backend.set_index_buffer(ib, IndexFormat::U32).unwrap();
        backend.begin_scene([0.0; 4]).unwrap();

        assert_eq!(
            backend.draw_indexed(6, 0, 0),
            Err(RenderError::IndexOverrun {
                count: 6,
                available: 3
            })
        );
    }

    #[test]
    fn test_scene_counts_frames() {
        let mut backend = HeadlessBackend::new();
        backend.begin_scene([0.1, 0.2, 0.3, 1.0]).unwrap();
        assert!(backend.in_scene());
        assert!(backend.begin_scene([0.0; 4]).is_err());
        backend.end_scene(true).unwrap();

        assert_eq!(backend.stats().frames_presented, 1);
        assert_eq!(backend.clear_color(), Some([0.1, 0.2, 0.3, 1.0]));
    }

    #[test]
    fn test_texture_records_mips() {
        let mut backend = HeadlessBackend::new();
        let texture = Texture::from_rgba(4, 4, vec![0; 64]).unwrap();
        let id = backend.create_texture(&texture).unwrap();
        assert_eq!(backend.texture_info(id), Some((4, 4, 3)));
        assert!(backend.set_texture(ShaderStage::Pixel, 0, id).is_ok());
        assert!(backend
            .set_texture(ShaderStage::Pixel, 0, TextureId(5))
            .is_err());
    }
}
