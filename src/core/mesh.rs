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

//! Renderable meshes
//!
//! A [`Mesh`] is the CPU-side vertex and index data built from a
//! [`ModelFile`]. A [`Model`] is a mesh uploaded to a backend together with
//! its texture.

use super::device::{BufferDesc, BufferId, IndexFormat, RenderBackend, TextureId, Topology};
use super::error::{ModelError, RenderError, Result};
use super::model::ModelFile;
use super::texture::Texture;
use std::path::Path;

/// GPU vertex: position, texture coordinate, normal
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: [f32; 3],
    pub texture: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Size of one vertex in the vertex buffer
    pub const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;

    /// Append the little-endian bytes of this vertex
    pub fn write_bytes(&self, out: &mut Vec<u8>) {
        for value in self
            .position
            .iter()
            .chain(self.texture.iter())
            .chain(self.normal.iter())
        {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Triangle list with one index per vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    pub fn from_model(model: &ModelFile) -> Result<Self, ModelError> {
        let count = u32::try_from(model.vertex_count())
            .map_err(|_| ModelError::TooManyVertices(model.vertex_count()))?;

        let vertices = model
            .rows
            .iter()
            .map(|row| Vertex {
                position: row.position,
                texture: row.texel,
                normal: row.normal,
            })
            .collect();

        Ok(Self {
            vertices,
            indices: (0..count).collect(),
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.vertices.len() * Vertex::STRIDE as usize);
        for vertex in &self.vertices {
            vertex.write_bytes(&mut out);
        }
        out
    }

    pub fn index_bytes(&self) -> Vec<u8> {
        self.indices.iter().flat_map(|i| i.to_le_bytes()).collect()
    }
}

/// A mesh and texture resident on a backend
#[derive(Debug)]
pub struct Model {
    mesh: Mesh,
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    texture: TextureId,
}

impl Model {
    /// Load the texture and model files and upload them
    pub fn init<B: RenderBackend>(
        backend: &mut B,
        model_path: &Path,
        texture_path: &Path,
    ) -> Result<Self> {
        let texture = Texture::load(texture_path)?;
        let model = ModelFile::load(model_path)?;
        let mesh = Mesh::from_model(&model)?;

        let uploaded = Self::upload(backend, mesh, &texture)?;
        log::info!(
            "Model buffers initialized ({} vertices)",
            uploaded.index_count()
        );
        Ok(uploaded)
    }

    /// Upload an already built mesh and texture
    pub fn upload<B: RenderBackend>(
        backend: &mut B,
        mesh: Mesh,
        texture: &Texture,
    ) -> Result<Self, RenderError> {
        let vertex_bytes = mesh.vertex_bytes();
        let index_bytes = mesh.index_bytes();

        let texture = backend.create_texture(texture)?;
        let vertex_buffer = backend.create_buffer(
            &BufferDesc::vertex(vertex_bytes.len()),
            Some(vertex_bytes.as_slice()),
        )?;
        let index_buffer = backend.create_buffer(
            &BufferDesc::index(index_bytes.len()),
            Some(index_bytes.as_slice()),
        )?;

        Ok(Self {
            mesh,
            vertex_buffer,
            index_buffer,
            texture,
        })
    }

    /// Bind the vertex and index buffers as a triangle list
    pub fn render<B: RenderBackend>(&self, backend: &mut B) -> Result<(), RenderError> {
        backend.set_vertex_buffer(self.vertex_buffer, Vertex::STRIDE)?;
        backend.set_index_buffer(self.index_buffer, IndexFormat::U32)?;
        backend.set_topology(Topology::TriangleList);
        Ok(())
    }

    pub fn index_count(&self) -> u32 {
        self.mesh.index_count()
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    pub fn index_buffer(&self) -> BufferId {
        self.index_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::device::HeadlessBackend;
    use crate::core::model::ModelRow;

    fn triangle() -> ModelFile {
        ModelFile::new(vec![
            ModelRow {
                position: [0.0, 0.0, 0.0],
                texel: [0.0, 1.0],
                normal: [0.0, 0.0, -1.0],
            },
            ModelRow {
                position: [0.0, 1.0, 0.0],
                texel: [0.0, 0.0],
                normal: [0.0, 0.0, -1.0],
            },
            ModelRow {
                position: [1.0, 1.0, 0.0],
                texel: [1.0, 0.0],
                normal: [0.0, 0.0, -1.0],
            },
        ])
    }

    #[test]
    fn test_vertex_stride() {
        assert_eq!(Vertex::STRIDE, 32);
        let mut out = Vec::new();
        Vertex::default().write_bytes(&mut out);
        assert_eq!(out.len(), 32);
    }

    #[test]
    fn test_mesh_sequential_indices() {
        let mesh = Mesh::from_model(&triangle()).unwrap();
        assert_eq!(mesh.indices(), &[0, 1, 2]);
        assert_eq!(mesh.index_count(), mesh.vertex_count());
        assert_eq!(mesh.vertices()[2].texture, [1.0, 0.0]);
    }

    #[test]
    fn test_mesh_bytes() {
        let mesh = Mesh::from_model(&triangle()).unwrap();
        let bytes = mesh.vertex_bytes();
        assert_eq!(bytes.len(), 3 * 32);
        // Second vertex, position.y
        assert_eq!(&bytes[36..40], &1.0f32.to_le_bytes());
        assert_eq!(mesh.index_bytes(), vec![0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0]);
    }

    #[test]
    fn test_upload_and_bind() {
        let mut backend = HeadlessBackend::new();
        let texture = Texture::from_rgba(2, 2, vec![255; 16]).unwrap();
        let mesh = Mesh::from_model(&triangle()).unwrap();

        let model = Model::upload(&mut backend, mesh, &texture).unwrap();
        assert_eq!(backend.buffer_count(), 2);
        assert_eq!(backend.texture_count(), 1);
        assert_eq!(backend.buffer_data(model.index_buffer()).unwrap().len(), 12);

        model.render(&mut backend).unwrap();
        assert_eq!(backend.topology(), Some(Topology::TriangleList));
    }
}
