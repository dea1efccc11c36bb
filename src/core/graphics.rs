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

//! Scene graphics
//!
//! Owns the device, camera, model, light shader and light, and draws one
//! rotating model per frame.

use super::camera::Camera;
use super::config::SandboxConfig;
use super::device::{Device, RenderBackend};
use super::error::Result;
use super::light::Light;
use super::math::Mat4;
use super::mesh::Model;
use super::shader::{LightShader, ShaderParams};
use std::f32::consts::PI;

/// Rotation added per frame, in radians
pub const ROTATION_STEP: f32 = PI * 0.002;

/// Rotation is reset once it passes this value
pub const ROTATION_LIMIT: f32 = 360.0;

pub struct Graphics<B: RenderBackend> {
    device: Device<B>,
    camera: Camera,
    model: Model,
    shader: LightShader,
    light: Light,
    clear_color: [f32; 4],
    rotation: f32,
}

impl<B: RenderBackend> Graphics<B> {
    /// Create the device and load every scene resource named by `config`
    pub fn init(config: &SandboxConfig, backend: B) -> Result<Self> {
        let mut device = Device::new(backend, config.device_settings())?;

        let mut camera = Camera::new();
        let [px, py, pz] = config.scene.camera_position;
        let [rx, ry, rz] = config.scene.camera_rotation;
        camera.set_position(px, py, pz);
        camera.set_rotation(rx, ry, rz);

        let assets = &config.assets;
        let model = Model::init(device.backend_mut(), &assets.model, &assets.texture)?;
        let shader = LightShader::init(
            device.backend_mut(),
            &assets.vertex_shader,
            &assets.pixel_shader,
        )?;

        log::info!(
            "Graphics initialized: {}x{}, {} indices",
            config.screen.width,
            config.screen.height,
            model.index_count()
        );

        Ok(Self {
            device,
            camera,
            model,
            shader,
            light: config.light.to_light(),
            clear_color: config.scene.clear_color,
            rotation: 0.0,
        })
    }

    /// Advance the rotation and render
    pub fn frame(&mut self) -> Result<()> {
        self.rotation += ROTATION_STEP;
        if self.rotation > ROTATION_LIMIT {
            self.rotation = 0.0;
        }
        self.render(self.rotation)
    }

    /// Draw the model rotated by `rotation` radians around Y then X
    pub fn render(&mut self, rotation: f32) -> Result<()> {
        self.device.begin_scene(self.clear_color)?;

        self.camera.render();

        let world = self.device.world_matrix()
            * Mat4::rotation_y(rotation)
            * Mat4::rotation_x(rotation);
        let params = ShaderParams {
            world,
            view: self.camera.view_matrix(),
            projection: self.device.projection_matrix(),
            light: &self.light,
            camera_position: self.camera.position(),
        };

        let backend = self.device.backend_mut();
        self.model.render(backend)?;
        self.shader.render(
            backend,
            self.model.index_count(),
            self.model.texture(),
            &params,
        )?;

        self.device.end_scene()?;
        Ok(())
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn shader(&self) -> &LightShader {
        &self.shader
    }

    pub fn device(&self) -> &Device<B> {
        &self.device
    }

    pub fn backend(&self) -> &B {
        self.device.backend()
    }

    pub fn into_backend(self) -> B {
        self.device.into_backend()
    }
}
