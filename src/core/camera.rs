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

//! Free camera
//!
//! The camera stores a position and a rotation in degrees (pitch, yaw, roll
//! around X, Y and Z). [`Camera::render`] rebuilds the view matrix from them;
//! it has to be called before [`Camera::view_matrix`] is read for a frame.

use super::math::{Mat4, Vec3, DEG_TO_RAD};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    rotation: Vec3,
    view: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            view: Mat4::IDENTITY,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
    }

    /// Set the rotation in degrees
    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Vec3::new(x, y, z);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Rebuild the view matrix from the current position and rotation
    pub fn render(&mut self) {
        let pitch = self.rotation.x * DEG_TO_RAD;
        let yaw = self.rotation.y * DEG_TO_RAD;
        let roll = self.rotation.z * DEG_TO_RAD;
        let rotation = Mat4::rotation_roll_pitch_yaw(pitch, yaw, roll);

        let look_at = Vec3::new(0.0, 0.0, 1.0).transform_coord(&rotation);
        let up = Vec3::new(0.0, 1.0, 0.0).transform_coord(&rotation);

        self.view = Mat4::look_at_lh(self.position, self.position + look_at, up);
    }

    /// View matrix from the last [`Camera::render`]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }
}
