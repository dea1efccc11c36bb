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

//! Directional light

use super::math::{Vec3, Vec4};

/// Directional light with ambient and specular terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    direction: Vec3,
    diffuse: Vec4,
    ambient: Vec4,
    specular: Vec4,
    specular_power: f32,
}

impl Default for Light {
    /// Everything zeroed, i.e. a light that contributes nothing
    fn default() -> Self {
        Self {
            direction: Vec3::ZERO,
            diffuse: Vec4::default(),
            ambient: Vec4::default(),
            specular: Vec4::default(),
            specular_power: 0.0,
        }
    }
}

impl Light {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_direction(&mut self, x: f32, y: f32, z: f32) {
        self.direction = Vec3::new(x, y, z);
    }

    pub fn set_diffuse_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.diffuse = Vec4::new(r, g, b, a);
    }

    pub fn set_ambient_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.ambient = Vec4::new(r, g, b, a);
    }

    pub fn set_specular_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.specular = Vec4::new(r, g, b, a);
    }

    pub fn set_specular_power(&mut self, power: f32) {
        self.specular_power = power;
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn diffuse_color(&self) -> Vec4 {
        self.diffuse
    }

    pub fn ambient_color(&self) -> Vec4 {
        self.ambient
    }

    pub fn specular_color(&self) -> Vec4 {
        self.specular
    }

    pub fn specular_power(&self) -> f32 {
        self.specular_power
    }
}
