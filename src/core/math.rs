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

//! Row-major vector and matrix math
//!
//! Matrices follow the row-vector convention: a point is transformed as
//! `v * M`, translation lives in the fourth row and `A * B` applies `A` first.
//! The handedness and projection conventions are left-handed with a `[0, 1]`
//! depth range, matching what the shaders expect.
//!
//! Shaders read constant buffers column-major, so every matrix is transposed
//! before upload (see [`crate::core::shader::MatrixBuffer`]).

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Degrees to radians, as used by the camera
pub const DEG_TO_RAD: f32 = 0.017_453_292_5;

/// 3-component vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn from_array(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy, or zero for a zero vector
    pub fn normalize(self) -> Vec3 {
        let length = self.length();
        if length > 0.0 {
            Vec3::new(self.x / length, self.y / length, self.z / length)
        } else {
            Vec3::ZERO
        }
    }

    /// Transform as a point (`w = 1`) and divide by the resulting `w`
    pub fn transform_coord(self, m: &Mat4) -> Vec3 {
        let v = Vec4::new(self.x, self.y, self.z, 1.0) * m;
        if v.w != 0.0 {
            Vec3::new(v.x / v.w, v.y / v.w, v.z / v.w)
        } else {
            Vec3::new(v.x, v.y, v.z)
        }
    }

    pub fn approx_eq(self, other: Vec3, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// 4-component vector, also used for RGBA colors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub fn from_array(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Mul<&Mat4> for Vec4 {
    type Output = Vec4;

    fn mul(self, m: &Mat4) -> Vec4 {
        let v = self.to_array();
        let mut out = [0.0f32; 4];
        for (col, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|row| v[row] * m.rows[row][col]).sum();
        }
        Vec4::from_array(out)
    }
}

/// 4x4 row-major matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub rows: [[f32; 4]; 4],
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    #[inline]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    pub fn transpose(&self) -> Mat4 {
        let mut rows = [[0.0f32; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.rows[c][r];
            }
        }
        Mat4 { rows }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        m.rows[3] = [x, y, z, 1.0];
        m
    }

    pub fn rotation_x(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation applying roll (Z), then pitch (X), then yaw (Y), in radians
    pub fn rotation_roll_pitch_yaw(pitch: f32, yaw: f32, roll: f32) -> Mat4 {
        Mat4::rotation_z(roll) * Mat4::rotation_x(pitch) * Mat4::rotation_y(yaw)
    }

    /// Left-handed view matrix looking from `eye` towards `focus`
    pub fn look_at_lh(eye: Vec3, focus: Vec3, up: Vec3) -> Mat4 {
        let z_axis = (focus - eye).normalize();
        let x_axis = up.cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis);

        Mat4::from_rows([
            [x_axis.x, y_axis.x, z_axis.x, 0.0],
            [x_axis.y, y_axis.y, z_axis.y, 0.0],
            [x_axis.z, y_axis.z, z_axis.z, 0.0],
            [-x_axis.dot(eye), -y_axis.dot(eye), -z_axis.dot(eye), 1.0],
        ])
    }

    /// Left-handed perspective projection from a vertical field of view
    pub fn perspective_fov_lh(fov_y: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
        let height = 1.0 / (fov_y * 0.5).tan();
        let width = height / aspect;
        let range = z_far / (z_far - z_near);

        Mat4::from_rows([
            [width, 0.0, 0.0, 0.0],
            [0.0, height, 0.0, 0.0],
            [0.0, 0.0, range, 1.0],
            [0.0, 0.0, -range * z_near, 0.0],
        ])
    }

    /// Left-handed orthographic projection centred on the origin
    pub fn orthographic_lh(width: f32, height: f32, z_near: f32, z_far: f32) -> Mat4 {
        let range = 1.0 / (z_far - z_near);

        Mat4::from_rows([
            [2.0 / width, 0.0, 0.0, 0.0],
            [0.0, 2.0 / height, 0.0, 0.0],
            [0.0, 0.0, range, 0.0],
            [0.0, 0.0, -range * z_near, 1.0],
        ])
    }

    /// Row-major values, row by row
    pub fn to_row_major(&self) -> [f32; 16] {
        let mut out = [0.0f32; 16];
        for (r, row) in self.rows.iter().enumerate() {
            out[r * 4..r * 4 + 4].copy_from_slice(row);
        }
        out
    }

    pub fn approx_eq(&self, other: &Mat4, epsilon: f32) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, other: Mat4) -> Mat4 {
        let mut rows = [[0.0f32; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.rows[r][k] * other.rows[k][c]).sum();
            }
        }
        Mat4 { rows }
    }
}
