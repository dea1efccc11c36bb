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

//! Custom assertions for sandbox testing

use dxsandbox::core::math::Mat4;
use dxsandbox::core::model::ModelRow;

const EPSILON: f32 = 1e-5;

/// Assert every component of a model row is within tolerance
#[allow(dead_code)]
pub fn assert_row(row: &ModelRow, expected: [f32; 8]) {
    let actual = row.values();
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() < EPSILON,
            "Row value {} mismatch: expected {}, got {} (row {:?})",
            i,
            e,
            a,
            actual
        );
    }
}

/// Assert two matrices agree within tolerance
#[allow(dead_code)]
pub fn assert_matrix(actual: &Mat4, expected: &Mat4) {
    assert!(
        actual.approx_eq(expected, EPSILON),
        "Matrix mismatch:\nexpected {:?}\ngot      {:?}",
        expected,
        actual
    );
}

/// Decode a little-endian f32 at `index` from a packed buffer
#[allow(dead_code)]
pub fn f32_at(bytes: &[u8], index: usize) -> f32 {
    let start = index * 4;
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[start..start + 4]);
    f32::from_le_bytes(raw)
}
