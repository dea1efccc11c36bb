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

//! Direct3D-style rendering sandbox and OBJ model converter
//!
//! This library converts Wavefront OBJ meshes into a flat per-vertex model
//! format and renders such models with a directional specular light through
//! a pluggable render backend.
//!
//! # Example
//!
//! ```
//! use dxsandbox::core::convert::convert_str;
//!
//! let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 -1\nf 1/1/1 2/1/1 3/1/1\n";
//! let (model, report) = convert_str(obj).unwrap();
//!
//! assert_eq!(model.vertex_count(), 3);
//! assert_eq!(report.faces, 1);
//! ```

pub mod core;
