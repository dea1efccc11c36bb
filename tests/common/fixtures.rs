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

//! Test fixtures for common test scenarios

use dxsandbox::core::config::SandboxConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Unit quad in the XY plane, two triangles, one shared normal
#[allow(dead_code)]
pub const QUAD_OBJ: &str = "\
# quad exported for tests
o Quad
v -1.0 -1.0 0.0
v -1.0 1.0 0.0
v 1.0 1.0 0.0
v 1.0 -1.0 0.0
vt 0.0 0.0
vt 0.0 1.0
vt 1.0 1.0
vt 1.0 0.0
vn 0.0 0.0 -1.0
s off
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

/// Four-corner face, rejected by the triangle-only parser
#[allow(dead_code)]
pub const QUAD_FACE_OBJ: &str = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 1/1/1 1/1/1 1/1/1\n";

/// Face using the invalid index 0
#[allow(dead_code)]
pub const ZERO_INDEX_OBJ: &str = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 0/1/1 1/1/1 1/1/1\n";

/// Face pointing at a position past the end of the file
#[allow(dead_code)]
pub const OUT_OF_RANGE_OBJ: &str = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 1/1/1\n";

/// Build an uncompressed 32-bit TGA image
///
/// `pixels` are BGRA in file order.
#[allow(dead_code)]
pub fn targa(width: u16, height: u16, descriptor: u8, pixels: &[[u8; 4]]) -> Vec<u8> {
    let mut bytes = vec![0u8; 18];
    bytes[2] = 2;
    bytes[12..14].copy_from_slice(&width.to_le_bytes());
    bytes[14..16].copy_from_slice(&height.to_le_bytes());
    bytes[16] = 32;
    bytes[17] = descriptor;
    for pixel in pixels {
        bytes.extend_from_slice(pixel);
    }
    bytes
}

/// 2x2 bottom-up checker texture
#[allow(dead_code)]
pub fn checker_targa() -> Vec<u8> {
    targa(
        2,
        2,
        0,
        &[
            [0, 0, 255, 255],
            [255, 255, 255, 255],
            [255, 255, 255, 255],
            [0, 0, 255, 255],
        ],
    )
}

/// Write `contents` to `name` inside `dir` and return the path
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, contents).expect("Failed to write fixture");
    path
}

/// Temporary directory holding a complete scene
#[allow(dead_code)]
pub struct SceneDir {
    pub dir: TempDir,
    pub config_path: PathBuf,
}

#[allow(dead_code)]
impl SceneDir {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> SandboxConfig {
        SandboxConfig::load(&self.config_path).expect("Failed to load scene config")
    }
}

/// Convert [`QUAD_OBJ`] into a model and lay out textures, shaders and a config
/// with relative asset paths
#[allow(dead_code)]
pub fn create_scene_dir() -> SceneDir {
    let dir = tempfile::Builder::new()
        .prefix("dxsandbox-scene")
        .tempdir()
        .expect("Failed to create temp dir");

    let obj = write_file(dir.path(), "quad.obj", QUAD_OBJ);
    fs::create_dir_all(dir.path().join("data")).expect("Failed to create data directory");
    dxsandbox::core::convert::convert_file(
        &obj,
        dir.path().join("data/quad.txt"),
        dxsandbox::core::model::ModelFormat::Text,
    )
    .expect("Failed to convert fixture model");

    write_file(dir.path(), "data/checker.tga", checker_targa());
    write_file(dir.path(), "shaders/light.vs.hlsl", "// vertex shader\n");
    write_file(dir.path(), "shaders/light.ps.hlsl", "// pixel shader\n");

    let config_path = write_file(
        dir.path(),
        "sandbox.toml",
        r#"
[screen]
width = 640
height = 480

[assets]
model = "data/quad.txt"
texture = "data/checker.tga"
vertex_shader = "shaders/light.vs.hlsl"
pixel_shader = "shaders/light.ps.hlsl"
"#,
    );

    SceneDir { dir, config_path }
}
