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

mod common;

use common::assertions::{assert_matrix, f32_at};
use common::fixtures::create_scene_dir;
use dxsandbox::core::device::{HeadlessBackend, ShaderStage, Topology};
use dxsandbox::core::error::{Result, SandboxError};
use dxsandbox::core::input::VK_ESCAPE;
use dxsandbox::core::math::Mat4;
use dxsandbox::core::system::{ScriptedEvents, StopReason, System, WindowEvent};

#[test]
fn test_frame_limit_stops_run() -> Result<()> {
    let scene = create_scene_dir();
    let mut system = System::init(&scene.config(), HeadlessBackend::new())?.with_frame_limit(5);

    let summary = system.run(&mut ScriptedEvents::new())?;
    assert_eq!(summary.frames, 5);
    assert_eq!(summary.reason, StopReason::FrameLimit);

    let stats = system.graphics().backend().stats();
    assert_eq!(stats.frames_presented, 5);
    assert_eq!(stats.draw_calls, 5);
    assert_eq!(stats.indices_drawn, 30);
    Ok(())
}

#[test]
fn test_escape_stops_before_next_frame() -> Result<()> {
    let scene = create_scene_dir();
    let mut system = System::init(&scene.config(), HeadlessBackend::new())?.with_frame_limit(100);

    let mut events = ScriptedEvents::new().at(3, WindowEvent::KeyDown(VK_ESCAPE));
    let summary = system.run(&mut events)?;

    assert_eq!(summary.reason, StopReason::Escape);
    assert_eq!(summary.frames, 3);
    assert_eq!(system.graphics().backend().stats().frames_presented, 3);
    Ok(())
}

#[test]
fn test_released_escape_does_not_stop() -> Result<()> {
    let scene = create_scene_dir();
    let mut system = System::init(&scene.config(), HeadlessBackend::new())?.with_frame_limit(4);

    let mut events = ScriptedEvents::new()
        .at(1, WindowEvent::KeyDown(VK_ESCAPE))
        .at(1, WindowEvent::KeyUp(VK_ESCAPE));
    let summary = system.run(&mut events)?;

    assert_eq!(summary.reason, StopReason::FrameLimit);
    assert!(!system.input().is_key_down(VK_ESCAPE));
    Ok(())
}

#[test]
fn test_quit_message_stops_run() -> Result<()> {
    let scene = create_scene_dir();
    let mut system = System::init(&scene.config(), HeadlessBackend::new())?;

    let mut events = ScriptedEvents::new()
        .at(0, WindowEvent::KeyDown(0x41))
        .at(2, WindowEvent::Quit);
    let summary = system.run(&mut events)?;

    assert_eq!(summary.reason, StopReason::Quit);
    assert_eq!(summary.frames, 2);
    assert!(system.input().is_key_down(0x41));
    Ok(())
}

#[test]
fn test_pipeline_state_after_frame() -> Result<()> {
    let scene = create_scene_dir();
    let mut system = System::init(&scene.config(), HeadlessBackend::new())?.with_frame_limit(1);
    system.run(&mut ScriptedEvents::new())?;

    let graphics = system.graphics();
    let backend = graphics.backend();
    let shader = graphics.shader();

    assert_eq!(backend.topology(), Some(Topology::TriangleList));
    assert_eq!(
        backend.constant_buffer(ShaderStage::Vertex, 0),
        Some(shader.matrix_buffer())
    );
    assert_eq!(
        backend.constant_buffer(ShaderStage::Vertex, 1),
        Some(shader.camera_buffer())
    );
    assert_eq!(
        backend.constant_buffer(ShaderStage::Pixel, 0),
        Some(shader.light_buffer())
    );
    assert_eq!(
        backend.bound_texture(ShaderStage::Pixel, 0),
        Some(graphics.model().texture())
    );
    assert!(backend.bound_sampler(ShaderStage::Pixel, 0).is_some());

    // 2x2 texture gets a 2-level mip chain
    assert_eq!(
        backend.texture_info(graphics.model().texture()),
        Some((2, 2, 2))
    );
    Ok(())
}

#[test]
fn test_uploaded_matrices_are_transposed() -> Result<()> {
    let scene = create_scene_dir();
    let mut system = System::init(&scene.config(), HeadlessBackend::new())?.with_frame_limit(1);
    system.run(&mut ScriptedEvents::new())?;

    let graphics = system.graphics();
    let bytes = graphics
        .backend()
        .buffer_data(graphics.shader().matrix_buffer())
        .expect("matrix buffer missing");
    assert_eq!(bytes.len(), 192);

    // the view matrix is the second block of 16 floats
    let mut rows = [[0.0f32; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = f32_at(bytes, 16 + r * 4 + c);
        }
    }
    let uploaded = Mat4::from_rows(rows);
    assert_matrix(&uploaded, &graphics.camera().view_matrix().transpose());
    Ok(())
}

#[test]
fn test_camera_position_reaches_camera_buffer() -> Result<()> {
    let scene = create_scene_dir();
    let mut system = System::init(&scene.config(), HeadlessBackend::new())?.with_frame_limit(1);
    system.run(&mut ScriptedEvents::new())?;

    let graphics = system.graphics();
    let bytes = graphics
        .backend()
        .buffer_data(graphics.shader().camera_buffer())
        .expect("camera buffer missing");
    assert_eq!(bytes.len(), 16);
    assert_eq!(f32_at(bytes, 2), -25.0);
    Ok(())
}

#[test]
fn test_missing_texture_fails_init() {
    let scene = create_scene_dir();
    let mut config = scene.config();
    config.assets.texture = scene.path().join("data/absent.tga");

    let err = System::init(&config, HeadlessBackend::new()).err().unwrap();
    assert!(matches!(err, SandboxError::Texture(_)));
    assert_eq!(err.exit_code(), 50);
}

#[test]
fn test_config_resolves_assets_next_to_file() {
    let scene = create_scene_dir();
    let config = scene.config();
    assert_eq!(config.screen.width, 640);
    assert_eq!(config.assets.model, scene.path().join("data/quad.txt"));
    assert_eq!(
        config.assets.pixel_shader,
        scene.path().join("shaders/light.ps.hlsl")
    );
    assert!(config.assets.model.is_file());
}

#[test]
fn test_screen_only_config_finds_bundled_assets() -> Result<()> {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = common::fixtures::write_file(dir.path(), "screen.toml", "[screen]\nwidth = 1024\n");

    // Default asset paths stay relative to the working directory, the crate root here
    let config = dxsandbox::core::config::SandboxConfig::load(&path)?;
    assert_eq!(config.screen.width, 1024);

    let mut system = System::init(&config, HeadlessBackend::new())?.with_frame_limit(1);
    let summary = system.run(&mut ScriptedEvents::new())?;
    assert_eq!(summary.frames, 1);
    Ok(())
}

#[test]
fn test_default_config_runs_bundled_assets() -> Result<()> {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut config = dxsandbox::core::config::SandboxConfig::default();
    config.assets.model = root.join(&config.assets.model);
    config.assets.texture = root.join(&config.assets.texture);
    config.assets.vertex_shader = root.join(&config.assets.vertex_shader);
    config.assets.pixel_shader = root.join(&config.assets.pixel_shader);

    let mut system = System::init(&config, HeadlessBackend::new())?.with_frame_limit(3);
    let summary = system.run(&mut ScriptedEvents::new())?;

    assert_eq!(summary.frames, 3);
    assert_eq!(system.graphics().backend().stats().indices_drawn, 3 * 36);
    Ok(())
}
