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

//! Sandbox configuration
//!
//! Settings are read from a TOML file. Every section and key is optional and
//! falls back to the defaults below:
//!
//! ```toml
//! [screen]
//! width = 800
//! height = 600
//! fullscreen = false
//! vsync = true
//! depth = 1000.0
//! near = 0.1
//!
//! [assets]
//! model = "data/sq_cubes.txt"
//! texture = "data/aluminum.tga"
//! vertex_shader = "shaders/light.vs.hlsl"
//! pixel_shader = "shaders/light.ps.hlsl"
//!
//! [scene]
//! clear_color = [0.07, 0.0, 0.34, 1.0]
//! camera_position = [0.0, 0.0, -25.0]
//! camera_rotation = [0.0, 0.0, 0.0]
//!
//! [light]
//! direction = [0.0, 0.0, 1.0]
//! diffuse = [0.7, 0.7, 0.7, 1.0]
//! ambient = [0.15, 0.15, 0.15, 1.0]
//! specular = [0.8, 0.8, 0.8, 1.0]
//! specular_power = 50.0
//! ```
//!
//! Relative asset paths written in the file are resolved against the directory
//! of the config file. Paths left to their defaults stay relative to the
//! working directory.
//! `DXSANDBOX_MODEL` and `DXSANDBOX_TEXTURE` override the asset paths after
//! loading. `DXSANDBOX_CONFIG` names the file when none is given explicitly.

use super::device::DeviceSettings;
use super::error::ConfigError;
use super::light::Light;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const ENV_CONFIG: &str = "DXSANDBOX_CONFIG";

/// Environment variable overriding the model path
pub const ENV_MODEL: &str = "DXSANDBOX_MODEL";

/// Environment variable overriding the texture path
pub const ENV_TEXTURE: &str = "DXSANDBOX_TEXTURE";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub screen: ScreenConfig,
    pub assets: AssetConfig,
    pub scene: SceneConfig,
    pub light: LightConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    /// Far clip plane
    pub depth: f32,
    /// Near clip plane
    pub near: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        let device = DeviceSettings::default();
        Self {
            width: device.width,
            height: device.height,
            fullscreen: device.fullscreen,
            vsync: device.vsync,
            depth: device.screen_depth,
            near: device.screen_near,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub model: PathBuf,
    pub texture: PathBuf,
    pub vertex_shader: PathBuf,
    pub pixel_shader: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("data/sq_cubes.txt"),
            texture: PathBuf::from("data/aluminum.tga"),
            vertex_shader: PathBuf::from("shaders/light.vs.hlsl"),
            pixel_shader: PathBuf::from("shaders/light.ps.hlsl"),
        }
    }
}

/// Asset keys as written in a config file, before defaults fill the gaps
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WrittenAssets {
    model: Option<PathBuf>,
    texture: Option<PathBuf>,
    vertex_shader: Option<PathBuf>,
    pixel_shader: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WrittenKeys {
    assets: WrittenAssets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub clear_color: [f32; 4],
    pub camera_position: [f32; 3],
    /// Degrees around X, Y and Z
    pub camera_rotation: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.07, 0.0, 0.34, 1.0],
            camera_position: [0.0, 0.0, -25.0],
            camera_rotation: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub direction: [f32; 3],
    pub diffuse: [f32; 4],
    pub ambient: [f32; 4],
    pub specular: [f32; 4],
    pub specular_power: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [0.0, 0.0, 1.0],
            diffuse: [0.7, 0.7, 0.7, 1.0],
            ambient: [0.15, 0.15, 0.15, 1.0],
            specular: [0.8, 0.8, 0.8, 1.0],
            specular_power: 50.0,
        }
    }
}

impl LightConfig {
    pub fn to_light(&self) -> Light {
        let [dx, dy, dz] = self.direction;
        let [dr, dg, db, da] = self.diffuse;
        let [ar, ag, ab, aa] = self.ambient;
        let [sr, sg, sb, sa] = self.specular;

        let mut light = Light::new();
        light.set_direction(dx, dy, dz);
        light.set_diffuse_color(dr, dg, db, da);
        light.set_ambient_color(ar, ag, ab, aa);
        light.set_specular_color(sr, sg, sb, sa);
        light.set_specular_power(self.specular_power);
        light
    }
}

impl SandboxConfig {
    /// Parse TOML text; `origin` is only used in error messages
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: SandboxConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file and resolve its asset paths
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&text, path)?;
        if let Some(base) = path.parent() {
            let written: WrittenKeys = toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            config.assets.resolve_relative_to(base, &written.assets);
        }

        log::info!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    /// Pick the config source: explicit path, then `DXSANDBOX_CONFIG`, then defaults
    ///
    /// Environment overrides are applied in every case.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(ENV_CONFIG).map(PathBuf::from);

        let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(path)?,
            None => {
                log::info!("No config file given, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `DXSANDBOX_MODEL` / `DXSANDBOX_TEXTURE`
    pub fn apply_env_overrides(&mut self) {
        if let Some(model) = std::env::var_os(ENV_MODEL) {
            log::debug!("{} overrides model path", ENV_MODEL);
            self.assets.model = PathBuf::from(model);
        }
        if let Some(texture) = std::env::var_os(ENV_TEXTURE) {
            log::debug!("{} overrides texture path", ENV_TEXTURE);
            self.assets.texture = PathBuf::from(texture);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "screen",
                reason: format!("{}x{} has no area", self.screen.width, self.screen.height),
            });
        }
        if !(self.screen.near > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "screen.near",
                reason: format!("must be positive, got {}", self.screen.near),
            });
        }
        if !(self.screen.depth > self.screen.near) {
            return Err(ConfigError::InvalidValue {
                key: "screen.depth",
                reason: format!(
                    "far plane {} must lie beyond near plane {}",
                    self.screen.depth, self.screen.near
                ),
            });
        }
        Ok(())
    }

    pub fn device_settings(&self) -> DeviceSettings {
        DeviceSettings {
            width: self.screen.width,
            height: self.screen.height,
            vsync: self.screen.vsync,
            fullscreen: self.screen.fullscreen,
            screen_depth: self.screen.depth,
            screen_near: self.screen.near,
        }
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config",
            reason: e.to_string(),
        })
    }
}

impl AssetConfig {
    fn resolve_relative_to(&mut self, base: &Path, written: &WrittenAssets) {
        for (path, set) in [
            (&mut self.model, written.model.is_some()),
            (&mut self.texture, written.texture.is_some()),
            (&mut self.vertex_shader, written.vertex_shader.is_some()),
            (&mut self.pixel_shader, written.pixel_shader.is_some()),
        ] {
            if set && path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
