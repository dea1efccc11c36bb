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

use clap::Parser;
use dxsandbox::core::config::SandboxConfig;
use dxsandbox::core::device::{FrameStats, HeadlessBackend};
use dxsandbox::core::error::Result;
use dxsandbox::core::input::VK_ESCAPE;
use dxsandbox::core::system::{RunSummary, ScriptedEvents, System, WindowEvent};
use log::{error, info};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Frame limit used when nothing else would stop a headless run
const DEFAULT_FRAMES: u64 = 600;

/// Rendering sandbox
#[derive(Parser)]
#[command(name = "dxsandbox")]
#[command(about = "Headless lit-model rendering sandbox", long_about = None)]
struct Args {
    /// Path to the sandbox config file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Model file, overriding the config
    #[arg(short = 'm', long)]
    model: Option<PathBuf>,

    /// TGA texture, overriding the config
    #[arg(short = 't', long)]
    texture: Option<PathBuf>,

    /// Maximum number of frames to render
    #[arg(short = 'n', long)]
    frames: Option<u64>,

    /// Press ESC before the given frame
    #[arg(long)]
    escape_at: Option<u64>,

    /// Send a quit message before the given frame
    #[arg(long)]
    quit_at: Option<u64>,

    /// Print the run summary and frame stats as JSON
    #[arg(long)]
    stats_json: bool,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Serialize)]
struct RunReport {
    summary: RunSummary,
    stats: FrameStats,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize logger with default level INFO
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("dxsandbox v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = SandboxConfig::resolve(args.config.as_deref())?;
    if let Some(model) = &args.model {
        config.assets.model = model.clone();
    }
    if let Some(texture) = &args.texture {
        config.assets.texture = texture.clone();
    }

    if args.print_config {
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let mut events = ScriptedEvents::new();
    if let Some(frame) = args.escape_at {
        events = events.at(frame, WindowEvent::KeyDown(VK_ESCAPE));
    }
    if let Some(frame) = args.quit_at {
        events = events.at(frame, WindowEvent::Quit);
    }

    let limit = match (args.frames, args.escape_at.or(args.quit_at)) {
        (Some(frames), _) => Some(frames),
        (None, Some(_)) => None,
        (None, None) => Some(DEFAULT_FRAMES),
    };

    let mut system = System::init(&config, HeadlessBackend::new())?;
    if let Some(frames) = limit {
        system = system.with_frame_limit(frames);
    }

    info!("Starting frame loop...");
    let summary = system.run(&mut events)?;
    let stats = system.graphics().backend().stats();

    info!(
        "{} frames, {} draw calls, {} indices drawn",
        stats.frames_presented, stats.draw_calls, stats.indices_drawn
    );

    if args.stats_json {
        let report = RunReport { summary, stats };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize run report: {}", e),
        }
    }

    Ok(())
}
