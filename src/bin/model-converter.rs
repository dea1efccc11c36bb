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
use dxsandbox::core::convert::convert_file;
use dxsandbox::core::model::ModelFormat;
use log::{error, info};
use std::path::PathBuf;

/// Status when the input or output path is missing
const EXIT_MISSING_ARGS: i32 = -5;

/// Status when the report cannot be printed
const EXIT_REPORT_FAILED: i32 = 1;

/// Wavefront OBJ to sandbox model converter
#[derive(Parser)]
#[command(name = "model-converter")]
#[command(about = "Convert OBJ files into sandbox models", long_about = None)]
struct Args {
    /// Path to the OBJ file to convert
    input: Option<PathBuf>,

    /// Path of the model file to write
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = ModelFormat::Text)]
    format: ModelFormat,

    /// Print the conversion report as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    dotenvy::dotenv().ok();

    // Initialize logger with default level INFO
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let (Some(input), Some(output)) = (args.input, args.output) else {
        error!("Usage: model-converter <INPUT> <OUTPUT>");
        return EXIT_MISSING_ARGS;
    };

    info!("Converting {} -> {}", input.display(), output.display());

    let report = match convert_file(&input, &output, args.format) {
        Ok(report) => report,
        Err(e) => {
            error!("Conversion failed: {}", e);
            return e.converter_status();
        }
    };

    info!(
        "Wrote {} vertices ({} faces, {} positions, {} texels, {} normals, {} lines skipped)",
        report.vertices,
        report.faces,
        report.positions,
        report.texels,
        report.normals,
        report.skipped_lines
    );

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return EXIT_REPORT_FAILED;
            }
        }
    }

    0
}
