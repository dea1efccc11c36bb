use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for dxsandbox")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Quick checks before commit (fmt, clippy)
    Check {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        #[arg(long)]
        doc: bool,
        /// Restrict unit tests to these areas
        #[arg(long, value_enum)]
        only: Vec<Area>,
    },
    /// Run benchmarks
    Bench,
    /// Convert an OBJ file with the release converter
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Write the binary cache instead of text
        #[arg(long)]
        binary: bool,
    },
    /// Run the sandbox, forwarding any extra arguments
    Sandbox {
        #[arg(long)]
        release: bool,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Pre-commit hook (fmt, clippy, test)
    PreCommit,
    /// Install git hooks
    InstallHooks,
}

/// Groups of library modules for `x test --only`
#[derive(Clone, Copy, ValueEnum)]
enum Area {
    Obj,
    Convert,
    Model,
    Texture,
    Math,
    Render,
    System,
}

impl Area {
    fn label(self) -> &'static str {
        match self {
            Area::Obj => "OBJ",
            Area::Convert => "Convert",
            Area::Model => "Model",
            Area::Texture => "Texture",
            Area::Math => "Math",
            Area::Render => "Render",
            Area::System => "System",
        }
    }

    fn filters(self) -> &'static [&'static str] {
        match self {
            Area::Obj => &["core::obj"],
            Area::Convert => &["core::convert"],
            Area::Model => &["core::model", "core::mesh"],
            Area::Texture => &["core::texture"],
            Area::Math => &["core::math", "core::camera"],
            Area::Render => &["core::device", "core::shader", "core::graphics"],
            Area::System => &["core::system", "core::input", "core::config"],
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Check { verbose } => run_check(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { fix } => run_clippy(fix),
        Commands::Build { release } => run_build(release),
        Commands::Test { doc, only } => run_test(doc, &only),
        Commands::Bench => run_bench(),
        Commands::Convert {
            input,
            output,
            binary,
        } => run_convert(&input, &output, binary),
        Commands::Sandbox { release, args } => run_sandbox(release, &args),
        Commands::PreCommit => run_pre_commit(),
        Commands::InstallHooks => install_hooks(),
    }
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;
    run_task("Build", || run_build(false), verbose)?;
    run_task("Test", || run_test(false, &[]), verbose)?;

    report_elapsed("✓ CI passed in", start);
    Ok(())
}

fn run_check(verbose: bool) -> Result<()> {
    println!("{}", "=== Running Quick Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;

    report_elapsed("✓ Checks passed in", start);
    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = cargo("fmt");
    cmd.arg("--all");

    if check {
        cmd.arg("--").arg("--check");
    }

    execute_command(&mut cmd)
}

fn run_clippy(fix: bool) -> Result<()> {
    let mut cmd = cargo("clippy");
    cmd.arg("--workspace").arg("--all-targets");

    if fix {
        cmd.arg("--fix");
    } else {
        cmd.arg("--").arg("-D").arg("warnings");
    }

    execute_command(&mut cmd)
}

fn run_build(release: bool) -> Result<()> {
    let mut cmd = cargo("build");
    cmd.arg("--workspace");

    if release {
        cmd.arg("--release");
    }

    execute_command(&mut cmd)
}

fn run_test(doc: bool, only: &[Area]) -> Result<()> {
    if doc {
        let mut cmd = cargo("test");
        cmd.arg("--doc");
        return execute_command(&mut cmd);
    }

    if only.is_empty() {
        return execute_command(&mut cargo("test"));
    }

    let mut failed = Vec::new();

    for &area in only {
        println!("{} Running {} tests...", "→".blue(), area.label().bold());

        let passed = area.filters().iter().all(|filter| {
            let mut cmd = cargo("test");
            cmd.arg("--lib").arg(filter);
            execute_command(&mut cmd).is_ok()
        });

        if passed {
            println!("{} {} tests passed\n", "✓".green(), area.label());
        } else {
            println!("{} {} tests failed\n", "✗".red(), area.label());
            failed.push(area.label());
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Tests failed in: {}", failed.join(", "))
    }
}

fn run_bench() -> Result<()> {
    execute_command(&mut cargo("bench"))
}

fn run_convert(input: &Path, output: &Path, binary: bool) -> Result<()> {
    println!("{}", "=== Model Conversion ===".bold().blue());

    if !input.exists() {
        println!(
            "{} OBJ file not found: {}",
            "✗".red().bold(),
            input.display().to_string().yellow()
        );
        anyhow::bail!("Input file not found");
    }

    println!(
        "{} Input: {}",
        "→".blue(),
        input.display().to_string().cyan()
    );
    println!(
        "{} Output: {}",
        "→".blue(),
        output.display().to_string().cyan()
    );

    let start = Instant::now();

    let mut cmd = cargo("run");
    cmd.arg("--release")
        .arg("--bin")
        .arg("model-converter")
        .arg("--")
        .arg(input)
        .arg(output);

    if binary {
        cmd.arg("--format").arg("binary");
    }

    execute_command(&mut cmd).context("model-converter failed")?;

    report_elapsed("✓ Converted in", start);
    Ok(())
}

fn run_sandbox(release: bool, args: &[String]) -> Result<()> {
    let mut cmd = cargo("run");

    if release {
        cmd.arg("--release");
    }

    cmd.arg("--bin").arg("dxsandbox").arg("--").args(args);

    execute_command(&mut cmd).context("dxsandbox failed")
}

fn run_pre_commit() -> Result<()> {
    println!("{}", "=== Pre-commit Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), false)?;
    run_task("Clippy", || run_clippy(false), false)?;
    run_task("Test", || run_test(false, &[]), false)?;

    report_elapsed("✓ Pre-commit checks passed in", start);
    Ok(())
}

fn install_hooks() -> Result<()> {
    use std::fs;

    println!("{}", "Installing git hooks...".bold());

    let hook_content = r#"#!/bin/sh
# Auto-generated by cargo x install-hooks
set -e

echo "Running pre-commit checks..."
cargo x pre-commit
"#;

    let hook_path = Path::new(".git/hooks/pre-commit");
    if let Some(dir) = hook_path.parent() {
        fs::create_dir_all(dir).context("no .git directory to install into")?;
    }
    fs::write(hook_path, hook_content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(hook_path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(hook_path, perms)?;
    }

    println!("{}", "✓ Git hooks installed".green());
    println!("  Pre-commit hook will run: fmt, clippy, test");

    Ok(())
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(_) => {
            let timing = if verbose {
                format!("({:.2}s)", start.elapsed().as_secs_f64())
            } else {
                String::new()
            };
            println!("{} {}", "✓".green().bold(), timing);
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn report_elapsed(message: &str, start: Instant) {
    println!(
        "\n{} {}",
        message.green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );
}

fn cargo(subcommand: &str) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg(subcommand);
    cmd
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
