//! fireconf CLI: generates build files for the decompilation project.
//!
//! `fireconf` writes the build graph for the selected release,
//! `fireconf progress` reports how much of that release currently matches
//! the shipped binary.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

use fireconf_model::{Mode, ProjectConfig, ProjectOptions, ToolPaths, VersionRegistry};

// No auto-generated --version flag: the long form belongs to the release
// selector below.
#[derive(Parser)]
#[command(name = "fireconf", about = "Generates build files for the project")]
struct Cli {
    /// Script mode: configure or progress (default: configure)
    #[arg(default_value = "configure")]
    mode: String,

    /// Version to build (default: MQ-J)
    #[arg(short = 'v', long)]
    version: Option<String>,

    /// Base build directory (default: build)
    #[arg(long, value_name = "DIR", default_value = "build")]
    build_dir: PathBuf,

    /// Path to binutils (optional)
    #[arg(long, value_name = "BINARY")]
    binutils: Option<PathBuf>,

    /// Path to compilers (optional)
    #[arg(long, value_name = "DIR")]
    compilers: Option<PathBuf>,

    /// Path to wibo or wine (optional)
    #[cfg(not(windows))]
    #[arg(long, value_name = "BINARY")]
    wrapper: Option<PathBuf>,

    /// Path to decomp-toolkit binary or source (optional)
    #[arg(long, value_name = "BINARY | DIR")]
    dtk: Option<PathBuf>,

    /// Path to sjiswrap.exe (optional)
    #[arg(long, value_name = "EXE")]
    sjiswrap: Option<PathBuf>,

    /// Generate map file(s)
    #[arg(long, default_value_t = true)]
    map: bool,

    /// Don't incorporate .s files from the asm directory
    #[arg(long)]
    no_asm: bool,

    /// Build with debug info (non-matching)
    #[arg(long, default_value_t = true)]
    debug: bool,

    /// Print verbose output
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mode: Mode = cli.mode.parse()?;

    let registry = VersionRegistry::new();
    let selected = match &cli.version {
        Some(name) => registry.resolve(name)?,
        None => registry.default_version(),
    };

    let tools = ToolPaths {
        binutils: cli.binutils,
        compilers: cli.compilers,
        #[cfg(not(windows))]
        wrapper: cli.wrapper,
        #[cfg(windows)]
        wrapper: None,
        dtk: cli.dtk,
        sjiswrap: cli.sjiswrap,
    };
    let options = ProjectOptions {
        build_dir: cli.build_dir,
        tools,
        generate_map: cli.map,
        include_assembly: !cli.no_asm,
        debug: cli.debug,
        verbose: cli.verbose,
    };

    let config = ProjectConfig::assemble(&registry, selected, options)?;

    match mode {
        Mode::Configure => fireconf_graph::generate(&config)?,
        Mode::Progress => {
            fireconf_progress::report(&config)?;
        }
    }

    Ok(())
}
