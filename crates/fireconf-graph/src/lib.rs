//! Build graph emission.
//!
//! Consumes a [`ProjectConfig`] and writes the concrete build description:
//! a ninja file with one build edge per translation unit, one archive edge
//! per library, and the final link edge, plus an `objdiff.json` listing
//! every unit with its expected matching status. Non-matching units are
//! assembled from their `.s` listing under the asm directory when assembly
//! incorporation is enabled; everything else compiles from source. Output
//! is deterministic for identical input.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use fireconf_model::{Library, ProjectConfig, ResolvedObject};
use serde::Serialize;

/// Errors that can occur while writing the build graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// I/O error writing build files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for build graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// One entry of `objdiff.json`, consumed by the object diffing tool.
#[derive(Debug, Serialize)]
struct DiffUnit {
    name: String,
    target_path: PathBuf,
    base_path: PathBuf,
    complete: bool,
}

/// Write `build.ninja` and `objdiff.json` under the configured build
/// directory.
pub fn generate(config: &ProjectConfig) -> Result<()> {
    let build_dir = config.build_dir.join(config.version.name());
    std::fs::create_dir_all(&build_dir)?;

    if config.diagnostics.warn_missing_config && !config.config_path.exists() {
        eprintln!(
            "warning: missing config file {}",
            config.config_path.display()
        );
    }
    if config.diagnostics.warn_missing_source {
        warn_missing_sources(config);
    }

    std::fs::write(build_dir.join("build.ninja"), ninja_rules(config))?;

    let units = diff_units(config, &build_dir);
    let json = serde_json::to_string_pretty(&units)?;
    std::fs::write(build_dir.join("objdiff.json"), json)?;

    Ok(())
}

fn warn_missing_sources(config: &ProjectConfig) {
    for library in &config.libraries {
        for object in &library.objects {
            let source = Path::new("src").join(&object.path);
            if !source.exists() {
                eprintln!("warning: missing source file {}", source.display());
            }
        }
    }
}

/// Render the ninja rule text for the whole configuration.
fn ninja_rules(config: &ProjectConfig) -> String {
    let mut out = String::new();
    let version = config.version.name();

    let _ = writeln!(out, "# generated for {version}; do not edit");
    let _ = writeln!(out, "builddir = {}", config.build_dir.display());
    let _ = writeln!(out, "asflags = {}", config.asflags.as_slice().join(" "));
    let _ = writeln!(out, "ldflags = {}", config.ldflags.as_slice().join(" "));
    out.push('\n');

    out.push_str("rule mwcc\n  command = $mwcc $cflags -c $in -o $out\n  description = CC $in\n\n");
    if config.include_assembly {
        out.push_str("rule as\n  command = $as $asflags -o $out $in\n  description = AS $in\n\n");
    }
    out.push_str("rule archive\n  command = $ar -c $out $in\n  description = AR $out\n\n");
    let link_flags = if config.generate_map {
        "$ldflags -map $map"
    } else {
        "$ldflags"
    };
    let _ = writeln!(
        out,
        "rule link\n  command = $ld {link_flags} -o $out $in\n  description = LINK $out\n"
    );

    let mut archives = Vec::new();
    for library in &config.libraries {
        let mut members = Vec::new();
        for object in &library.objects {
            let object_path = object_output(version, object);
            if config.include_assembly && !object.matching {
                let _ = writeln!(out, "build {object_path}: as {}", asm_source(&object.path));
            } else {
                let _ = writeln!(out, "build {object_path}: mwcc src/{}", object.path);
                let _ = writeln!(out, "  cflags = {}", object.flags.as_slice().join(" "));
            }
            members.push(object_path);
        }
        let archive = archive_output(version, library);
        let _ = writeln!(out, "build {archive}: archive {}", members.join(" "));
        archives.push(archive);
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "build $builddir/{version}/main.dol: link {}",
        archives.join(" ")
    );
    out
}

/// The `.s` listing for a translation unit, e.g. `asm/dolphin/vi/vi.s`.
fn asm_source(path: &str) -> String {
    Path::new("asm")
        .join(path)
        .with_extension("s")
        .display()
        .to_string()
}

fn object_output(version: &str, object: &ResolvedObject) -> String {
    format!("$builddir/{version}/obj/{}.o", object.path)
}

fn archive_output(version: &str, library: &Library) -> String {
    format!("$builddir/{version}/lib/{}.a", library.name)
}

/// One diff unit per translation unit, in link order.
fn diff_units(config: &ProjectConfig, build_dir: &Path) -> Vec<DiffUnit> {
    config
        .libraries
        .iter()
        .flat_map(|library| {
            library.objects.iter().map(|object| DiffUnit {
                name: format!("{}/{}", library.name, object.path),
                target_path: build_dir.join("expected").join(format!("{}.o", object.path)),
                base_path: build_dir.join("obj").join(format!("{}.o", object.path)),
                complete: object.matching,
            })
        })
        .collect()
}
