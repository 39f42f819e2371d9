//! Matching progress reporting.
//!
//! Consumes a [`ProjectConfig`] and produces a completion summary keyed by
//! library and object matching status: how many translation units are
//! expected to byte-match the shipped binary for the selected release.
//! Prints the summary and writes `progress.json` under the build directory.

use fireconf_model::ProjectConfig;
use serde::Serialize;

/// Errors that can occur while reporting progress.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// I/O error writing the progress artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for progress operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Matching counts for one library.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryProgress {
    pub name: String,
    pub matched: usize,
    pub total: usize,
}

impl LibraryProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 * 100.0 / self.total as f64
        }
    }
}

/// Matching counts for the whole configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub version: String,
    pub matched: usize,
    pub total: usize,
    pub libraries: Vec<LibraryProgress>,
}

impl ProgressSummary {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 * 100.0 / self.total as f64
        }
    }
}

/// Compute the summary without printing or writing anything.
pub fn summarize(config: &ProjectConfig) -> ProgressSummary {
    let libraries: Vec<LibraryProgress> = config
        .libraries
        .iter()
        .map(|library| LibraryProgress {
            name: library.name.clone(),
            matched: library.objects.iter().filter(|o| o.matching).count(),
            total: library.objects.len(),
        })
        .collect();

    ProgressSummary {
        version: config.version.name().to_string(),
        matched: libraries.iter().map(|l| l.matched).sum(),
        total: libraries.iter().map(|l| l.total).sum(),
        libraries,
    }
}

/// Print the completion summary and write `progress.json`.
///
/// Per-library lines are printed only when the configuration asks for
/// verbose output.
pub fn report(config: &ProjectConfig) -> Result<ProgressSummary> {
    let summary = summarize(config);

    println!(
        "{}: {}/{} objects matching ({:.2}%)",
        summary.version,
        summary.matched,
        summary.total,
        summary.percent()
    );
    if config.verbose {
        for library in &summary.libraries {
            println!(
                "  {:<24} {}/{} ({:.2}%)",
                library.name,
                library.matched,
                library.total,
                library.percent()
            );
        }
    }

    let out_dir = config.build_dir.join(config.version.name());
    std::fs::create_dir_all(&out_dir)?;
    let json = serde_json::to_string_pretty(&summary)?;
    std::fs::write(out_dir.join("progress.json"), json)?;

    Ok(summary)
}
