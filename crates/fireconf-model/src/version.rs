//! Release variant catalog.
//!
//! Every supported build of the original image is listed here in a fixed
//! order. The position of a release in the catalog is its ordinal, which
//! doubles as the value of its numeric preprocessor define and as the basis
//! for "newer than" comparisons between releases.

use serde::{Serialize, Serializer};

use crate::error::{ConfigError, Result};

/// Display names of every supported release, in ordinal order.
const VERSION_NAMES: &[&str] = &[
    "MQ-J", // 0
    "MQ-U", // 1
    "CE-J", // 2
    "CE-U", // 3
    "CE-P", // 4
];

/// Release built by default when none is requested.
const DEFAULT_VERSION: &str = "MQ-J";

/// The release whose environment revision define differs from the rest.
const BASE_VERSION: &str = "MQ-J";

/// The release that ships two extra core translation units.
const EXTENDED_VERSION: &str = "CE-P";

/// One release of the original image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    name: &'static str,
    ordinal: usize,
}

impl Version {
    /// Display name, e.g. `CE-P`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Zero-based position in the catalog.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Name with separators flattened for use as a preprocessor define,
    /// e.g. `CE_P`.
    pub fn define_name(&self) -> String {
        self.name.replace('-', "_")
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Read-only catalog of supported releases.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionRegistry;

impl VersionRegistry {
    pub fn new() -> Self {
        VersionRegistry
    }

    /// Number of registered releases.
    pub fn len(&self) -> usize {
        VERSION_NAMES.len()
    }

    pub fn is_empty(&self) -> bool {
        VERSION_NAMES.is_empty()
    }

    /// All registered releases in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = Version> + '_ {
        VERSION_NAMES
            .iter()
            .enumerate()
            .map(|(ordinal, name)| Version { name, ordinal })
    }

    /// Look up a release by name, ignoring ASCII case.
    pub fn resolve(&self, name: &str) -> Result<Version> {
        self.iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownVersion {
                requested: name.to_string(),
            })
    }

    /// The release built when no version is requested.
    pub fn default_version(&self) -> Version {
        self.resolve(DEFAULT_VERSION)
            .unwrap_or_else(|_| unreachable!("default version is registered"))
    }

    /// The designated base release.
    pub fn base(&self) -> Version {
        self.resolve(BASE_VERSION)
            .unwrap_or_else(|_| unreachable!("base version is registered"))
    }

    /// The designated extended release.
    pub fn extended(&self) -> Version {
        self.resolve(EXTENDED_VERSION)
            .unwrap_or_else(|_| unreachable!("extended version is registered"))
    }

    /// Whether `version` is `reference` or a newer release.
    pub fn is_at_least(&self, version: Version, reference: &str) -> Result<bool> {
        Ok(version.ordinal >= self.resolve(reference)?.ordinal)
    }
}
