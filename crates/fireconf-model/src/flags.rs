//! Compiler flag layering.
//!
//! Flags are composed once per run into a base layer plus one derived layer
//! per build profile. Layers are plain owned values; deriving a profile
//! clones the base, so no layer can alias another.

use serde::Serialize;

use crate::version::{Version, VersionRegistry};

/// An ordered, immutable sequence of compiler, assembler, or linker
/// arguments. Order is significant: later flags override earlier ones when
/// the toolchain consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagLayer(Vec<String>);

impl FlagLayer {
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FlagLayer(flags.into_iter().map(Into::into).collect())
    }

    /// A new layer consisting of this layer followed by `suffix`.
    /// The receiver is left untouched.
    pub fn extended<I, S>(&self, suffix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut flags = self.0.clone();
        flags.extend(suffix.into_iter().map(Into::into));
        FlagLayer(flags)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build profiles deriving their compiler flags from the shared base layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Emulator core and media player translation units.
    Simulator,
    /// Platform SDK libraries.
    PlatformSdk,
    /// Compiler runtime and debugging stub libraries.
    Runtime,
}

/// Environment revision shipped with the base release.
const DOLPHIN_REV_BASE: u32 = 2002;
/// Environment revision shipped with every later release.
const DOLPHIN_REV_LATER: u32 = 2003;

/// Compiler flags shared by every profile, before version defines.
const CFLAGS_FIXED: &[&str] = &[
    "-Cpp_exceptions off",
    "-proc gekko",
    "-fp hardware",
    "-fp_contract on",
    "-enum int",
    "-align powerpc",
    "-nosyspath",
    "-RTTI off",
    "-str reuse",
    "-multibyte",
    "-O4,p",
    "-inline auto",
    "-nodefaults",
    "-msgstyle gcc",
];

/// Compose the base compiler flag layer for the selected release.
///
/// The layer carries one numeric define per registered release, the
/// `VERSION` define for the selection, and the environment revision define,
/// then exactly one of the debug or release branches.
pub fn base_flags(registry: &VersionRegistry, selected: Version, debug: bool) -> FlagLayer {
    let mut flags: Vec<String> = CFLAGS_FIXED.iter().map(|f| f.to_string()).collect();

    flags.push("-i include".to_string());
    flags.push("-i libc".to_string());
    flags.push(format!("-i build/{}/include", selected.name()));

    for version in registry.iter() {
        flags.push(format!("-D{}={}", version.define_name(), version.ordinal()));
    }
    flags.push(format!("-DVERSION={}", selected.ordinal()));

    let revision = if selected == registry.base() {
        DOLPHIN_REV_BASE
    } else {
        DOLPHIN_REV_LATER
    };
    flags.push(format!("-DDOLPHIN_REV={revision}"));

    if debug {
        flags.push("-sym on".to_string());
        flags.push("-DDEBUG=1".to_string());
    } else {
        flags.push("-DNDEBUG=1".to_string());
    }

    FlagLayer(flags)
}

/// Derive a profile's flag layer from the base layer.
pub fn derive(base: &FlagLayer, profile: Profile) -> FlagLayer {
    match profile {
        Profile::Simulator => base.extended(["-inline auto,deferred"]),
        Profile::PlatformSdk => base.clone(),
        Profile::Runtime => base.extended(["-msgstyle gcc", "-inline auto,deferred"]),
    }
}

/// Assembler flags for the selected release.
pub fn assembler_flags(selected: Version) -> FlagLayer {
    FlagLayer::new([
        "-mgekko".to_string(),
        "-I include".to_string(),
        "-I libc".to_string(),
        format!("-I build/{}/include", selected.name()),
    ])
}

/// Linker flags, identical for every release.
pub fn linker_flags() -> FlagLayer {
    FlagLayer::new(["-fp hardware", "-nodefaults", "-warn off"])
}

/// Every flag layer needed for one configuration run.
#[derive(Debug, Clone)]
pub struct FlagSet {
    pub base: FlagLayer,
    pub simulator: FlagLayer,
    pub platform_sdk: FlagLayer,
    pub runtime: FlagLayer,
}

impl FlagSet {
    /// Build the base layer and every derived layer for `selected`.
    pub fn compose(registry: &VersionRegistry, selected: Version, debug: bool) -> Self {
        let base = base_flags(registry, selected, debug);
        FlagSet {
            simulator: derive(&base, Profile::Simulator),
            platform_sdk: derive(&base, Profile::PlatformSdk),
            runtime: derive(&base, Profile::Runtime),
            base,
        }
    }

    /// The layer used by `profile`.
    pub fn layer(&self, profile: Profile) -> &FlagLayer {
        match profile {
            Profile::Simulator => &self.simulator,
            Profile::PlatformSdk => &self.platform_sdk,
            Profile::Runtime => &self.runtime,
        }
    }
}
