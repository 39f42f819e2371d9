//! Library assembly strategies.
//!
//! Each library in the link order is produced by one of four strategies,
//! which pick the flag profile and toolchain tag the shipping binary was
//! built with and resolve every object against the selected release.

use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::flags::{FlagLayer, FlagSet, Profile};
use crate::object::{Object, ResolvedObject};
use crate::version::{Version, VersionRegistry};

/// Toolchain tag of the platform SDK libraries.
const SDK_TOOLCHAIN_TAG: &str = "GC/1.2.5n";

/// Toolchain tag of the compiler runtime and stub libraries.
const RUNTIME_TOOLCHAIN_TAG: &str = "GC/1.3.2";

/// The library whose declaration carries the extended release's extra
/// translation units.
const CORE_LIBRARY: &str = "Core";

/// List positions deleted from the core library for non-extended releases.
/// The second position is taken against the list left by the first
/// deletion.
const NON_EXTENDED_DROPS: [usize; 2] = [3, 5];

/// A named, ordered group of translation units sharing one toolchain tag
/// and one flag layer. Corresponds to a link-time archive; object order
/// mirrors the historical link order.
#[derive(Debug, Clone, Serialize)]
pub struct Library {
    pub name: String,
    pub toolchain_tag: String,
    pub flags: FlagLayer,
    pub host: bool,
    pub objects: Vec<ResolvedObject>,
}

/// Builds [`Library`] records for one selected release.
pub struct LibraryAssembler<'a> {
    registry: &'a VersionRegistry,
    selected: Version,
    flags: &'a FlagSet,
    linker_version: &'a str,
}

impl<'a> LibraryAssembler<'a> {
    pub fn new(
        registry: &'a VersionRegistry,
        selected: Version,
        flags: &'a FlagSet,
        linker_version: &'a str,
    ) -> Self {
        LibraryAssembler {
            registry,
            selected,
            flags,
            linker_version,
        }
    }

    /// The release this assembler is configured for.
    pub fn selected(&self) -> Version {
        self.selected
    }

    /// Emulator core profile: runtime flag layer, linker toolchain tag.
    ///
    /// Only the extended release ships the two extra core units, so for
    /// every other release the core library drops them before wrapping.
    pub fn simulator(&self, name: &str, mut objects: Vec<Object>) -> Result<Library> {
        if name == CORE_LIBRARY && self.selected != self.registry.extended() {
            objects = drop_non_extended_objects(name, objects)?;
        }
        self.wrap(name, self.linker_version, Profile::Runtime, objects)
    }

    /// Emulator media profile: platform SDK flag layer, linker toolchain
    /// tag, no structural edits.
    pub fn media(&self, name: &str, objects: Vec<Object>) -> Result<Library> {
        self.wrap(name, self.linker_version, Profile::PlatformSdk, objects)
    }

    /// Platform SDK library profile: platform SDK flag layer and the SDK's
    /// own toolchain tag.
    pub fn sdk(&self, name: &str, objects: Vec<Object>) -> Result<Library> {
        self.wrap(name, SDK_TOOLCHAIN_TAG, Profile::PlatformSdk, objects)
    }

    /// Generic runtime profile: runtime flag layer and the runtime
    /// toolchain tag.
    pub fn runtime(&self, name: &str, objects: Vec<Object>) -> Result<Library> {
        self.wrap(name, RUNTIME_TOOLCHAIN_TAG, Profile::Runtime, objects)
    }

    fn wrap(
        &self,
        name: &str,
        toolchain_tag: &str,
        profile: Profile,
        objects: Vec<Object>,
    ) -> Result<Library> {
        let layer = self.flags.layer(profile);
        let objects = objects
            .iter()
            .map(|object| object.resolve(self.registry, self.selected, layer, name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Library {
            name: name.to_string(),
            toolchain_tag: toolchain_tag.to_string(),
            flags: layer.clone(),
            host: false,
            objects,
        })
    }
}

/// Remove the translation units only the extended release ships.
///
/// The deletions are sequential fixed-index removals; the second index is
/// evaluated against the list left by the first removal. Requires the
/// declared list to be long enough for both, otherwise the declaration is
/// buggy and assembly fails naming the library.
fn drop_non_extended_objects(library: &str, mut objects: Vec<Object>) -> Result<Vec<Object>> {
    for index in NON_EXTENDED_DROPS {
        if index >= objects.len() {
            return Err(ConfigError::StructuralAssembly {
                library: library.to_string(),
                index,
                len: objects.len(),
            });
        }
        objects.remove(index);
    }
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{MATCHING, NON_MATCHING};

    fn core_objects() -> Vec<Object> {
        vec![
            Object::new(MATCHING, "emulator/Core/xlCoreGCN.c"),
            Object::new(MATCHING, "emulator/Core/xlPostGCN.c"),
            Object::new(MATCHING, "emulator/Core/xlFileGCN.c"),
            Object::new(MATCHING, "emulator/Core/xlText.c"),
            Object::new(MATCHING, "emulator/Core/xlList.c"),
            Object::new(MATCHING, "emulator/Core/xlHeap.c"),
            Object::new(MATCHING, "emulator/Core/xlFile.c"),
            Object::new(MATCHING, "emulator/Core/xlObject.c"),
        ]
    }

    fn assemble_core(version: &str) -> Library {
        let registry = VersionRegistry::new();
        let selected = registry.resolve(version).unwrap();
        let flags = FlagSet::compose(&registry, selected, true);
        let assembler = LibraryAssembler::new(&registry, selected, &flags, "GC/1.1");
        assembler.simulator("Core", core_objects()).unwrap()
    }

    #[test]
    fn extended_release_keeps_every_core_object() {
        let library = assemble_core("CE-P");
        let paths: Vec<&str> = library.objects.iter().map(|o| o.path.as_str()).collect();
        let declared: Vec<&str> = core_objects().iter().map(|o| o.path).collect();
        assert_eq!(paths, declared);
    }

    #[test]
    fn other_releases_drop_the_two_extra_core_objects() {
        let registry = VersionRegistry::new();
        for version in registry.iter().filter(|v| *v != registry.extended()) {
            let library = assemble_core(version.name());
            assert_eq!(library.objects.len(), core_objects().len() - 2);
            let paths: Vec<&str> = library.objects.iter().map(|o| o.path.as_str()).collect();
            assert!(!paths.contains(&"emulator/Core/xlText.c"));
            assert!(!paths.contains(&"emulator/Core/xlFile.c"));
            // Remaining objects keep their declared order.
            assert_eq!(
                paths,
                [
                    "emulator/Core/xlCoreGCN.c",
                    "emulator/Core/xlPostGCN.c",
                    "emulator/Core/xlFileGCN.c",
                    "emulator/Core/xlList.c",
                    "emulator/Core/xlHeap.c",
                    "emulator/Core/xlObject.c",
                ]
            );
        }
    }

    #[test]
    fn short_core_declaration_fails_with_library_name() {
        let registry = VersionRegistry::new();
        let selected = registry.default_version();
        let flags = FlagSet::compose(&registry, selected, true);
        let assembler = LibraryAssembler::new(&registry, selected, &flags, "GC/1.1");

        let short = core_objects().into_iter().take(4).collect();
        let err = assembler.simulator("Core", short).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::StructuralAssembly { ref library, .. } if library == "Core"
        ));
    }

    #[test]
    fn non_core_simulator_libraries_are_not_edited() {
        let registry = VersionRegistry::new();
        let selected = registry.default_version();
        let flags = FlagSet::compose(&registry, selected, true);
        let assembler = LibraryAssembler::new(&registry, selected, &flags, "GC/1.1");

        let objects = vec![
            Object::new(MATCHING, "emulator/Fire/simGCN.c"),
            Object::new(MATCHING, "emulator/Fire/movie.c"),
        ];
        let library = assembler.simulator("Fire", objects).unwrap();
        assert_eq!(library.objects.len(), 2);
    }

    #[test]
    fn strategies_pick_the_declared_toolchain_tags() {
        let registry = VersionRegistry::new();
        let selected = registry.default_version();
        let flags = FlagSet::compose(&registry, selected, true);
        let assembler = LibraryAssembler::new(&registry, selected, &flags, "GC/1.1");

        let object = || vec![Object::new(NON_MATCHING, "dolphin/vi/vi.c")];
        assert_eq!(assembler.media("THP", object()).unwrap().toolchain_tag, "GC/1.1");
        assert_eq!(assembler.sdk("vi", object()).unwrap().toolchain_tag, "GC/1.2.5n");
        assert_eq!(
            assembler.runtime("MSL_C", object()).unwrap().toolchain_tag,
            "GC/1.3.2"
        );
    }

    #[test]
    fn strategies_pick_the_declared_flag_profiles() {
        let registry = VersionRegistry::new();
        let selected = registry.default_version();
        let flags = FlagSet::compose(&registry, selected, true);
        let assembler = LibraryAssembler::new(&registry, selected, &flags, "GC/1.1");

        let object = || vec![Object::new(NON_MATCHING, "dolphin/vi/vi.c")];
        assert_eq!(
            assembler.media("THP", object()).unwrap().flags,
            flags.platform_sdk
        );
        assert_eq!(assembler.sdk("vi", object()).unwrap().flags, flags.platform_sdk);
        assert_eq!(assembler.runtime("MSL_C", object()).unwrap().flags, flags.runtime);
        assert_eq!(
            assembler.simulator("Fire", object()).unwrap().flags,
            flags.runtime
        );
    }
}
