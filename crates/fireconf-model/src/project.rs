//! Project configuration assembly.
//!
//! One [`ProjectConfig`] is built per invocation from the link-order table
//! and the selected release, then handed by value to exactly one
//! collaborator (build graph generation or progress reporting). Nothing
//! here performs I/O; paths and tool pins are threaded through verbatim.

use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::flags::{self, FlagLayer, FlagSet};
use crate::layout;
use crate::library::{Library, LibraryAssembler};
use crate::version::{Version, VersionRegistry};

/// Linker release the image was produced with.
const LINKER_VERSION: &str = "GC/1.1";

/// Execution mode requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Emit the build graph.
    Configure,
    /// Compute and report matching progress.
    Progress,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "configure" => Ok(Mode::Configure),
            "progress" => Ok(Mode::Progress),
            other => Err(ConfigError::UnknownMode {
                requested: other.to_string(),
            }),
        }
    }
}

/// Paths to external tools. Absent entries are resolved (or rejected) by
/// the collaborator that needs them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolPaths {
    pub binutils: Option<PathBuf>,
    pub compilers: Option<PathBuf>,
    pub wrapper: Option<PathBuf>,
    pub dtk: Option<PathBuf>,
    pub sjiswrap: Option<PathBuf>,
}

/// Pinned versions of the external toolchain components, forwarded as
/// opaque strings.
#[derive(Debug, Clone, Serialize)]
pub struct ToolTags {
    pub binutils: String,
    pub compilers: String,
    pub dtk: String,
    pub sjiswrap: String,
    pub wibo: String,
}

impl Default for ToolTags {
    fn default() -> Self {
        ToolTags {
            binutils: "2.42-1".to_string(),
            compilers: "20231018".to_string(),
            dtk: "v0.7.5".to_string(),
            sjiswrap: "v1.1.1".to_string(),
            wibo: "0.6.11".to_string(),
        }
    }
}

/// Warning toggles forwarded to the build graph generator.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub warn_missing_config: bool,
    pub warn_missing_source: bool,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics {
            warn_missing_config: true,
            warn_missing_source: false,
        }
    }
}

/// Options collected from the command line.
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    pub build_dir: PathBuf,
    pub tools: ToolPaths,
    pub generate_map: bool,
    pub include_assembly: bool,
    pub debug: bool,
    pub verbose: bool,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        ProjectOptions {
            build_dir: PathBuf::from("build"),
            tools: ToolPaths::default(),
            generate_map: true,
            include_assembly: true,
            debug: true,
            verbose: false,
        }
    }
}

/// The complete declarative build description for one release.
#[derive(Debug, Serialize)]
pub struct ProjectConfig {
    pub version: Version,
    pub build_dir: PathBuf,
    pub config_path: PathBuf,
    pub check_sha_path: PathBuf,
    pub tools: ToolPaths,
    pub tags: ToolTags,
    pub linker_version: String,
    pub asflags: FlagLayer,
    pub ldflags: FlagLayer,
    pub libraries: Vec<Library>,
    pub diagnostics: Diagnostics,
    pub generate_map: bool,
    pub include_assembly: bool,
    pub debug: bool,
    pub verbose: bool,
}

impl ProjectConfig {
    /// Assemble the configuration for `selected`.
    ///
    /// All-or-nothing: any declaration inconsistency (duplicate names,
    /// impossible structural edit, conflicting per-object flags) fails the
    /// whole build description.
    pub fn assemble(
        registry: &VersionRegistry,
        selected: Version,
        options: ProjectOptions,
    ) -> Result<Self> {
        let flags = FlagSet::compose(registry, selected, options.debug);
        let assembler = LibraryAssembler::new(registry, selected, &flags, LINKER_VERSION);
        let libraries = layout::link_order(&assembler)?;
        validate_uniqueness(&libraries)?;

        let config_dir = PathBuf::from("config").join(selected.name());

        Ok(ProjectConfig {
            version: selected,
            build_dir: options.build_dir,
            config_path: config_dir.join("config.yml"),
            check_sha_path: config_dir.join("build.sha1"),
            tools: options.tools,
            tags: ToolTags::default(),
            linker_version: LINKER_VERSION.to_string(),
            asflags: flags::assembler_flags(selected),
            ldflags: flags::linker_flags(),
            libraries,
            diagnostics: Diagnostics::default(),
            generate_map: options.generate_map,
            include_assembly: options.include_assembly,
            debug: options.debug,
            verbose: options.verbose,
        })
    }
}

/// Reject duplicate library names and duplicate object paths within a
/// library.
fn validate_uniqueness(libraries: &[Library]) -> Result<()> {
    let mut names = HashSet::new();
    for library in libraries {
        if !names.insert(library.name.as_str()) {
            return Err(ConfigError::DuplicateLibrary {
                name: library.name.clone(),
            });
        }
        let mut paths = HashSet::new();
        for object in &library.objects {
            if !paths.insert(object.path.as_str()) {
                return Err(ConfigError::DuplicateObject {
                    library: library.name.clone(),
                    path: object.path.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Profile;
    use crate::object::{Object, MATCHING};

    fn assemble(version: &str) -> ProjectConfig {
        let registry = VersionRegistry::new();
        let selected = registry.resolve(version).unwrap();
        ProjectConfig::assemble(&registry, selected, ProjectOptions::default()).unwrap()
    }

    fn core_paths(config: &ProjectConfig) -> Vec<String> {
        config
            .libraries
            .iter()
            .find(|l| l.name == "Core")
            .unwrap()
            .objects
            .iter()
            .map(|o| o.path.clone())
            .collect()
    }

    #[test]
    fn extended_release_keeps_all_core_objects() {
        let config = assemble("CE-P");
        let paths = core_paths(&config);
        assert_eq!(paths.len(), 8);
        assert!(paths.contains(&"emulator/Core/xlText.c".to_string()));
        assert!(paths.contains(&"emulator/Core/xlFile.c".to_string()));
    }

    #[test]
    fn non_extended_releases_drop_the_extra_core_objects() {
        for version in ["MQ-J", "MQ-U", "CE-J", "CE-U"] {
            let config = assemble(version);
            let paths = core_paths(&config);
            assert_eq!(paths.len(), 6, "wrong core size for {version}");
            assert!(!paths.contains(&"emulator/Core/xlText.c".to_string()));
            assert!(!paths.contains(&"emulator/Core/xlFile.c".to_string()));
        }
    }

    #[test]
    fn lowercase_version_alias_builds_the_same_config() {
        let registry = VersionRegistry::new();
        let canonical = registry.resolve("CE-U").unwrap();
        let alias = registry.resolve("ce-u").unwrap();
        assert_eq!(canonical, alias);

        let config = assemble("ce-u");
        assert_eq!(config.version.name(), "CE-U");
        assert_eq!(config.config_path, PathBuf::from("config/CE-U/config.yml"));
    }

    #[test]
    fn per_version_paths_use_the_canonical_name() {
        let config = assemble("MQ-U");
        assert_eq!(config.config_path, PathBuf::from("config/MQ-U/config.yml"));
        assert_eq!(
            config.check_sha_path,
            PathBuf::from("config/MQ-U/build.sha1")
        );
    }

    #[test]
    fn defaults_mirror_the_script_surface() {
        let config = assemble("MQ-J");
        assert_eq!(config.build_dir, PathBuf::from("build"));
        assert!(config.generate_map);
        assert!(config.include_assembly);
        assert!(config.debug);
        assert!(config.diagnostics.warn_missing_config);
        assert!(!config.diagnostics.warn_missing_source);
        assert_eq!(config.linker_version, "GC/1.1");
        assert_eq!(config.tags.compilers, "20231018");
    }

    #[test]
    fn uniqueness_validation_rejects_duplicate_libraries() {
        let registry = VersionRegistry::new();
        let selected = registry.default_version();
        let flags = FlagSet::compose(&registry, selected, true);
        let assembler = LibraryAssembler::new(&registry, selected, &flags, LINKER_VERSION);

        let lib = |name: &str| {
            assembler
                .runtime(name, vec![Object::new(MATCHING, "amcstubs/AmcExi2Stubs.c")])
                .unwrap()
        };
        let err = validate_uniqueness(&[lib("amcstubs"), lib("amcstubs")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLibrary { ref name } if name == "amcstubs"));
    }

    #[test]
    fn uniqueness_validation_rejects_duplicate_object_paths() {
        let registry = VersionRegistry::new();
        let selected = registry.default_version();
        let flags = FlagSet::compose(&registry, selected, true);
        let assembler = LibraryAssembler::new(&registry, selected, &flags, LINKER_VERSION);

        let library = assembler
            .runtime(
                "odenotstub",
                vec![
                    Object::new(MATCHING, "odenotstub/odenotstub.c"),
                    Object::new(MATCHING, "odenotstub/odenotstub.c"),
                ],
            )
            .unwrap();
        let err = validate_uniqueness(std::slice::from_ref(&library)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateObject { ref path, .. } if path == "odenotstub/odenotstub.c"
        ));
    }

    #[test]
    fn unknown_mode_error_echoes_the_value() {
        let err = "bogus".parse::<Mode>().unwrap_err();
        assert!(err.to_string().contains("bogus"));
        assert_eq!("configure".parse::<Mode>().unwrap(), Mode::Configure);
        assert_eq!("progress".parse::<Mode>().unwrap(), Mode::Progress);
    }

    #[test]
    fn release_build_switches_the_define_branch() {
        let registry = VersionRegistry::new();
        let selected = registry.default_version();
        let options = ProjectOptions {
            debug: false,
            ..ProjectOptions::default()
        };
        let config = ProjectConfig::assemble(&registry, selected, options).unwrap();
        let core = config.libraries.iter().find(|l| l.name == "Core").unwrap();
        assert!(core.flags.iter().any(|f| f == "-DNDEBUG=1"));
        assert!(!core.flags.iter().any(|f| f == "-DDEBUG=1"));
    }

    #[test]
    fn simulator_libraries_use_the_runtime_profile_layer() {
        let registry = VersionRegistry::new();
        let selected = registry.default_version();
        let config =
            ProjectConfig::assemble(&registry, selected, ProjectOptions::default()).unwrap();
        let expected = FlagSet::compose(&registry, selected, true);
        let core = config.libraries.iter().find(|l| l.name == "Core").unwrap();
        assert_eq!(core.flags, *expected.layer(Profile::Runtime));
    }
}
