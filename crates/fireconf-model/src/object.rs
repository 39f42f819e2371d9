//! Translation unit descriptors and matching status rules.
//!
//! An object's matching status records whether its compiled output is
//! byte-identical to the corresponding region of the shipped binary. The
//! status may depend on which release is selected, so it is declared as a
//! small rule and resolved to a concrete boolean during assembly. A
//! non-matching object is still compiled; the status only gates the
//! progress and diff expectation.

use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::flags::FlagLayer;
use crate::version::{Version, VersionRegistry};

/// How an object's matching status is decided once a release is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchingRule {
    /// The same status in every release.
    Always(bool),
    /// Matching only in releases strictly newer than the named release.
    NewerThan(&'static str),
    /// Matching only when the named release is selected.
    OnlyIn(&'static str),
    /// Matching in every release except the named one.
    ExceptIn(&'static str),
}

/// Shorthand used by the link-order table.
pub const MATCHING: MatchingRule = MatchingRule::Always(true);
/// Shorthand used by the link-order table.
pub const NON_MATCHING: MatchingRule = MatchingRule::Always(false);

impl MatchingRule {
    /// Resolve the rule against the selected release.
    ///
    /// Pure: the result depends only on the rule, the catalog, and the
    /// selection. Fails only if the rule names an unregistered release.
    pub fn resolve(&self, registry: &VersionRegistry, selected: Version) -> Result<bool> {
        Ok(match self {
            MatchingRule::Always(matching) => *matching,
            MatchingRule::NewerThan(name) => selected.ordinal() > registry.resolve(name)?.ordinal(),
            MatchingRule::OnlyIn(name) => selected == registry.resolve(name)?,
            MatchingRule::ExceptIn(name) => selected != registry.resolve(name)?,
        })
    }
}

/// One translation unit as declared in the link-order table.
#[derive(Debug, Clone)]
pub struct Object {
    /// Source path, unique within its library.
    pub path: &'static str,
    /// Matching status rule.
    pub matching: MatchingRule,
    /// Replaces the library's flag layer for this object.
    pub flag_override: Option<Vec<&'static str>>,
    /// Appended to the library's flag layer for this object.
    pub extra_flags: Option<Vec<&'static str>>,
}

impl Object {
    pub const fn new(matching: MatchingRule, path: &'static str) -> Self {
        Object {
            path,
            matching,
            flag_override: None,
            extra_flags: None,
        }
    }

    /// Replace the library's flag layer for this object.
    pub fn with_flags(mut self, flags: &[&'static str]) -> Self {
        self.flag_override = Some(flags.to_vec());
        self
    }

    /// Append flags after the library's flag layer for this object.
    pub fn with_extra_flags(mut self, flags: &[&'static str]) -> Self {
        self.extra_flags = Some(flags.to_vec());
        self
    }

    /// Fix the object's matching status and effective flags for one release.
    ///
    /// `layer` is the flag layer of the enclosing library; `library` is its
    /// name, used in diagnostics. An object declaring both an override and
    /// extra flags is a declaration bug and fails fast.
    pub fn resolve(
        &self,
        registry: &VersionRegistry,
        selected: Version,
        layer: &FlagLayer,
        library: &str,
    ) -> Result<ResolvedObject> {
        let flags = match (&self.flag_override, &self.extra_flags) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingFlags {
                    library: library.to_string(),
                    path: self.path.to_string(),
                })
            }
            (Some(replacement), None) => FlagLayer::new(replacement.iter().copied()),
            (None, Some(extra)) => layer.extended(extra.iter().copied()),
            (None, None) => layer.clone(),
        };

        Ok(ResolvedObject {
            path: self.path.to_string(),
            matching: self.matching.resolve(registry, selected)?,
            flags,
        })
    }
}

/// A translation unit with status and flags fixed for the selected release.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedObject {
    pub path: String,
    pub matching: bool,
    pub flags: FlagLayer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags;

    fn registry() -> VersionRegistry {
        VersionRegistry::new()
    }

    #[test]
    fn literal_rules_ignore_the_selection() {
        let registry = registry();
        for selected in registry.iter() {
            assert!(MATCHING.resolve(&registry, selected).unwrap());
            assert!(!NON_MATCHING.resolve(&registry, selected).unwrap());
        }
    }

    #[test]
    fn newer_than_compares_strictly() {
        let registry = registry();
        let rule = MatchingRule::NewerThan("MQ-J");
        let mq_j = registry.resolve("MQ-J").unwrap();
        let mq_u = registry.resolve("MQ-U").unwrap();
        assert!(!rule.resolve(&registry, mq_j).unwrap());
        assert!(rule.resolve(&registry, mq_u).unwrap());
    }

    #[test]
    fn except_in_excludes_exactly_one_release() {
        let registry = registry();
        let rule = MatchingRule::ExceptIn("CE-P");
        let excluded: Vec<_> = registry
            .iter()
            .filter(|v| !rule.resolve(&registry, *v).unwrap())
            .collect();
        assert_eq!(excluded, [registry.extended()]);
    }

    #[test]
    fn resolution_is_repeatable() {
        let registry = registry();
        let rule = MatchingRule::OnlyIn("CE-U");
        for selected in registry.iter() {
            let first = rule.resolve(&registry, selected).unwrap();
            let second = rule.resolve(&registry, selected).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn rule_naming_unknown_release_fails() {
        let registry = registry();
        let rule = MatchingRule::NewerThan("MQ-X");
        let selected = registry.default_version();
        assert!(rule.resolve(&registry, selected).is_err());
    }

    #[test]
    fn override_replaces_the_library_layer() {
        let registry = registry();
        let layer = FlagLayer::new(["-a", "-b"]);
        let object = Object::new(MATCHING, "emulator/Core/xlHeap.c").with_flags(&["-c"]);
        let resolved = object
            .resolve(&registry, registry.default_version(), &layer, "Core")
            .unwrap();
        let flags: Vec<&str> = resolved.flags.iter().collect();
        assert_eq!(flags, ["-c"]);
    }

    #[test]
    fn extra_flags_append_to_the_library_layer() {
        let registry = registry();
        let layer = FlagLayer::new(["-a", "-b"]);
        let object =
            Object::new(MATCHING, "dolphin/mtx/mtx.c").with_extra_flags(&["-fp_contract off"]);
        let resolved = object
            .resolve(&registry, registry.default_version(), &layer, "mtx")
            .unwrap();
        let flags: Vec<&str> = resolved.flags.iter().collect();
        assert_eq!(flags, ["-a", "-b", "-fp_contract off"]);
    }

    #[test]
    fn override_and_extra_flags_conflict() {
        let registry = registry();
        let layer = flags::linker_flags();
        let object = Object::new(MATCHING, "emulator/Fire/rom.c")
            .with_flags(&["-x"])
            .with_extra_flags(&["-y"]);
        let err = object
            .resolve(&registry, registry.default_version(), &layer, "Fire")
            .unwrap_err();
        assert!(err.to_string().contains("emulator/Fire/rom.c"));
    }
}
