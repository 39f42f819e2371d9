//! Configuration model for the Fire emulator decompilation build.
//!
//! Models the declarative build description of a binary-matching project:
//! which releases of the original image exist, how compiler flag layers are
//! composed per release, and which translation units belong to which
//! link-time library with what matching status. The resulting
//! [`ProjectConfig`] is consumed by the build graph generator or the
//! progress reporter; this crate itself performs no I/O.

pub mod error;
pub mod flags;
pub mod layout;
pub mod library;
pub mod object;
pub mod project;
pub mod version;

pub use error::{ConfigError, Result};
pub use flags::{FlagLayer, FlagSet, Profile};
pub use library::{Library, LibraryAssembler};
pub use object::{MatchingRule, Object, ResolvedObject};
pub use project::{Diagnostics, Mode, ProjectConfig, ProjectOptions, ToolPaths, ToolTags};
pub use version::{Version, VersionRegistry};
