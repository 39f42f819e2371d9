//! Error types for configuration assembly.

/// Errors that can occur while building a project configuration.
///
/// All of these indicate a bad declaration or bad input; none are
/// recoverable. Configuration assembly is all-or-nothing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Requested version is not in the release catalog.
    #[error("unknown version: '{requested}'")]
    UnknownVersion {
        /// The name that failed to resolve.
        requested: String,
    },

    /// Requested mode is not one of the supported modes.
    #[error("unknown mode: '{requested}'")]
    UnknownMode {
        /// The offending mode string.
        requested: String,
    },

    /// A structural edit needed more objects than the library declares.
    #[error("library '{library}': cannot remove object at position {index}, list has {len} objects")]
    StructuralAssembly {
        /// Name of the library whose declaration is too short.
        library: String,
        /// The removal position that was out of range.
        index: usize,
        /// Length of the list at the time of the failed removal.
        len: usize,
    },

    /// Two libraries share the same name.
    #[error("duplicate library name: '{name}'")]
    DuplicateLibrary {
        /// The colliding name.
        name: String,
    },

    /// Two objects within one library share the same source path.
    #[error("library '{library}': duplicate object path: '{path}'")]
    DuplicateObject {
        /// The library containing the collision.
        library: String,
        /// The colliding source path.
        path: String,
    },

    /// An object declares both a flag override and extra flags.
    #[error("library '{library}': object '{path}' declares both a flag override and extra flags")]
    ConflictingFlags {
        /// The library containing the object.
        library: String,
        /// The offending object's source path.
        path: String,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
