//! Scene construction and configuration errors.

use thiserror::Error;

/// Errors produced while loading or validating a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Reading or writing a config file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for a scene
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The scene could not be written back out as TOML
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A color literal was not `#rrggbb` or `#rgb`
    #[error("invalid color literal {0:?}, expected #rrggbb or #rgb")]
    InvalidColor(String),

    /// A numeric scene parameter is out of range
    #[error("invalid {name}: {reason}")]
    InvalidParameter {
        /// Dotted path of the offending field
        name: String,
        /// What is wrong with it
        reason: String,
    },
}

impl SceneError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
