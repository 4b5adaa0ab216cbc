//! Template compilation and response errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while compiling a template or writing a response.
///
/// Include failures nest: the outermost error names the directive in the
/// root file, its `cause` the directive one level down, and so on, so the
/// rendered message reads as the full reference chain.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read `{0}`: {1}")]
    Load(PathBuf, io::Error),

    // NOTE: `cause` is not marked #[source]; it is already part of the message
    #[error("error including {name}: {cause}")]
    Include {
        name: String,
        cause: Box<TemplateError>,
    },

    #[error("circular include: {chain}")]
    CircularInclude { chain: String },

    #[error("include depth limit ({limit}) exceeded at `{path}`")]
    TooDeep { limit: usize, path: PathBuf },

    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write response: {0}")]
    Write(#[from] io::Error),
}

impl TemplateError {
    /// Wrap `self` as the failure of directive `name`.
    pub fn included_from(self, name: impl Into<String>) -> Self {
        Self::Include {
            name: name.into(),
            cause: Box::new(self),
        }
    }

    /// Innermost error of an include chain.
    #[cfg(test)]
    pub fn root_cause(&self) -> &TemplateError {
        match self {
            Self::Include { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}
