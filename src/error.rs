use thiserror::Error;

/// Errors raised while turning LDtk text into a scene graph.
///
/// Lookups that simply miss (unknown layer, tile outside the grid, ...)
/// are reported through `Option`, never through this type.
#[derive(Debug, Error)]
pub enum LdtkError {
    /// The project or level text is not a valid LDtk document.
    #[error("failed to parse {context}: {source}")]
    Json {
        /// What was being parsed (a path or "project").
        context: String,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
    /// The asset source could not produce the requested text resource.
    #[error("failed to load asset {path}: {message}")]
    Asset {
        /// Path handed to the asset source.
        path: String,
        /// Loader specific failure description.
        message: String,
    },
}

impl LdtkError {
    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        LdtkError::Json {
            context: context.into(),
            source,
        }
    }
}
