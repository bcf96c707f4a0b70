//=========================================================================
// Scaffold Errors
//=========================================================================
//
// Error taxonomy shared by every subsystem.
//
// InvalidPath and TemplateNotFound abort a single request synchronously.
// SceneLoadFailed is reported through the scene-load completion channel.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::view::ViewKind;

//=== Result ==============================================================

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, ScaffoldError>;

//=== ScaffoldError =======================================================

/// Errors surfaced by path resolution, view creation and scene loading.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Container path is empty or contains no usable segment.
    #[error("invalid container path `{0}`")]
    InvalidPath(String),

    /// No asset is registered for the requested view or overlay.
    #[error("no template found for {kind:?} `{name}`")]
    TemplateNotFound { kind: ViewKind, name: String },

    /// The host reported that a scene could not be loaded.
    #[error("scene `{scene}` failed to load: {reason}")]
    SceneLoadFailed { scene: String, reason: String },

    /// Configuration could not be encoded or decoded.
    #[error("configuration format error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScaffoldError {
    pub(crate) fn template_not_found(kind: ViewKind, name: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            kind,
            name: name.into(),
        }
    }
}

//=== Tests ===============================================================
