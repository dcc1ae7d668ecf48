//! Viewer errors

use lumen_dom::NodeId;
use lumen_script::ScriptError;

/// Viewer error
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("JavaScript is disabled for this page")]
    ScriptingDisabled,

    #[error("No element at ({x}, {y})")]
    NoTarget { x: f32, y: f32 },

    #[error("{0} is not connected to the document")]
    Disconnected(NodeId),
}
