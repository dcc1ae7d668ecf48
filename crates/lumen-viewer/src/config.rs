//! Viewer configuration

use lumen_script::ScriptConfig;

/// Page configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Run `<script>` blocks and dispatch events
    pub enable_javascript: bool,

    /// Script runtime settings
    pub script: ScriptConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_javascript: true,
            script: ScriptConfig::default(),
        }
    }
}
