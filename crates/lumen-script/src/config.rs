//! Runtime configuration

/// Script runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Maximum nesting of script function calls, listeners included
    pub max_call_depth: usize,
    /// Maximum syntactic nesting of a script: parentheses, blocks, function
    /// literals and member/call/equality chains
    pub max_nesting_depth: usize,
}

/// Nesting accepted by [`crate::parse_source`]
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 256,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}
