//! Script errors

use crate::token::Span;
use lumen_dom::DomError;

/// Script error
///
/// Every failure is recoverable: the caller decides whether to abort the
/// current script block or carry on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("Lex error at {span}: {message}")]
    Lex { message: String, span: Span },

    #[error("Syntax error at {span}: {message}")]
    Syntax { message: String, span: Span },

    #[error("ReferenceError: {0} is not defined")]
    UndefinedVariable(String),

    #[error("TypeError: {0}")]
    Type(String),

    #[error("Host error: {0}")]
    Host(#[from] DomError),

    #[error("Host error: document is busy")]
    DocumentBusy,

    #[error("RangeError: maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
}

impl ScriptError {
    pub(crate) fn syntax(message: impl Into<String>, span: Span) -> Self {
        ScriptError::Syntax { message: message.into(), span }
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        ScriptError::Type(message.into())
    }

    /// Whether this error was raised before evaluation started
    pub fn is_compile_error(&self) -> bool {
        matches!(self, ScriptError::Lex { .. } | ScriptError::Syntax { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ScriptError::UndefinedVariable("y".into());
        assert_eq!(err.to_string(), "ReferenceError: y is not defined");

        let err = ScriptError::syntax("expected ')'", Span::new(3, 4));
        assert_eq!(err.to_string(), "Syntax error at 3..4: expected ')'");
        assert!(err.is_compile_error());
    }
}
