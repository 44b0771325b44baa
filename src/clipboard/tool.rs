//! CopyTool trait and its error type.

use super::result::CopyMethod;

/// A tool that can put text on the system clipboard.
pub trait CopyTool: Send + Sync {
    fn method(&self) -> CopyMethod;

    /// Human-readable name for error messages.
    fn name(&self) -> &'static str {
        self.method().name()
    }

    /// Whether the tool can be used on this system. Should be fast.
    fn is_available(&self) -> bool;

    fn try_copy_text(&self, text: &str) -> Result<(), CopyToolError>;
}

/// Error from a single tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyToolError {
    /// Tool execution failed
    Failed(String),
    /// Tool not found on system
    NotFound,
}
