//! Copy orchestrator.

use super::error::ClipboardError;
use super::result::CopyResult;
use super::tool::{CopyTool, CopyToolError};
use super::tools::platform_tools;

/// Tries each available tool in priority order until one succeeds.
pub struct Clipboard {
    tools: Vec<Box<dyn CopyTool>>,
}

impl Clipboard {
    /// Create with platform-appropriate tools.
    pub fn new() -> Self {
        Self {
            tools: platform_tools(),
        }
    }

    /// Create with specific tools (for testing).
    pub fn with_tools(tools: Vec<Box<dyn CopyTool>>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[Box<dyn CopyTool>] {
        &self.tools
    }

    /// Copy `text`, reporting the tool that took it.
    ///
    /// When every available tool fails, the last failure is returned.
    pub fn text(&self, text: &str) -> Result<CopyResult, ClipboardError> {
        if self.tools.is_empty() {
            return Err(ClipboardError::UnsupportedPlatform);
        }

        let mut last_failure = None;
        for tool in self.tools.iter().filter(|tool| tool.is_available()) {
            match tool.try_copy_text(text) {
                Ok(()) => return Ok(CopyResult::new(tool.method(), text.len())),
                Err(CopyToolError::NotFound) => continue,
                Err(CopyToolError::Failed(message)) => {
                    tracing::debug!(tool = tool.name(), %message, "clipboard tool failed");
                    last_failure = Some(ClipboardError::ToolFailed {
                        tool: tool.name(),
                        message,
                    });
                }
            }
        }

        Err(last_failure.unwrap_or(ClipboardError::NoToolAvailable))
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}
