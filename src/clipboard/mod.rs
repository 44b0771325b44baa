//! Copy filtered output to the system clipboard.
//!
//! The clipboard is reached through whichever external tool the platform
//! provides (`pbcopy`, `xclip`, `xsel`, `wl-copy`). Each tool sits behind
//! the [`CopyTool`] trait so the orchestrator can be exercised with fakes.

mod copy;
mod error;
mod result;
mod tool;
pub mod tools;

pub use copy::Clipboard;
pub use error::ClipboardError;
pub use result::{CopyMethod, CopyResult};
pub use tool::{CopyTool, CopyToolError};

/// Copy `text` with the platform's tools.
pub fn copy_text(text: &str) -> Result<CopyResult, ClipboardError> {
    Clipboard::new().text(text)
}
