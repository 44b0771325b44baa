//! Platform clipboard tools.
//!
//! All of them take the text on stdin; they differ only in the program and
//! its arguments.

use super::result::CopyMethod;
use super::tool::{CopyTool, CopyToolError};
use std::io::Write;
use std::process::{Command, Stdio};

/// An external program that reads clipboard text from stdin.
pub struct PipeTool {
    method: CopyMethod,
    program: &'static str,
    args: &'static [&'static str],
}

impl PipeTool {
    /// macOS `pbcopy`.
    pub fn pbcopy() -> Self {
        Self {
            method: CopyMethod::Pbcopy,
            program: "pbcopy",
            args: &[],
        }
    }

    /// X11 `xclip -selection clipboard`.
    pub fn xclip() -> Self {
        Self {
            method: CopyMethod::Xclip,
            program: "xclip",
            args: &["-selection", "clipboard"],
        }
    }

    /// X11 `xsel --clipboard --input`.
    pub fn xsel() -> Self {
        Self {
            method: CopyMethod::Xsel,
            program: "xsel",
            args: &["--clipboard", "--input"],
        }
    }

    /// Wayland `wl-copy`.
    pub fn wl_copy() -> Self {
        Self {
            method: CopyMethod::WlCopy,
            program: "wl-copy",
            args: &[],
        }
    }

    pub fn program(&self) -> &'static str {
        self.program
    }

    pub fn args(&self) -> &'static [&'static str] {
        self.args
    }

    /// Check if the program is on PATH.
    fn program_exists(&self) -> bool {
        Command::new("which")
            .arg(self.program)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl CopyTool for PipeTool {
    fn method(&self) -> CopyMethod {
        self.method
    }

    fn is_available(&self) -> bool {
        match self.method {
            CopyMethod::Pbcopy => cfg!(target_os = "macos"),
            _ => cfg!(target_os = "linux") && self.program_exists(),
        }
    }

    fn try_copy_text(&self, text: &str) -> Result<(), CopyToolError> {
        let mut child = Command::new(self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CopyToolError::NotFound,
                _ => CopyToolError::Failed(e.to_string()),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| CopyToolError::Failed(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| CopyToolError::Failed(e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(CopyToolError::Failed(if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                stderr
            }))
        }
    }
}

/// The platform's tools in priority order.
pub fn platform_tools() -> Vec<Box<dyn CopyTool>> {
    #[cfg(target_os = "macos")]
    {
        vec![Box::new(PipeTool::pbcopy())]
    }

    #[cfg(target_os = "linux")]
    {
        vec![
            Box::new(PipeTool::xclip()),
            Box::new(PipeTool::xsel()),
            Box::new(PipeTool::wl_copy()),
        ]
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        vec![]
    }
}
