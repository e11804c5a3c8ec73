//! Clipboard access for copy actions.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Mutex;

use log::{debug, warn};

use crate::error::{ElecMateError, Result};
use crate::notice::Notice;

/// Somewhere copied text can go
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Pipes text into an external command such as `wl-copy` or `xclip`
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Parse a whitespace-separated command line, e.g. `xclip -selection clipboard`
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| ElecMateError::Clipboard("No clipboard command configured".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        debug!("Copying {} bytes via {}", text.len(), self.program);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ElecMateError::Clipboard(format!("Failed to spawn {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(ElecMateError::Clipboard(format!("Failed to write to {}: {}", self.program, e)));
            }
        }

        let status = child
            .wait()
            .map_err(|e| ElecMateError::Clipboard(format!("{} did not finish: {}", self.program, e)))?;
        if !status.success() {
            return Err(ElecMateError::Clipboard(format!("{} exited with {}", self.program, status)));
        }
        Ok(())
    }
}

/// In-process clipboard, used by tests and when no command is available
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|e| ElecMateError::Clipboard(e.to_string()))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}

/// Copy once and describe the outcome. Failures are logged, never retried.
pub fn copy_with_notice(clipboard: &dyn Clipboard, text: &str, what: &str) -> Notice {
    match clipboard.write_text(text) {
        Ok(()) => Notice::success(format!("{} copied to clipboard", what)),
        Err(e) => {
            warn!("Copy of {} failed: {}", what, e);
            Notice::error(format!("Failed to copy {}", what.to_lowercase()))
        }
    }
}
