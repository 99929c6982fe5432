//! Copying exported PNGs to the system clipboard.

use crate::error::{LogoError, LogoResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Destination for a copied image.
pub trait ClipboardSink {
    fn write_png(&mut self, png: &[u8]) -> LogoResult<()>;
}

/// Pipes PNG bytes into an external clipboard tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `wl-copy` under Wayland, `xclip` otherwise, whichever is on `PATH`.
    pub fn detect() -> LogoResult<Self> {
        let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
        let wl_copy = find_on_path("wl-copy").map(|p| {
            Self::new(p, vec!["--type".to_string(), "image/png".to_string()])
        });
        let xclip = find_on_path("xclip").map(|p| {
            Self::new(
                p,
                ["-selection", "clipboard", "-t", "image/png", "-i"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            )
        });

        let found = if wayland {
            wl_copy.or(xclip)
        } else {
            xclip.or(wl_copy)
        };
        found.ok_or_else(|| {
            LogoError::Clipboard("no clipboard tool found, install wl-copy or xclip".to_string())
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ClipboardSink for CommandClipboard {
    fn write_png(&mut self, png: &[u8]) -> LogoResult<()> {
        // wl-copy forks a daemon that keeps the clipboard alive, so only the
        // exit status of the tool itself is waited on.
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                LogoError::Clipboard(format!("failed to start {}: {}", self.program.display(), err))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(png) {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(LogoError::Clipboard(format!(
                    "failed to write to {}: {}",
                    self.program.display(),
                    err
                )));
            }
            // Close stdin so the tool sees end of input.
            drop(stdin);
        }
        let status = child
            .wait()
            .map_err(|err| LogoError::Clipboard(err.to_string()))?;
        if !status.success() {
            return Err(LogoError::Clipboard(format!(
                "{} exited with {}",
                self.program.display(),
                status
            )));
        }
        Ok(())
    }
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn pipes_bytes_to_command() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.png");
        let mut sink = CommandClipboard::new(
            "sh",
            vec!["-c".to_string(), format!("cat > '{}'", out.display())],
        );
        sink.write_png(b"\x89PNG fake").unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"\x89PNG fake");
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_clipboard_error() {
        let mut sink = CommandClipboard::new("sh", vec!["-c".to_string(), "exit 3".to_string()]);
        assert!(matches!(
            sink.write_png(b"png"),
            Err(LogoError::Clipboard(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn lingering_background_child_does_not_block() {
        let mut sink = CommandClipboard::new(
            "sh",
            vec![
                "-c".to_string(),
                "cat > /dev/null; (sleep 5 >&2 &); exit 0".to_string(),
            ],
        );
        let start = std::time::Instant::now();
        sink.write_png(b"\x89PNG fake").unwrap();
        assert!(start.elapsed() < std::time::Duration::from_secs(3));
    }

    #[cfg(unix)]
    #[test]
    fn tool_that_ignores_stdin_is_reaped() {
        let mut sink = CommandClipboard::new("sh", vec!["-c".to_string(), "exit 0".to_string()]);
        // Larger than a pipe buffer, so the write hits a closed pipe.
        let png = vec![0u8; 1 << 20];
        let start = std::time::Instant::now();
        let result = sink.write_png(&png);
        assert!(matches!(result, Ok(()) | Err(LogoError::Clipboard(_))));
        assert!(start.elapsed() < std::time::Duration::from_secs(3));
    }

    #[test]
    fn missing_program_is_clipboard_error() {
        let mut sink = CommandClipboard::new("/no/such/clipboard-tool", Vec::new());
        assert!(matches!(
            sink.write_png(b"png"),
            Err(LogoError::Clipboard(_))
        ));
    }
}
