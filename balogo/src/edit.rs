//! The `edit` subcommand: line commands on stdin drive a [`LogoSession`].

use anyhow::Context;
use balogo_rs::{CommandClipboard, InputEvent, LogoRenderer, LogoSession, OffsetField, Toggle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    Input(InputEvent),
    Save(Option<PathBuf>),
    Copy,
    Quit,
}

/// Parse one line of input. Blank lines parse to `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<EditCommand>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim(), ""),
    };

    let command = match word {
        "" => return Ok(None),
        "left" | "right" | "second" | "fonts" => EditCommand::Input(InputEvent::TextInput {
            field: word.parse()?,
            value: rest.to_string(),
        }),
        "compose" => EditCommand::Input(InputEvent::CompositionStart(rest.trim().parse()?)),
        "commit" => {
            let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
            EditCommand::Input(InputEvent::CompositionEnd {
                field: field.parse()?,
                value: value.to_string(),
            })
        }
        "toggle" => {
            let mut parts = rest.split_whitespace();
            let toggle: Toggle = parts.next().unwrap_or_default().parse()?;
            let enabled = match parts.next() {
                Some("on") => true,
                Some("off") => false,
                other => {
                    return Err(format!(
                        "expected 'on' or 'off' after toggle {}, got {:?}",
                        toggle,
                        other.unwrap_or("")
                    ))
                }
            };
            EditCommand::Input(InputEvent::Toggle { toggle, enabled })
        }
        "graph-x" | "graph-y" | "text2-x" | "text2-y" => {
            let field: OffsetField = word.parse()?;
            EditCommand::Input(InputEvent::Offset {
                field,
                raw: rest.to_string(),
            })
        }
        "save" => {
            let dir = rest.trim();
            EditCommand::Save((!dir.is_empty()).then(|| PathBuf::from(dir)))
        }
        "copy" => EditCommand::Copy,
        "quit" | "exit" => EditCommand::Quit,
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(command))
}

/// Run the session until `quit` or end of input.
pub async fn run(
    mut session: LogoSession<LogoRenderer>,
    preview: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut clipboard: Option<CommandClipboard> = None;

    let ok = session.redraw();
    after_redraw(&session, ok, preview.as_deref());

    loop {
        let deadline = session.next_deadline();
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = sleep_until(deadline), if deadline.is_some() => {
                if session.poll(Instant::now()) {
                    after_redraw(&session, session.error_banner().is_none(), preview.as_deref());
                }
                continue;
            }
        };

        let Some(line) = line else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        };

        match command {
            EditCommand::Input(event) => {
                if session.handle(event, Instant::now()) {
                    after_redraw(&session, session.error_banner().is_none(), preview.as_deref());
                }
            }
            EditCommand::Save(dir) => {
                let dir = dir.unwrap_or_else(|| PathBuf::from("."));
                // Failures are already logged by the session.
                if let Ok(path) = session.save(&dir) {
                    println!("saved {}", path.display());
                }
            }
            EditCommand::Copy => {
                if clipboard.is_none() {
                    match CommandClipboard::detect() {
                        Ok(found) => clipboard = Some(found),
                        Err(err) => {
                            log::error!(target: "clipboard", "can't copy: {}", err);
                            continue;
                        }
                    }
                }
                if let Some(sink) = clipboard.as_mut() {
                    if session.copy(sink, Instant::now()).is_ok() {
                        println!("copied");
                    }
                }
            }
            EditCommand::Quit => break,
        }
    }

    // Flush edits still waiting on their debounce.
    while let Some(deadline) = session.next_deadline() {
        if session.poll(deadline) {
            after_redraw(&session, session.error_banner().is_none(), preview.as_deref());
        }
    }
    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    if let Some(deadline) = deadline {
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
    }
}

/// Report the outcome of a redraw and refresh the preview file.
fn after_redraw(session: &LogoSession<LogoRenderer>, ok: bool, preview: Option<&Path>) {
    if !ok {
        if let Some(banner) = session.error_banner() {
            eprintln!("error: {}", banner);
        }
        return;
    }
    let Some(preview) = preview else {
        return;
    };
    match session.export() {
        Ok(image) => {
            if let Err(err) = image.write_to(preview) {
                log::error!("Failed to write preview {}: {}", preview.display(), err);
            } else {
                log::debug!("Preview updated: {}x{}", image.width, image.height);
            }
        }
        Err(err) => log::error!("Failed to export preview: {}", err),
    }
}
