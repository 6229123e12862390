//! Prompt delivery: clipboard with confirmation, or plain stdout.
use std::io::{self, BufRead, Write};
use std::process::Stdio;

use digest_core::label_for_tokens;
use engine_logging::engine_debug;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("could not copy to clipboard: {0}")]
    Clipboard(String),
    #[error("could not read confirmation: {0}")]
    Confirm(io::Error),
    #[error("could not write output: {0}")]
    Output(#[from] io::Error),
}

#[async_trait::async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy(&self, text: &str) -> Result<(), DeliveryError>;
}

/// Clipboard backed by a platform copy command reading the text on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `"xclip -selection clipboard"` style command line, split on whitespace.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    /// Default copy command for the current platform.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", Vec::new())
        } else if cfg!(target_os = "windows") {
            Self::new("clip", Vec::new())
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy", Vec::new())
        } else {
            Self::new(
                "xclip",
                vec!["-selection".to_string(), "clipboard".to_string()],
            )
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait::async_trait]
impl Clipboard for CommandClipboard {
    async fn copy(&self, text: &str) -> Result<(), DeliveryError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| DeliveryError::Clipboard(format!("{}: {err}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|err| DeliveryError::Clipboard(err.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| DeliveryError::Clipboard(err.to_string()))?;
        if !output.status.success() {
            return Err(DeliveryError::Clipboard(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        engine_debug!("Copied {} chars via {}", text.chars().count(), self.program);
        Ok(())
    }
}

/// Blocks until the user is ready for the next clipboard write.
pub trait ConfirmSignal {
    fn wait(&mut self) -> io::Result<()>;
}

pub struct StdinConfirm;

impl ConfirmSignal for StdinConfirm {
    fn wait(&mut self) -> io::Result<()> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }
}

pub enum Delivery<'a> {
    /// Clipboard, pacing multi-prompt runs on the confirm signal.
    Interactive {
        clipboard: &'a dyn Clipboard,
        confirm: &'a mut dyn ConfirmSignal,
    },
    /// Every prompt written to the output stream.
    Batch,
}

/// A compiled prompt and its token count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountedPrompt {
    pub text: String,
    pub tokens: u32,
}

pub async fn deliver_prompts(
    prompts: &[CountedPrompt],
    total_tokens: u32,
    delivery: Delivery<'_>,
    out: &mut dyn Write,
) -> Result<(), DeliveryError> {
    let count = prompts.len();
    if count == 0 {
        return Ok(());
    }

    if let [single] = prompts {
        match delivery {
            Delivery::Interactive { clipboard, .. } => clipboard.copy(&single.text).await?,
            Delivery::Batch => {
                writeln!(out, "Prompt 1/1 ({})", describe(single.tokens))?;
                writeln!(out, "{}", single.text)?;
            }
        }
        return Ok(());
    }

    writeln!(
        out,
        "Total tokens: {} -> {}",
        total_tokens,
        label_for_tokens(total_tokens)
    )?;
    writeln!(out, "Generated prompts: {count}")?;

    match delivery {
        Delivery::Interactive { clipboard, confirm } => {
            for (index, prompt) in prompts.iter().enumerate() {
                let position = index + 1;
                writeln!(out, "Press [Enter] to copy prompt {position}/{count}")?;
                out.flush()?;
                confirm.wait().map_err(DeliveryError::Confirm)?;
                clipboard.copy(&prompt.text).await?;
                writeln!(
                    out,
                    "Copied prompt {position}/{count} ({})",
                    describe(prompt.tokens)
                )?;
            }
        }
        Delivery::Batch => {
            for (index, prompt) in prompts.iter().enumerate() {
                writeln!(
                    out,
                    "Prompt {}/{count} ({})",
                    index + 1,
                    describe(prompt.tokens)
                )?;
                writeln!(out, "{}", prompt.text)?;
            }
        }
    }
    Ok(())
}

fn describe(tokens: u32) -> String {
    format!("{tokens} tokens - {}", label_for_tokens(tokens))
}
