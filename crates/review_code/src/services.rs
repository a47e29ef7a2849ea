// crates/review_code/src/services.rs
//
// The chat runtime boundary. The analysis never talks to a terminal or a
// file directly; it goes through `ChatRuntime`, so each transport can be
// swapped or mocked.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::Message;

/// Printed between replies when several are written to one stream.
pub const REPLY_DIVIDER: &str = "--------------------------------------------------";

/// The three operations the turn logic needs from its host.
pub trait ChatRuntime {
    /// The full conversation so far. Empty means a fresh session.
    fn fetch_history(&mut self) -> Result<Vec<Message>>;

    /// Shows one reply to the user.
    fn send_reply(&mut self, text: &str) -> Result<()>;

    /// Hands control back to the user. Returns `Ok(false)` once no further
    /// input will arrive.
    fn request_user_input(&mut self) -> Result<bool>;
}

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to read transcript {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed transcript: {0}")]
    Json(#[from] serde_json::Error),
}

/// One-shot runtime over a saved transcript: a JSON array of
/// `{"role": ..., "content": ...}` objects.
pub struct TranscriptRuntime<W: Write> {
    history: Vec<Message>,
    output: W,
    replies_sent: usize,
}

impl<W: Write> TranscriptRuntime<W> {
    pub fn new(history: Vec<Message>, output: W) -> Self {
        Self {
            history,
            output,
            replies_sent: 0,
        }
    }

    pub fn from_reader(reader: impl Read, output: W) -> Result<Self, TranscriptError> {
        let history: Vec<Message> = serde_json::from_reader(reader)?;
        Ok(Self::new(history, output))
    }

    pub fn from_path(path: &Path, output: W) -> Result<Self, TranscriptError> {
        let file = File::open(path).map_err(|source| TranscriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), output)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<W: Write> ChatRuntime for TranscriptRuntime<W> {
    fn fetch_history(&mut self) -> Result<Vec<Message>> {
        Ok(self.history.clone())
    }

    fn send_reply(&mut self, text: &str) -> Result<()> {
        if self.replies_sent > 0 {
            writeln!(self.output, "{}", REPLY_DIVIDER).context("Failed to write reply")?;
        }
        writeln!(self.output, "{}", text).context("Failed to write reply")?;
        self.output.flush().context("Failed to flush reply")?;
        self.replies_sent += 1;
        Ok(())
    }

    fn request_user_input(&mut self) -> Result<bool> {
        Ok(false)
    }
}

/// Line-based terminal session. The history lives in memory for as long as
/// the session runs.
pub struct InteractiveRuntime<R: BufRead, W: Write> {
    history: Vec<Message>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveRuntime<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            history: Vec::new(),
            input,
            output,
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads one user message. A message ends at a blank line outside an
    /// open fence, or at end of input. Returns `None` if nothing was read.
    fn read_message(&mut self) -> Result<Option<String>> {
        let mut lines: Vec<String> = Vec::new();
        let mut in_fence = false;
        let mut buf = String::new();

        loop {
            buf.clear();
            let read = self
                .input
                .read_line(&mut buf)
                .context("Failed to read user input")?;
            if read == 0 {
                break;
            }
            let line = buf.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() && !in_fence {
                if lines.is_empty() {
                    continue;
                }
                break;
            }
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
            }
            lines.push(line.to_string());
        }

        if lines.is_empty() {
            Ok(None)
        } else {
            Ok(Some(lines.join("\n")))
        }
    }
}

impl<R: BufRead, W: Write> ChatRuntime for InteractiveRuntime<R, W> {
    fn fetch_history(&mut self) -> Result<Vec<Message>> {
        Ok(self.history.clone())
    }

    fn send_reply(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}\n", text).context("Failed to write reply")?;
        self.output.flush().context("Failed to flush reply")?;
        self.history.push(Message::assistant(text));
        Ok(())
    }

    fn request_user_input(&mut self) -> Result<bool> {
        match self.read_message()? {
            Some(message) => {
                log::debug!("received message ({} bytes)", message.len());
                self.history.push(Message::user(message));
                Ok(true)
            }
            None => {
                log::debug!("end of input");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{run_session, Role, GREETING, NO_CODE_PROMPT};
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn output_of(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn transcript_runtime_writes_divider_between_replies() {
        let history = vec![Message::user(
            "```\ndef a():\n    pass\n```\n```\ndef b():\n    pass\n```",
        )];
        let mut runtime = TranscriptRuntime::new(history, Vec::new());
        run_session(&mut runtime).unwrap();
        let out = output_of(runtime.into_output());
        assert_eq!(out.matches(REPLY_DIVIDER).count(), 1);
        let (first, second) = out.split_once(REPLY_DIVIDER).unwrap();
        assert!(first.contains("- a (Line 1)"));
        assert!(second.contains("- b (Line 1)"));
    }

    #[test]
    fn transcript_runtime_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"role": "user", "content": "hello"}}]"#).unwrap();
        let mut runtime = TranscriptRuntime::from_path(file.path(), Vec::new()).unwrap();
        run_session(&mut runtime).unwrap();
        let out = output_of(runtime.into_output());
        assert_eq!(out.trim_end(), NO_CODE_PROMPT);
    }

    #[test]
    fn transcript_runtime_missing_file() {
        let err = TranscriptRuntime::from_path(Path::new("/no/such/transcript.json"), Vec::new())
            .err()
            .unwrap();
        assert!(matches!(err, TranscriptError::Io { .. }));
        assert!(err.to_string().contains("failed to read transcript"));
    }

    #[test]
    fn transcript_runtime_malformed_json() {
        let err = TranscriptRuntime::from_reader(Cursor::new("{not json"), Vec::new())
            .err()
            .unwrap();
        assert!(matches!(err, TranscriptError::Json(_)));
    }

    #[test]
    fn interactive_message_ends_at_blank_line_outside_fence() {
        let input = "\n\nfirst line\n```\ncode\n\nmore code\n```\n\nsecond message\n";
        let mut runtime = InteractiveRuntime::new(Cursor::new(input), Vec::new());
        assert!(runtime.request_user_input().unwrap());
        assert!(runtime.request_user_input().unwrap());
        assert!(!runtime.request_user_input().unwrap());
        let contents: Vec<&str> = runtime
            .history()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(
            contents,
            vec!["first line\n```\ncode\n\nmore code\n```", "second message"]
        );
    }

    #[test]
    fn interactive_session_greets_then_reviews() {
        let input = "```python\ndef foo():\n    pass\n```\n";
        let mut runtime = InteractiveRuntime::new(Cursor::new(input), Vec::new());
        run_session(&mut runtime).unwrap();

        let roles: Vec<Role> = runtime.history().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);

        let out = output_of(runtime.into_output());
        assert!(out.starts_with(GREETING));
        assert!(out.contains("- foo (Line 1)"));
    }
}
