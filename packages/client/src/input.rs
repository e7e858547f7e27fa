//! Local line input.
//!
//! `rustyline` blocks the calling thread, so lines are read on a dedicated OS thread
//! and handed to the async side through an unbounded channel. Awaiting that channel
//! is a cancellable suspension point; the thread notices the receiver is gone the
//! next time it tries to hand over a line and exits without prompting again.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// Result of one blocking read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl+C
    Interrupted,
    /// Ctrl+D
    Eof,
    Failed(String),
}

/// Blocking source of input lines.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> ReadOutcome;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> ReadOutcome {
        match self.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.add_history_entry(line.as_str()).ok();
                }
                ReadOutcome::Line(line)
            }
            Err(ReadlineError::Interrupted) => ReadOutcome::Interrupted,
            Err(ReadlineError::Eof) => ReadOutcome::Eof,
            Err(e) => ReadOutcome::Failed(e.to_string()),
        }
    }
}

/// Read lines from `source` and forward them verbatim until the input ends or the
/// receiving side is gone.
///
/// Returns the number of lines forwarded.
pub fn pump_lines<S: LineSource>(
    source: &mut S,
    prompt: &str,
    lines: &mpsc::UnboundedSender<String>,
) -> usize {
    let mut forwarded = 0;
    loop {
        match source.read_line(prompt) {
            ReadOutcome::Line(line) => {
                if lines.send(line).is_err() {
                    // Receiver dropped: the input loop was cancelled
                    break;
                }
                forwarded += 1;
            }
            ReadOutcome::Interrupted => {
                tracing::info!("Interrupted");
                break;
            }
            ReadOutcome::Eof => {
                tracing::info!("EOF");
                break;
            }
            ReadOutcome::Failed(e) => {
                tracing::error!("Readline error: {}", e);
                break;
            }
        }
    }
    forwarded
}

/// Start the input thread and return the receiving end of its lines.
///
/// The channel closes when the user exits with Ctrl+C / Ctrl+D.
pub fn spawn_line_reader(prompt: String) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };
        pump_lines(&mut editor, &prompt, &tx);
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays scripted outcomes and counts prompts.
    struct ScriptedSource {
        outcomes: VecDeque<ReadOutcome>,
        prompts: usize,
    }

    impl ScriptedSource {
        fn new(outcomes: impl IntoIterator<Item = ReadOutcome>) -> Self {
            Self {
                outcomes: outcomes.into_iter().collect(),
                prompts: 0,
            }
        }
    }

    impl LineSource for ScriptedSource {
        fn read_line(&mut self, _prompt: &str) -> ReadOutcome {
            self.prompts += 1;
            self.outcomes.pop_front().unwrap_or(ReadOutcome::Eof)
        }
    }

    fn line(text: &str) -> ReadOutcome {
        ReadOutcome::Line(text.to_string())
    }

    #[test]
    fn test_lines_are_forwarded_verbatim() {
        // テスト項目: 入力行が加工されずにそのまま転送される
        // given (前提条件):
        let mut source = ScriptedSource::new([line("  hello "), line(""), ReadOutcome::Eof]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let forwarded = pump_lines(&mut source, "> ", &tx);

        // then (期待する結果):
        assert_eq!(forwarded, 2);
        assert_eq!(rx.try_recv().unwrap(), "  hello ");
        assert_eq!(rx.try_recv().unwrap(), "");
    }

    #[test]
    fn test_interrupt_stops_reading() {
        // テスト項目: Ctrl+C で読み込みが終了する
        // given (前提条件):
        let mut source = ScriptedSource::new([ReadOutcome::Interrupted, line("never")]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let forwarded = pump_lines(&mut source, "> ", &tx);

        // then (期待する結果):
        assert_eq!(forwarded, 0);
        assert_eq!(source.prompts, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_no_further_prompt_after_receiver_dropped() {
        // テスト項目: 受信側が破棄された後は、読み込み中の行を最後に再プロンプトしない
        // given (前提条件):
        let mut source = ScriptedSource::new([line("late"), line("later")]);
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        drop(rx);

        // when (操作):
        let forwarded = pump_lines(&mut source, "> ", &tx);

        // then (期待する結果):
        assert_eq!(forwarded, 0);
        assert_eq!(source.prompts, 1);
    }

    #[test]
    fn test_read_failure_stops_reading() {
        // テスト項目: 読み込みエラーで終了する
        // given (前提条件):
        let mut source = ScriptedSource::new([
            line("first"),
            ReadOutcome::Failed("terminal gone".to_string()),
        ]);
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let forwarded = pump_lines(&mut source, "> ", &tx);

        // then (期待する結果):
        assert_eq!(forwarded, 1);
        assert_eq!(source.prompts, 2);
    }
}
