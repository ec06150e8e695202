use crate::core::Confirm;
use crate::utils::error::Result;
use std::io::{BufRead, Write};
use tokio::runtime::{Handle, RuntimeFlavor};

/// Only `yes` and `y` count, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

/// Writes `prompt` and the question, then reads one line. EOF reads as "no".
pub fn ask<R: BufRead, W: Write>(mut input: R, mut output: W, prompt: &str) -> Result<bool> {
    writeln!(output, "{}", prompt)?;
    writeln!(output)?;
    write!(output, "Continue? (yes/no): ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

/// Runs a blocking closure. On a multi-thread runtime the worker is handed
/// over with `block_in_place` so other tasks keep running.
fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// Blocks on the controlling terminal until a line is entered.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        run_blocking(|| {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            ask(stdin.lock(), stdout.lock(), prompt)
        })
    }
}

/// Fixed answer, for tests and scripted runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirm(pub bool);

impl Confirm for FixedConfirm {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_affirmative_answers() {
        for answer in ["YES", "Yes", " yes ", "y", "Y\n", "yes\r\n"] {
            assert!(is_affirmative(answer), "{answer:?} should proceed");
        }
    }

    #[test]
    fn test_other_answers_cancel() {
        for answer in ["", "no", "maybe", "n", "yess", "y e s"] {
            assert!(!is_affirmative(answer), "{answer:?} should cancel");
        }
    }

    #[test]
    fn test_ask_writes_prompt_and_reads_line() {
        let mut output = Vec::new();
        let proceed = ask(Cursor::new("Yes\n"), &mut output, "Import 3 members?").unwrap();

        assert!(proceed);
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.starts_with("Import 3 members?"));
        assert!(printed.ends_with("Continue? (yes/no): "));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_read_leaves_runtime_responsive() {
        let ticker = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        });

        let proceed = run_blocking(|| {
            std::thread::sleep(std::time::Duration::from_millis(50));
            ask(Cursor::new("y\n"), Vec::new(), "Import?")
        })
        .unwrap();

        assert!(proceed);
        assert!(ticker.await.is_ok());
    }

    #[tokio::test]
    async fn test_blocking_read_on_current_thread_runtime() {
        let proceed = run_blocking(|| ask(Cursor::new("no\n"), Vec::new(), "Import?")).unwrap();
        assert!(!proceed);
    }

    #[test]
    fn test_ask_treats_eof_as_no() {
        let proceed = ask(Cursor::new(""), Vec::new(), "Import?").unwrap();
        assert!(!proceed);
    }
}
