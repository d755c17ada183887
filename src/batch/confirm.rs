//! The yes/no gate shown before a batch touches any file.

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::path::PathBuf;

use crate::config::RunMode;
use crate::error::{RedactorError, RedactorResult};

const ANSWER_HINT: &str = "Type Y to continue and N to quit: ";

/// Asks the operator whether a run may proceed.
pub trait Confirmation {
    fn confirm(&mut self, prompt: &str) -> RedactorResult<bool>;
}

/// Answers yes without asking. Used for `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> RedactorResult<bool> {
        Ok(true)
    }
}

/// Prompts on a writer and reads the answer from a line reader.
///
/// Only `y` or `Y` (surrounding whitespace ignored) counts as yes; anything
/// else, including end of input, declines.
pub struct PromptConfirmation<R, W> {
    input: R,
    output: W,
}

/// Interactive confirmation on the terminal.
pub type StdinConfirmation = PromptConfirmation<StdinLock<'static>, Stdout>;

impl StdinConfirmation {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptConfirmation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirmation for PromptConfirmation<R, W> {
    fn confirm(&mut self, prompt: &str) -> RedactorResult<bool> {
        let stdio = |source| RedactorError::Io {
            path: PathBuf::from("<stdio>"),
            source,
        };

        write!(self.output, "\n{}\n\n{}", prompt, ANSWER_HINT).map_err(stdio)?;
        self.output.flush().map_err(stdio)?;

        let mut answer = String::new();
        self.input.read_line(&mut answer).map_err(stdio)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

/// Shows the prompt for `mode`; declining yields [`RedactorError::UserDeclined`].
pub fn require_confirmation(confirmation: &mut dyn Confirmation, mode: RunMode) -> RedactorResult<()> {
    if confirmation.confirm(mode.confirmation_prompt())? {
        Ok(())
    } else {
        Err(RedactorError::UserDeclined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answer: &str, mode: RunMode) -> (RedactorResult<()>, String) {
        let mut output = Vec::new();
        let result = {
            let mut prompt = PromptConfirmation::new(Cursor::new(answer.as_bytes()), &mut output);
            require_confirmation(&mut prompt, mode)
        };
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_proceeds() {
        let (result, shown) = ask("y\n", RunMode::Copy);
        assert!(result.is_ok());
        assert!(shown.contains("Redacted copies will be saved"));
        assert!(shown.ends_with(ANSWER_HINT));

        assert!(ask("  Y  \n", RunMode::Copy).0.is_ok());
    }

    #[test]
    fn test_anything_else_declines() {
        for answer in ["n\n", "yes\n", "\n", ""] {
            let (result, _) = ask(answer, RunMode::Replace);
            assert!(matches!(result, Err(RedactorError::UserDeclined)), "{answer:?}");
        }
    }

    #[test]
    fn test_replace_prompt_warns() {
        let (_, shown) = ask("n\n", RunMode::Replace);
        assert!(shown.contains("delete the originals"));
    }

    #[test]
    fn test_assume_yes() {
        assert!(require_confirmation(&mut AssumeYes, RunMode::Replace).is_ok());
    }
}
