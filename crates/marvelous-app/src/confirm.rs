//! Yes/no confirmation capability used before destructive operations.

use std::io::{self, BufRead, Write};

/// Something that can ask the user a yes/no question.
pub trait Confirm {
    /// Ask `message` and return `true` only on an explicit yes.
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Fixed answer, for non-interactive callers such as `purge --yes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assume(pub bool);

impl Confirm for Assume {
    fn confirm(&mut self, _message: &str) -> bool {
        self.0
    }
}

/// Prompt on a line-oriented reader/writer pair, defaulting to "no".
#[derive(Debug)]
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    /// Prompt on arbitrary streams.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, message: &str) -> io::Result<bool> {
        write!(self.output, "{message} [y/N]: ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;

        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

impl<R: BufRead, W: Write> Confirm for StdinPrompt<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        // Unreadable input counts as a refusal.
        self.ask(message).unwrap_or(false)
    }
}
