use std::io::{self, Write};

/// The interactive-confirmation seam consulted before a new store is created on disk.
///
/// A default stdin/stderr implementation is provided; tests and non-interactive embeddings
/// substitute [`AutoConfirm`] or their own implementation instead.
pub trait Console: Send + Sync {
    /// Presents `prompt` to the operator and returns their raw response line.
    fn prompt(&self, prompt: &str) -> io::Result<String>;

    /// Writes a diagnostic line, independent of the `log` facade.
    fn log(&self, message: &str) {
        eprintln!("{}", message);
    }

    /// Asks the operator to confirm an action; `y`/`Y`-prefixed responses are consent.
    fn confirm(&self, prompt: &str) -> io::Result<bool> {
        let answer = self.prompt(prompt)?;
        Ok(answer.trim_start().starts_with(['y', 'Y']))
    }
}

/// Reads confirmation from stdin, prompting on stderr.
pub struct StdConsole;

impl Console for StdConsole {
    fn prompt(&self, prompt: &str) -> io::Result<String> {
        eprint!("{}", prompt);
        io::stderr().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line)
    }
}

/// Always answers "yes" without touching stdin; for tests and non-interactive embeddings.
pub struct AutoConfirm;

impl Console for AutoConfirm {
    fn prompt(&self, _prompt: &str) -> io::Result<String> {
        Ok("y".to_owned())
    }

    fn log(&self, _message: &str) {}
}
