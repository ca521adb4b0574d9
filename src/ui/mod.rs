//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::domain::{BumpClass, ReleaseVersion};
use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_cleanup_instructions, display_current_version, display_dry_run, display_error,
    display_published, display_release_summary, display_rollback, display_status,
    display_success, display_warning,
};

/// Source of operator input
///
/// The workflow pauses at exactly two points: the bump class and the push
/// confirmation. Both go through this trait so they can be scripted in tests.
pub trait Prompter {
    /// Display `prompt` and read one line of input, without its line ending
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question; only `y` or `Y` confirms
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.read_line(&format!("{} (y/N): ", prompt))?;
        Ok(is_affirmative(&answer))
    }
}

/// Whether a confirmation answer is a yes
///
/// Only a single `y` (case-insensitive) counts; "yes", empty input and anything else decline.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Prompts for a bump class and validates it against the fixed set.
///
/// # Returns
/// * `Ok(BumpClass)` - A valid bump class
/// * `Err(ReleaseError::InvalidBumpClass)` - For anything else, including empty input
pub fn prompt_bump_class(
    prompter: &mut dyn Prompter,
    current: &ReleaseVersion,
) -> Result<BumpClass> {
    let answer = prompter.read_line(&format!(
        "\nBump type for {} [{}]: ",
        current,
        BumpClass::choices()
    ))?;
    BumpClass::parse(&answer)
}

/// Prompter reading from the terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;

        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Prompter answering from a fixed list, for tests and non-interactive use
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Prompts shown so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left").into()
        })
    }
}
