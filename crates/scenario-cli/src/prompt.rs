//! Interactive overwrite confirmation on stdin

use scenario_batch::{OverwriteDecision, OverwritePrompt};
use std::io::{BufRead, Write};
use std::path::Path;

/// Asks on the terminal; end of input answers "no to all"
pub(crate) struct StdinPrompt<R> {
    input: R,
}

impl StdinPrompt<std::io::StdinLock<'static>> {
    pub(crate) fn new() -> Self {
        Self {
            input: std::io::stdin().lock(),
        }
    }
}

impl<R: BufRead> StdinPrompt<R> {
    #[cfg(test)]
    fn from_reader(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> OverwritePrompt for StdinPrompt<R> {
    fn decide(&mut self, path: &Path) -> OverwriteDecision {
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy())
            .unwrap_or_default();
        loop {
            print!("'{file}' already exists. Overwrite? [y]es / [n]o / [a]ll / n[o]ne: ");
            let _ = std::io::stdout().flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return OverwriteDecision::NoToAll,
                Ok(_) => {}
            }
            if let Some(decision) = parse_answer(&line) {
                return decision;
            }
        }
    }
}

fn parse_answer(line: &str) -> Option<OverwriteDecision> {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(OverwriteDecision::Yes),
        "n" | "no" => Some(OverwriteDecision::No),
        "a" | "all" | "yes to all" => Some(OverwriteDecision::YesToAll),
        "o" | "none" | "no to all" => Some(OverwriteDecision::NoToAll),
        _ => None,
    }
}
