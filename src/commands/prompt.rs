use crate::errors::{DistributorError, Result};
use console::{Style, Term};
use std::fmt::Display;
use std::str::FromStr;

/// Invalid answers are re-asked this many times before giving up.
const MAX_ATTEMPTS: usize = 5;

/// Line-oriented operator input.
pub trait LineReader {
    fn show(&mut self, line: &str) -> Result<()>;
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Reads answers from the controlling terminal.
pub struct TermReader {
    term: Term,
}

impl TermReader {
    pub fn new() -> Self {
        TermReader { term: Term::stdout() }
    }
}

impl Default for TermReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader for TermReader {
    fn show(&mut self, line: &str) -> Result<()> {
        self.term.write_line(line)?;
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.term
            .write_str(&format!("{} ", Style::new().cyan().bold().apply_to(question)))?;
        Ok(self.term.read_line()?.trim().to_string())
    }
}

/// Numbered list selection. Returns the index of the chosen entry.
pub fn select<R, T>(reader: &mut R, question: &str, choices: &[T]) -> Result<usize>
where
    R: LineReader + ?Sized,
    T: Display,
{
    if choices.is_empty() {
        return Err(DistributorError::InvalidInput(format!("Nothing to choose for: {}", question)));
    }
    reader.show(question)?;
    for (index, choice) in choices.iter().enumerate() {
        reader.show(&format!("  {}) {}", index + 1, choice))?;
    }

    for _ in 0..MAX_ATTEMPTS {
        let answer = reader.ask(&format!("Choice [1-{}]:", choices.len()))?;
        match answer.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
            _ => reader.show(&format!("Please enter a number between 1 and {}.", choices.len()))?,
        }
    }
    Err(DistributorError::InvalidInput(format!("No valid choice given for: {}", question)))
}

/// Parses the answer as `T` and re-asks until `validate` accepts it.
pub fn input<R, T, V>(reader: &mut R, question: &str, validate: V) -> Result<T>
where
    R: LineReader + ?Sized,
    T: FromStr,
    V: Fn(&T) -> std::result::Result<(), String>,
{
    for _ in 0..MAX_ATTEMPTS {
        let answer = reader.ask(question)?;
        match answer.parse::<T>() {
            Ok(value) => match validate(&value) {
                Ok(()) => return Ok(value),
                Err(reason) => reader.show(&reason)?,
            },
            Err(_) => reader.show(&format!("'{}' is not a valid value.", answer))?,
        }
    }
    Err(DistributorError::InvalidInput(format!("No valid answer given for: {}", question)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned answers and records everything shown.
    #[derive(Default)]
    pub(crate) struct ScriptedReader {
        answers: VecDeque<String>,
        pub shown: Vec<String>,
    }

    impl ScriptedReader {
        pub(crate) fn new(answers: &[&str]) -> Self {
            ScriptedReader {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                shown: Vec::new(),
            }
        }
    }

    impl LineReader for ScriptedReader {
        fn show(&mut self, line: &str) -> Result<()> {
            self.shown.push(line.to_string());
            Ok(())
        }

        fn ask(&mut self, question: &str) -> Result<String> {
            self.shown.push(question.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| DistributorError::InvalidInput("script exhausted".to_string()))
        }
    }

    #[test]
    fn test_select_retries_until_in_range() {
        let mut reader = ScriptedReader::new(&["0", "abc", "2"]);
        let index = select(&mut reader, "Pick one", &["a", "b"]).unwrap();
        assert_eq!(index, 1);
        assert!(reader.shown.iter().any(|l| l.contains("between 1 and 2")));
    }

    #[test]
    fn test_select_gives_up_after_repeated_garbage() {
        let mut reader = ScriptedReader::new(&["x"; MAX_ATTEMPTS]);
        assert!(select(&mut reader, "Pick one", &["a"]).is_err());
    }

    #[test]
    fn test_input_applies_validation() {
        let mut reader = ScriptedReader::new(&["-1", "2.5"]);
        let value: f64 = input(&mut reader, "Amount:", |v: &f64| {
            if *v > 0.0 { Ok(()) } else { Err("Amount must be positive".to_string()) }
        })
        .unwrap();
        assert_eq!(value, 2.5);
        assert!(reader.shown.contains(&"Amount must be positive".to_string()));
    }
}
