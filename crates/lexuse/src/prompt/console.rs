//! Line-based console prompter.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::error::{LexUseError, Result};

use super::{Prompter, Verdict};

/// Prompter reading answers line by line from `R` and writing to `W`.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<StdinLock<'static>, Stdout> {
    /// Prompter on the process stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    /// Create a prompter over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt).map_err(io_error)?;
        self.output.flush().map_err(io_error)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(io_error)?;
        if read == 0 {
            return Err(LexUseError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn println(&mut self, message: &str) {
        // Output failures surface on the next read.
        let _ = writeln!(self.output, "{}", message);
    }
}

fn io_error(e: io::Error) -> LexUseError {
    LexUseError::Io {
        path: "<console>".into(),
        source: e,
    }
}

/// First character of an answer, lowercased.
fn initial(answer: &str) -> Option<char> {
    answer.chars().next().map(|c| c.to_ascii_lowercase())
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        loop {
            let answer = self.ask(&format!("{} [Y/n]: ", message))?;
            match initial(&answer) {
                None | Some('y') => return Ok(true),
                Some('n') => return Ok(false),
                Some(_) => continue,
            }
        }
    }

    fn review(&mut self, message: &str) -> Result<Verdict> {
        loop {
            let answer = self.ask(&format!("{} [(Y)es/(n)o/(s)kip this form]: ", message))?;
            match initial(&answer) {
                None | Some('y') => return Ok(Verdict::Accept),
                Some('n') => return Ok(Verdict::Reject),
                Some('s') => return Ok(Verdict::Skip),
                Some(_) => continue,
            }
        }
    }

    fn choose(&mut self, message: &str, options: &[String]) -> Result<Option<usize>> {
        let mut menu = message.to_string();
        for (i, option) in options.iter().enumerate() {
            menu.push_str(&format!("\n{}) {}", i + 1, option));
        }
        menu.push_str("\nPlease input a number or 0 to cancel: ");

        loop {
            let answer = self.ask(&menu)?;
            match answer.parse::<i64>() {
                Ok(choice) if choice >= 1 && (choice as usize) <= options.len() => {
                    return Ok(Some(choice as usize - 1));
                }
                Ok(_) => return Ok(None),
                Err(_) => self.println("Sorry, I didn't understand that."),
            }
        }
    }

    fn say(&mut self, message: &str) {
        self.println(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> ConsolePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_confirm_empty_means_yes() {
        let mut p = prompter("\n");
        assert!(p.confirm("Continue?").unwrap());
    }

    #[test]
    fn test_confirm_loops_on_garbage() {
        let mut p = prompter("maybe\nNo\n");
        assert!(!p.confirm("Continue?").unwrap());
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("[Y/n]").count(), 2);
    }

    #[test]
    fn test_review_answers() {
        let mut p = prompter("y\nn\nskip\n\n");
        assert_eq!(p.review("Ok?").unwrap(), Verdict::Accept);
        assert_eq!(p.review("Ok?").unwrap(), Verdict::Reject);
        assert_eq!(p.review("Ok?").unwrap(), Verdict::Skip);
        assert_eq!(p.review("Ok?").unwrap(), Verdict::Accept);
    }

    #[test]
    fn test_choose_reprompts_on_non_numeric() {
        let options = vec!["a bank (finance)".to_string(), "a river bank".to_string()];
        let mut p = prompter("two\n2\n");
        assert_eq!(p.choose("Pick", &options).unwrap(), Some(1));

        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("1) a bank (finance)"));
        assert!(out.contains("2) a river bank"));
        assert!(out.contains("Sorry, I didn't understand that."));
    }

    #[test]
    fn test_choose_zero_and_out_of_range_cancel() {
        let options = vec!["only".to_string()];
        let mut p = prompter("0\n7\n");
        assert_eq!(p.choose("Pick", &options).unwrap(), None);
        assert_eq!(p.choose("Pick", &options).unwrap(), None);
    }

    #[test]
    fn test_eof_is_input_closed() {
        let mut p = prompter("");
        assert!(matches!(p.confirm("Continue?"), Err(LexUseError::InputClosed)));
    }
}
