//! Line-oriented prompts on a reader/writer pair.
//!
//! Invalid integers are reported and asked for again; running out of input
//! is an error.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::bail;
use matsum::{Cell, Matrix};

use crate::config::Mode;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Ask until the first token of a line parses as `T`.
    pub fn integer<T: FromStr>(&mut self, prompt: &str) -> anyhow::Result<T> {
        let mut line = String::new();
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                bail!("unexpected end of input at prompt {:?}", prompt.trim_end());
            }

            match line.split_whitespace().next().map(str::parse::<T>) {
                Some(Ok(value)) => return Ok(value),
                _ => writeln!(self.output, "Invalid input. Please enter a valid integer.")?,
            }
        }
    }

    pub fn size(&mut self) -> anyhow::Result<usize> {
        loop {
            let n: i64 = self.integer("Enter the size of the matrix (N): ")?;
            match usize::try_from(n) {
                Ok(n) if n > 0 => return Ok(n),
                _ => {}
            }
            writeln!(self.output, "Invalid input. Please enter a number greater than 0.")?;
        }
    }

    pub fn workers(&mut self, size: usize) -> anyhow::Result<usize> {
        let prompt = format!("Enter number of threads to use (1 to {size}): ");
        loop {
            let w: i64 = self.integer(&prompt)?;
            match usize::try_from(w) {
                Ok(w) if (1..=size).contains(&w) => return Ok(w),
                _ => writeln!(
                    self.output,
                    "Invalid input. Please enter a number greater than 0 and less than or equal to {size}."
                )?,
            }
        }
    }

    pub fn mode(&mut self) -> anyhow::Result<Mode> {
        let option: i64 = self.integer(
            "Choose input mode:\n1. Manual input\n2. Random generation\nEnter option (1 or 2): ",
        )?;
        match option {
            1 => Ok(Mode::Manual),
            2 => Ok(Mode::Random),
            _ => bail!("Invalid option {option}. Exiting."),
        }
    }

    pub fn matrix(&mut self, size: usize) -> anyhow::Result<Matrix> {
        writeln!(self.output, "Enter the matrix elements:")?;
        let mut matrix = Matrix::zeros(size)?;
        for i in 0..size {
            for j in 0..size {
                let value: Cell = self.integer(&format!("Element ({i}, {j}): "))?;
                matrix.set(i, j, value);
            }
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn test_reprompts_on_garbage() {
        let mut p = prompter("abc\n\n  12 trailing\n");
        assert_eq!(p.integer::<i64>("> ").unwrap(), 12);
        let text = transcript(p);
        assert_eq!(text.matches("Invalid input. Please enter a valid integer.").count(), 2);
        assert_eq!(text.matches("> ").count(), 3);
    }

    #[test]
    fn test_size_must_be_positive() {
        let mut p = prompter("0\n-4\n3\n");
        assert_eq!(p.size().unwrap(), 3);
        assert_eq!(transcript(p).matches("greater than 0.").count(), 2);
    }

    #[test]
    fn test_workers_bounded_by_size() {
        let mut p = prompter("0\n5\n4\n");
        assert_eq!(p.workers(4).unwrap(), 4);
        assert!(transcript(p).contains("less than or equal to 4."));
    }

    #[test]
    fn test_mode_options() {
        assert_eq!(prompter("1\n").mode().unwrap(), Mode::Manual);
        assert_eq!(prompter("2\n").mode().unwrap(), Mode::Random);
        assert!(prompter("3\n").mode().is_err());
    }

    #[test]
    fn test_manual_entry_rejects_out_of_range_cells() {
        let mut p = prompter("1\n99999999999\n2\n3\n4\n");
        let m = p.matrix(2).unwrap();
        assert_eq!(m.sequential_sum(), 10);
        assert!(transcript(p).contains("Element (1, 1): "));
    }

    #[test]
    fn test_eof_is_error() {
        assert!(prompter("").integer::<i64>("> ").is_err());
    }
}
