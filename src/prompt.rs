use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::SchemeViolation;
use crate::scheme::{MainHeader, SchemeInput, SubComponent};

/// Line-oriented prompts over any reader and writer. Drives the scheme
/// builder from a terminal with `PromptInput::stdio()`.
pub struct PromptInput<R, W> {
    reader: R,
    writer: W,
}

impl PromptInput<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Prompt user with a message and return trimmed input
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.writer, "{}", message).context("Failed to write prompt")?;
        self.writer.flush().context("Failed to flush stdout")?;
        let mut input = String::new();
        let read = self
            .reader
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input ended before the scheme was complete");
        }
        Ok(input.trim().to_string())
    }

    /// Prompt user with a yes/no question. Returns bool based on input and default.
    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?;
        let input = input.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    /// Prompt until the answer parses as a number
    fn prompt_number<T: FromStr>(&mut self, message: &str) -> Result<T> {
        loop {
            let input = self.prompt(&format!("{}: ", message))?;
            match input.parse() {
                Ok(n) => return Ok(n),
                Err(_) => self.say(&format!("  '{}' is not a whole number.", input))?,
            }
        }
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line).context("Failed to write output")
    }
}

impl<R: BufRead, W: Write> SchemeInput for PromptInput<R, W> {
    fn exam_weight(&mut self) -> Result<Option<u32>> {
        if self.prompt_yes_no("Does the course have a final exam?", true)? {
            Ok(Some(self.prompt_number("Exam weight (%)")?))
        } else {
            Ok(None)
        }
    }

    fn main_count(&mut self) -> Result<usize> {
        self.prompt_number("Number of other main components")
    }

    fn main_header(&mut self, index: usize, remaining: u32) -> Result<MainHeader> {
        self.say(&format!(
            "Main component {} ({}% left to allocate)",
            index + 1,
            remaining
        ))?;
        let name = self.prompt("  Name: ")?;
        let weight = self.prompt_number("  Weight (%)")?;
        let sub_count = self.prompt_number("  Number of sub-components")?;
        Ok(MainHeader {
            name,
            weight,
            sub_count,
        })
    }

    fn sub_components(&mut self, parent: &str, count: usize) -> Result<Vec<SubComponent>> {
        self.say(&format!("Sub-components of {} (weights must total 100)", parent))?;
        let mut subs = Vec::with_capacity(count);
        for i in 0..count {
            let name = self.prompt(&format!("  Sub-component {} name: ", i + 1))?;
            let weight = self.prompt_number(&format!("  Sub-component {} weight (%)", i + 1))?;
            subs.push(SubComponent::new(name, weight));
        }
        Ok(subs)
    }

    fn rejected(&mut self, violation: &SchemeViolation) -> Result<()> {
        self.say(&format!("  Rejected: {}", violation))
    }
}
