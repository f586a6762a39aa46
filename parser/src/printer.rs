//! Line-oriented console output.

use std::io::{self, IsTerminal, Write};

use colored::Colorize;

use crate::help::HelpPage;

/// Pads `text` with trailing spaces to `width` characters.
///
/// # Examples
///
/// ```
/// use command_args::pad_to;
///
/// assert_eq!(pad_to("ab", 4), "ab  ");
/// assert_eq!(pad_to("abcdef", 4), "abcdef");
/// ```
pub fn pad_to(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

/// Writes help and error text to a sink, optionally styled.
///
/// Styling (bold red error lines) is only applied when enabled; the
/// standard stream constructors enable it when the stream is a terminal.
/// [`Printer::buffer`] captures plain text for composing or testing.
pub struct Printer<W: Write> {
    out: W,
    styled: bool,
}

impl Printer<io::Stdout> {
    pub fn stdout() -> Self {
        let styled = io::stdout().is_terminal();
        Self::new(io::stdout(), styled)
    }
}

impl Printer<io::Stderr> {
    pub fn stderr() -> Self {
        let styled = io::stderr().is_terminal();
        Self::new(io::stderr(), styled)
    }
}

impl Printer<Vec<u8>> {
    /// Unstyled in-memory printer.
    pub fn buffer() -> Self {
        Self::new(Vec::new(), false)
    }

    /// Captured text.
    pub fn into_string(self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, styled: bool) -> Self {
        Self { out, styled }
    }

    /// Overrides terminal detection.
    pub fn with_style(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Writes `text` followed by a newline.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    /// Writes `text` without a trailing newline.
    pub fn text(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Writes an error line, bold red when styled.
    pub fn error(&mut self, text: &str) -> io::Result<()> {
        if self.styled {
            writeln!(self.out, "{}", text.red().bold())
        } else {
            self.line(text)
        }
    }

    /// Writes a help page; the error line, if any, follows a blank line.
    pub fn help(&mut self, page: &HelpPage) -> io::Result<()> {
        for line in page.body_lines() {
            self.line(&line)?;
        }
        if let Some(error) = &page.error {
            self.line("")?;
            self.error(error)?;
        }
        self.out.flush()
    }
}
