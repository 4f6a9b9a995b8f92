use std::fmt;

use crate::FormatConfig;

/// A [`fmt::Write`] adapter that indents every non-empty line.
///
/// Text written through the adapter uses `\n` as its line terminator; the
/// writer translates it to the configured newline and inserts the current
/// indentation lazily, right before the first character of a line. Blank
/// lines therefore never carry trailing whitespace.
pub struct CodeWriter<'a> {
    out: &'a mut dyn fmt::Write,
    indent_unit: String,
    newline: &'static str,
    level: usize,
    at_line_start: bool,
}

impl<'a> CodeWriter<'a> {
    pub fn new(out: &'a mut dyn fmt::Write, config: &FormatConfig) -> Self {
        Self {
            out,
            indent_unit: config.indent_unit(),
            newline: config.newline.as_str(),
            level: 0,
            at_line_start: true,
        }
    }

    /// A writer into `out` with the same indent unit, starting at level zero
    /// and ending lines with `\n`.
    ///
    /// Used to render a fragment that is post-processed before being written
    /// back through `self`.
    pub fn detached<'b>(&self, out: &'b mut dyn fmt::Write) -> CodeWriter<'b> {
        CodeWriter {
            out,
            indent_unit: self.indent_unit.clone(),
            newline: "\n",
            level: 0,
            at_line_start: true,
        }
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    /// Extra unindents are ignored.
    pub fn unindent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    pub fn newline(&mut self) -> fmt::Result {
        self.at_line_start = true;
        self.out.write_str(self.newline)
    }

    /// Terminate the current line unless nothing has been written on it yet.
    pub fn finish_line(&mut self) -> fmt::Result {
        if self.at_line_start {
            Ok(())
        } else {
            self.newline()
        }
    }

    fn write_line_fragment(&mut self, fragment: &str) -> fmt::Result {
        if fragment.is_empty() {
            return Ok(());
        }
        if self.at_line_start {
            for _ in 0..self.level {
                self.out.write_str(&self.indent_unit)?;
            }
            self.at_line_start = false;
        }
        self.out.write_str(fragment)
    }
}

impl fmt::Write for CodeWriter<'_> {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.write_line_fragment(first)?;
        }
        for line in lines {
            self.newline()?;
            self.write_line_fragment(line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CodeWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeWriter")
            .field("level", &self.level)
            .field("at_line_start", &self.at_line_start)
            .finish_non_exhaustive()
    }
}
