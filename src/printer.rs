//! Line-oriented output for the formatter (§6's `Printer` collaborator
//! interface): writing text, tracking indentation scopes, and optional
//! ANSI styling. Grounded in `mergiraf`'s use of `nu_ansi_term::Color` for
//! its own diagnostic output, generalized here into an explicit trait so
//! the formatter can be driven by either a plain or colorized backend
//! without knowing which.

use std::fmt::Write as _;

use nu_ansi_term::Color;

/// The style role a chunk of printed text plays, used by [`Printer::write_styled`]
/// to decide a color without the formatter hard-coding ANSI codes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Unchanged content, printed plainly.
    Plain,
    /// Content present only in the "from" tree.
    Removed,
    /// Content present only in the "to" tree.
    Inserted,
    /// Structural furniture (brackets, commas, keys) that frames content
    /// without itself having been edited.
    Frame,
}

/// The printer collaborator interface (§6): `write`, `newline`,
/// `indent`/`dedent` scopes, and optional ANSI styling.
pub trait Printer {
    fn write(&mut self, text: &str);
    fn write_styled(&mut self, text: &str, emphasis: Emphasis);
    fn newline(&mut self);
    fn indent(&mut self);
    fn dedent(&mut self);
    fn finish(self) -> String
    where
        Self: Sized;
}

const INDENT_WIDTH: usize = 2;

/// Renders with no ANSI codes at all -- used for `--no-color` and for
/// output piped to a file.
#[derive(Debug, Default)]
pub struct PlainPrinter {
    buf: String,
    depth: usize,
    at_line_start: bool,
}

impl PlainPrinter {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            depth: 0,
            at_line_start: true,
        }
    }

    fn write_indent_if_needed(&mut self) {
        if self.at_line_start {
            for _ in 0..self.depth * INDENT_WIDTH {
                self.buf.push(' ');
            }
            self.at_line_start = false;
        }
    }
}

impl Printer for PlainPrinter {
    fn write(&mut self, text: &str) {
        self.write_indent_if_needed();
        let _ = write!(self.buf, "{text}");
    }

    fn write_styled(&mut self, text: &str, _emphasis: Emphasis) {
        self.write(text);
    }

    fn newline(&mut self) {
        self.buf.push('\n');
        self.at_line_start = true;
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// Renders with ANSI colors: red for removed content, green for inserted
/// content, and a dim style for structural framing, matching the
/// "optional ANSI styling (fg/bg/bold)" and "bright mode" language of §6.
/// `bright` selects the light variant of each color, mirroring the
/// `Color::LightPurple`/`Color::LightCyan` choices `mergiraf`'s own
/// diagnostics make for secondary emphasis.
#[derive(Debug)]
pub struct AnsiPrinter {
    inner: PlainPrinter,
    bright: bool,
}

impl AnsiPrinter {
    pub fn new(bright: bool) -> Self {
        Self {
            inner: PlainPrinter::new(),
            bright,
        }
    }

    fn color_for(&self, emphasis: Emphasis) -> Option<Color> {
        match emphasis {
            Emphasis::Plain => None,
            Emphasis::Removed => Some(if self.bright { Color::LightRed } else { Color::Red }),
            Emphasis::Inserted => Some(if self.bright { Color::LightGreen } else { Color::Green }),
            Emphasis::Frame => Some(Color::DarkGray),
        }
    }
}

impl Printer for AnsiPrinter {
    fn write(&mut self, text: &str) {
        self.inner.write(text);
    }

    fn write_styled(&mut self, text: &str, emphasis: Emphasis) {
        self.inner.write_indent_if_needed();
        match self.color_for(emphasis) {
            Some(color) => {
                let styled = color.paint(text).to_string();
                let _ = write!(self.inner.buf, "{styled}");
            }
            None => {
                let _ = write!(self.inner.buf, "{text}");
            }
        }
    }

    fn newline(&mut self) {
        self.inner.newline();
    }

    fn indent(&mut self) {
        self.inner.indent();
    }

    fn dedent(&mut self) {
        self.inner.dedent();
    }

    fn finish(self) -> String {
        self.inner.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_printer_indents_each_new_line() {
        let mut p = PlainPrinter::new();
        p.write("a");
        p.indent();
        p.newline();
        p.write("b");
        p.dedent();
        p.newline();
        p.write("c");
        assert_eq!(p.finish(), "a\n  b\nc");
    }

    #[test]
    fn plain_printer_ignores_emphasis() {
        let mut p = PlainPrinter::new();
        p.write_styled("x", Emphasis::Removed);
        assert_eq!(p.finish(), "x");
    }

    #[test]
    fn ansi_printer_wraps_removed_text_in_escapes() {
        let mut p = AnsiPrinter::new(false);
        p.write_styled("x", Emphasis::Removed);
        let out = p.finish();
        assert!(out.contains('x'));
        assert!(out.len() > 1, "styled output should carry ANSI escapes");
    }

    #[test]
    fn ansi_printer_dedent_does_not_underflow() {
        let mut p = AnsiPrinter::new(true);
        p.dedent();
        p.write("ok");
        assert_eq!(p.finish(), "ok");
    }
}
