//! Indented text sink for generated code.

/// Accumulates generated source with a running indentation level.
///
/// Every line written through [`line`](Self::line) or
/// [`block`](Self::block) is prefixed with the current indentation; text
/// passed to [`raw`](Self::raw) is appended as is.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    buf: String,
    indent_unit: String,
    level: usize,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new("\t")
    }
}

impl CodeWriter {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            buf: String::new(),
            indent_unit: indent_unit.into(),
            level: 0,
        }
    }

    /// Empty writer sharing this writer's indentation unit.
    pub fn fork(&self) -> Self {
        Self::new(self.indent_unit.clone())
    }

    /// Write one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.write_indent();
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    /// Write a possibly multi-line snippet, indenting each non-empty line.
    pub fn block(&mut self, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                self.buf.push('\n');
            } else {
                self.line(line);
            }
        }
    }

    /// Append text verbatim.
    pub fn raw(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    fn write_indent(&mut self) {
        for _ in 0..self.level {
            self.buf.push_str(&self.indent_unit);
        }
    }
}
