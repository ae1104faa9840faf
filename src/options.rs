//! Generation session settings.

/// Disclaimer written at the top of every generated artifact.
pub const DEFAULT_DISCLAIMER: &str = "This file is automatically generated, do not modify manually!";

/// Settings of a [`Generator`](crate::Generator) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Text of the disclaimer comment.
    pub disclaimer: String,
    /// System includes registered when the session starts.
    pub system_includes: Vec<String>,
    /// Append the bound function summary when finalizing.
    pub emit_summary: bool,
    /// Indentation unit of generated code.
    pub indent: String,
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self {
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
            system_includes: vec!["cstdint".to_string()],
            emit_summary: false,
            indent: "\t".to_string(),
        }
    }

    pub fn with_disclaimer<S: Into<String>>(mut self, disclaimer: S) -> Self {
        self.disclaimer = disclaimer.into();
        self
    }

    pub fn with_system_include<S: Into<String>>(mut self, path: S) -> Self {
        self.system_includes.push(path.into());
        self
    }

    /// Replace the default system includes.
    pub fn with_system_includes<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.system_includes = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_summary(mut self, emit_summary: bool) -> Self {
        self.emit_summary = emit_summary;
        self
    }

    pub fn with_indent<S: Into<String>>(mut self, indent: S) -> Self {
        self.indent = indent.into();
        self
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::new()
    }
}
