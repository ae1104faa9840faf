//! Type expression parsing.
//!
//! Grammar:
//!
//! ```text
//! type      := 'const'? ('signed' | 'unsigned')? qualified ref-suffix?
//! arg       := type IDENT?
//! qualified := '::'? IDENT ('::' IDENT)*
//! ref-suffix:= ('&' | '*')+
//! IDENT     := [A-Za-z_][A-Za-z0-9_]*
//! ```
//!
//! Whitespace is allowed between every element.

use gluegen_core::{
    ArgDescriptor, ParseError, QualifiedName, RefMarker, RefSuffix, Signedness, TypeDescriptor,
};

use crate::cursor::Cursor;

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Recursive-descent parser over a single type or argument expression.
pub struct TypeParser<'src> {
    cursor: Cursor<'src>,
}

impl<'src> TypeParser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Parse the whole input as a type expression.
    pub fn parse_type(mut self) -> Result<TypeDescriptor, ParseError> {
        let ctype = self.parse_descriptor()?;
        self.expect_end()?;
        Ok(ctype)
    }

    /// Parse the whole input as a type followed by an optional name.
    pub fn parse_arg(mut self) -> Result<ArgDescriptor, ParseError> {
        let ctype = self.parse_descriptor()?;
        self.cursor.skip_whitespace();
        let name = if self.cursor.check(is_ident_start) {
            Some(self.cursor.eat_while(is_ident_continue).to_string())
        } else {
            None
        };
        self.expect_end()?;
        Ok(ArgDescriptor { ctype, name })
    }

    fn parse_descriptor(&mut self) -> Result<TypeDescriptor, ParseError> {
        self.cursor.skip_whitespace();
        let is_const = self.eat_keyword("const", false);

        let signedness = if self.eat_keyword("signed", true) {
            Some(Signedness::Signed)
        } else if self.eat_keyword("unsigned", true) {
            Some(Signedness::Unsigned)
        } else {
            None
        };

        let name = self.parse_qualified()?;

        self.cursor.skip_whitespace();
        let markers = self.cursor.eat_while(|c| RefMarker::from_char(c).is_some());
        let ref_suffix = RefSuffix::parse(markers).ok_or_else(|| self.error("reference suffix"))?;

        Ok(TypeDescriptor {
            is_const,
            signedness,
            name,
            ref_suffix,
        })
    }

    /// Consume `keyword` when it stands as a whole word. With `needs_name`,
    /// a type name must also follow it; otherwise the cursor is left untouched
    /// so the word can be read as a name itself (`unsigned` alone).
    fn eat_keyword(&mut self, keyword: &str, needs_name: bool) -> bool {
        let saved = self.cursor.checkpoint();
        if !self.cursor.eat_str(keyword) || self.cursor.check(is_ident_continue) {
            self.cursor.restore(saved);
            return false;
        }
        self.cursor.skip_whitespace();
        if !needs_name || self.cursor.check(is_ident_start) || self.cursor.check_str("::") {
            true
        } else {
            self.cursor.restore(saved);
            false
        }
    }

    fn parse_qualified(&mut self) -> Result<QualifiedName, ParseError> {
        // leading `::` is the global scope
        self.cursor.eat_str("::");
        let mut segments = vec![self.parse_segment()?];
        while self.cursor.eat_str("::") {
            segments.push(self.parse_segment()?);
        }
        Ok(QualifiedName::from_qualified_string(&segments.join("::")))
    }

    fn parse_segment(&mut self) -> Result<&'src str, ParseError> {
        if !self.cursor.check(is_ident_start) {
            return Err(self.error("type name"));
        }
        Ok(self.cursor.eat_while(is_ident_continue))
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        self.cursor.skip_whitespace();
        if self.cursor.is_eof() {
            Ok(())
        } else {
            Err(self.error("end of expression"))
        }
    }

    fn error(&self, expected: &'static str) -> ParseError {
        ParseError::new(self.cursor.source(), self.cursor.offset(), expected)
    }
}
