//! Type expression parser.
//!
//! Parses the type mini-language used throughout the declaration API into
//! [`TypeDescriptor`]s and [`ArgDescriptor`]s.
//!
//! # Example
//!
//! ```
//! use gluegen_parser::{parse_arg, parse_type};
//!
//! let ctype = parse_type("const gs::Vec3&").unwrap();
//! assert!(ctype.is_const);
//! assert_eq!(ctype.to_string(), "const gs::Vec3 &");
//!
//! let arg = parse_arg("float scale").unwrap();
//! assert_eq!(arg.name.as_deref(), Some("scale"));
//! ```

mod cursor;
mod type_parser;

pub use cursor::Cursor;
pub use type_parser::TypeParser;

use gluegen_core::{ArgDescriptor, ParseError, TypeDescriptor};

/// Parse a type expression.
pub fn parse_type(source: &str) -> Result<TypeDescriptor, ParseError> {
    TypeParser::new(source).parse_type()
}

/// Parse an argument expression: a type with an optional trailing name.
pub fn parse_arg(source: &str) -> Result<ArgDescriptor, ParseError> {
    TypeParser::new(source).parse_arg()
}

/// Canonical spelling of a type expression, or the input unchanged when it
/// does not parse.
pub fn canonical_spelling(source: &str) -> String {
    parse_type(source)
        .map(|ctype| ctype.canonical_name())
        .unwrap_or_else(|_| source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parse_round_trip() {
        for src in [
            "int",
            "const int&",
            "unsigned char *",
            "const gs::math::Vec3 *&",
            "simple_struct*",
            "signed long",
        ] {
            let parsed = parse_type(src).unwrap();
            let reparsed = parse_type(&parsed.to_string()).unwrap();
            assert_eq!(parsed, reparsed, "round trip of '{}'", src);
            assert_eq!(reparsed.to_string(), parsed.to_string());
        }
    }

    #[test]
    fn canonical_spelling_normalizes_spacing() {
        assert_eq!(canonical_spelling("int*"), "int *");
        assert_eq!(canonical_spelling("  const  A &"), "const A &");
        assert_eq!(canonical_spelling("not a type!"), "not a type!");
    }
}
